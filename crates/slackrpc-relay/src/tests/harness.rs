//! Test harness for relay tests.
//!
//! Provides:
//! - RecordingBridge: remembers every delivered event, optionally slow or failing
//! - authenticated(): credentials that satisfy the relay precondition
//! - relay_all(): runs a relay over a fixed list of payloads to completion

use crate::bridge::Bridge;
use crate::error::{RelayError, RelayResult};
use crate::event::ActivityEvent;
use crate::relay::{EventRelay, RelayStats};
use crate::source::ChannelSource;
use async_trait::async_trait;
use serde_json::Value;
use slackrpc_auth::Credentials;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Bridge that records what it was sent.
#[derive(Default)]
pub struct RecordingBridge {
    received: Mutex<Vec<ActivityEvent>>,
    fail_on: Mutex<HashSet<usize>>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingBridge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Reject the send with this 0-based call index.
    pub fn fail_call(&self, index: usize) {
        self.fail_on.lock().unwrap().insert(index);
    }

    /// Hold every send for `delay` before accepting it.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Payloads accepted, in arrival order.
    pub fn received(&self) -> Vec<Value> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .map(|event| serde_json::from_str(event.as_json()).unwrap())
            .collect()
    }

    /// Exact JSON text of each accepted payload.
    pub fn received_text(&self) -> Vec<String> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .map(|event| event.as_json().to_string())
            .collect()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Bridge for RecordingBridge {
    async fn send(&self, event: ActivityEvent) -> RelayResult<()> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_on.lock().unwrap().contains(&index) {
            return Err(RelayError::Bridge(format!("scripted failure on call {}", index)));
        }
        self.received.lock().unwrap().push(event);
        Ok(())
    }
}

/// Credentials holding a token.
pub fn authenticated() -> Credentials {
    Credentials::from_configured(Some("test-token".to_string()))
}

/// Emit `payloads` through a channel source, close it, and wait for the relay.
pub async fn relay_all(bridge: Arc<RecordingBridge>, payloads: Vec<Value>) -> RelayStats {
    let relay = EventRelay::new(&authenticated(), bridge).unwrap();
    let (source, emitter) = ChannelSource::new(4);
    let handle = relay.start(source);

    for payload in &payloads {
        emitter.emit_value(payload).await.unwrap();
    }
    drop(emitter);

    handle.join().await.unwrap()
}
