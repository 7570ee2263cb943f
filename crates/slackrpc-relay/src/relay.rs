//! Main relay loop.

use crate::bridge::Bridge;
use crate::error::{RelayError, RelayResult};
use crate::source::{ActivitySource, ActivitySubscription, CancelHandle};
use slackrpc_auth::{AuthToken, Credentials};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Totals for one relay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Events the bridge accepted.
    pub forwarded: u64,
    /// Events the bridge rejected.
    pub failed: u64,
}

/// Forwards activity events to a bridge, one at a time and in order.
///
/// Can only be built from authenticated credentials.
pub struct EventRelay<B> {
    bridge: B,
    token: AuthToken,
}

impl<B: Bridge + 'static> EventRelay<B> {
    pub fn new(credentials: &Credentials, bridge: B) -> RelayResult<Self> {
        let token = credentials
            .token()
            .cloned()
            .ok_or(RelayError::NotAuthenticated)?;
        Ok(Self { bridge, token })
    }

    /// Token the relay was authorized with.
    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    /// Subscribe to `source` and forward its events on a background task.
    pub fn start<S: ActivitySource>(self, source: S) -> RelayHandle {
        let subscription = source.subscribe();
        let cancel = subscription.cancel_handle();
        let task = tokio::spawn(self.run(subscription));
        RelayHandle { task, cancel }
    }

    async fn run(self, mut subscription: ActivitySubscription) -> RelayStats {
        info!("Relaying activity events");
        let mut stats = RelayStats::default();

        while let Some(event) = subscription.recv().await {
            match self.bridge.send(event).await {
                Ok(()) => {
                    stats.forwarded += 1;
                    debug!(forwarded = stats.forwarded, "Activity event forwarded");
                }
                Err(e) => {
                    stats.failed += 1;
                    warn!(error = %e, "Bridge failed to deliver activity event");
                }
            }
        }

        info!(
            forwarded = stats.forwarded,
            failed = stats.failed,
            "Activity relay stopped"
        );
        stats
    }
}

/// Handle to a running relay.
pub struct RelayHandle {
    task: JoinHandle<RelayStats>,
    cancel: CancelHandle,
}

impl RelayHandle {
    /// Stop taking new events. The event being forwarded, if any, finishes.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the relay to stop, after the source ends or a cancel.
    pub async fn join(self) -> RelayResult<RelayStats> {
        self.task
            .await
            .map_err(|e| RelayError::Task(e.to_string()))
    }
}
