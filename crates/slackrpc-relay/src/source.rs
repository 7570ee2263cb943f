//! Activity sources.
//!
//! A source hands the relay an [`ActivitySubscription`]: a receiver of
//! events plus a [`CancelHandle`] that ends the subscription.

use crate::error::{RelayError, RelayResult};
use crate::event::ActivityEvent;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

/// Default buffer between a source and the relay.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Cloneable cancellation flag shared by a subscription and its producers.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolves once `cancel` has been called on any clone.
    pub async fn cancelled(&self) {
        let mut receiver = self.sender.subscribe();
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// A live stream of activity events.
#[derive(Debug)]
pub struct ActivitySubscription {
    receiver: mpsc::Receiver<ActivityEvent>,
    cancel: CancelHandle,
}

impl ActivitySubscription {
    pub fn new(receiver: mpsc::Receiver<ActivityEvent>, cancel: CancelHandle) -> Self {
        Self { receiver, cancel }
    }

    /// Next event, or `None` once the source has ended or been cancelled.
    pub async fn recv(&mut self) -> Option<ActivityEvent> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            event = self.receiver.recv() => event,
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

/// Something that produces activity events.
pub trait ActivitySource {
    fn subscribe(self) -> ActivitySubscription;
}

/// In-process source fed through an [`ActivityEmitter`].
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::Receiver<ActivityEvent>,
}

impl ChannelSource {
    /// Create a source and the emitter that feeds it.
    pub fn new(capacity: usize) -> (Self, ActivityEmitter) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { receiver }, ActivityEmitter { sender })
    }
}

impl ActivitySource for ChannelSource {
    fn subscribe(self) -> ActivitySubscription {
        ActivitySubscription::new(self.receiver, CancelHandle::new())
    }
}

/// Producer half of a [`ChannelSource`]. Dropping every emitter ends the
/// source.
#[derive(Clone, Debug)]
pub struct ActivityEmitter {
    sender: mpsc::Sender<ActivityEvent>,
}

impl ActivityEmitter {
    /// Queue one event, waiting if the relay is behind.
    pub async fn emit(&self, event: ActivityEvent) -> RelayResult<()> {
        self.sender
            .send(event)
            .await
            .map_err(|_| RelayError::SourceClosed)
    }

    /// Serialize `payload` and queue it.
    pub async fn emit_value(&self, payload: &Value) -> RelayResult<()> {
        self.emit(ActivityEvent::from_value(payload)?).await
    }
}

/// Newline-delimited JSON activity payloads read from a byte stream.
///
/// Blank lines are ignored. Lines that are not valid JSON are logged and
/// skipped. The source ends at EOF or on a read error.
pub struct JsonLinesSource<R> {
    reader: R,
    capacity: usize,
}

impl<R> JsonLinesSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    async fn pump(reader: R, sender: mpsc::Sender<ActivityEvent>, cancel: CancelHandle) {
        let mut lines = reader.lines();
        let mut line_number: u64 = 0;

        loop {
            let line = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                line = lines.next_line() => line,
            };

            let line = match line {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!(lines = line_number, "Activity input ended");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read activity input");
                    break;
                }
            };
            line_number += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let event = match ActivityEvent::from_json(trimmed) {
                Ok(event) => event,
                Err(e) => {
                    warn!(line = line_number, error = %e, "Skipping malformed activity line");
                    continue;
                }
            };

            if sender.send(event).await.is_err() {
                break;
            }
        }
    }
}

impl<R> ActivitySource for JsonLinesSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn subscribe(self) -> ActivitySubscription {
        let (sender, receiver) = mpsc::channel(self.capacity);
        let cancel = CancelHandle::new();
        tokio::spawn(Self::pump(self.reader, sender, cancel.clone()));
        ActivitySubscription::new(receiver, cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::BufReader;

    async fn drain(mut subscription: ActivitySubscription) -> Vec<String> {
        let mut payloads = Vec::new();
        while let Some(event) = subscription.recv().await {
            payloads.push(event.as_json().to_string());
        }
        payloads
    }

    #[tokio::test]
    async fn test_channel_source_delivers_and_ends() {
        let (source, emitter) = ChannelSource::new(4);
        let subscription = source.subscribe();

        emitter.emit_value(&json!({ "n": 1 })).await.unwrap();
        emitter
            .emit(ActivityEvent::from_json(r#"{"z":0,"a":2}"#).unwrap())
            .await
            .unwrap();
        drop(emitter);

        assert_eq!(drain(subscription).await, vec![r#"{"n":1}"#, r#"{"z":0,"a":2}"#]);
    }

    #[tokio::test]
    async fn test_emit_after_subscription_dropped_fails() {
        let (source, emitter) = ChannelSource::new(1);
        drop(source.subscribe());

        assert!(matches!(
            emitter.emit_value(&json!("late")).await,
            Err(RelayError::SourceClosed)
        ));
    }

    #[tokio::test]
    async fn test_cancelled_subscription_yields_nothing() {
        let (source, emitter) = ChannelSource::new(4);
        let mut subscription = source.subscribe();
        emitter.emit_value(&json!("queued")).await.unwrap();

        subscription.cancel();

        assert!(subscription.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_cancel_handle_wakes_waiters() {
        let handle = CancelHandle::new();
        let waiter = {
            let handle = handle.clone();
            tokio::spawn(async move { handle.cancelled().await })
        };

        handle.cancel();

        waiter.await.unwrap();
        assert!(handle.is_cancelled());
    }

    #[tokio::test]
    async fn test_json_lines_skip_blank_and_malformed() {
        let input = "{\"a\":1}\n\n   \nnot json\n[1,2,3]\n\"idle\"\n";
        let source = JsonLinesSource::new(BufReader::new(input.as_bytes()));

        let payloads = drain(source.subscribe()).await;

        assert_eq!(payloads, vec![r#"{"a":1}"#, "[1,2,3]", "\"idle\""]);
    }

    #[tokio::test]
    async fn test_json_lines_keep_original_text() {
        let input = "  {\"state\":\"a\",\"details\":\"b\"}  \r\n{\"id\":123456789012345678901234567890}\n{\"x\":1.50}\n";
        let source = JsonLinesSource::new(BufReader::new(input.as_bytes()));

        let payloads = drain(source.subscribe()).await;

        assert_eq!(
            payloads,
            vec![
                r#"{"state":"a","details":"b"}"#,
                r#"{"id":123456789012345678901234567890}"#,
                r#"{"x":1.50}"#,
            ]
        );
    }

    #[tokio::test]
    async fn test_json_lines_without_trailing_newline() {
        let source = JsonLinesSource::new(BufReader::new("{\"last\":true}".as_bytes()));
        assert_eq!(drain(source.subscribe()).await, vec![r#"{"last":true}"#]);
    }

    #[tokio::test]
    async fn test_json_lines_empty_input() {
        let source = JsonLinesSource::new(BufReader::new(&b""[..])).with_capacity(0);
        assert!(drain(source.subscribe()).await.is_empty());
    }
}
