//! Bridges deliver relayed events to their destination.

use crate::error::RelayResult;
use crate::event::ActivityEvent;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

#[async_trait]
pub trait Bridge: Send + Sync {
    /// Deliver one event. The relay logs a failure and moves on.
    async fn send(&self, event: ActivityEvent) -> RelayResult<()>;
}

#[async_trait]
impl<T: Bridge + ?Sized> Bridge for Arc<T> {
    async fn send(&self, event: ActivityEvent) -> RelayResult<()> {
        (**self).send(event).await
    }
}

/// Writes each event's JSON text as one line and flushes.
///
/// The text is passed through unchanged except that raw line breaks, which
/// valid JSON only allows as whitespace between tokens, become spaces.
pub struct JsonLinesBridge<W> {
    writer: Mutex<W>,
}

impl<W> JsonLinesBridge<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W> Bridge for JsonLinesBridge<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&self, event: ActivityEvent) -> RelayResult<()> {
        let mut line: Vec<u8> = event
            .as_json()
            .bytes()
            .map(|b| if b == b'\n' || b == b'\r' { b' ' } else { b })
            .collect();
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(&line).await?;
        writer.flush().await?;
        Ok(())
    }
}
