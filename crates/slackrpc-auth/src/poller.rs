//! Bounded polling for link completion.
//!
//! The attempt bookkeeping lives in [`PollState`], a plain state machine with
//! no I/O. [`Poller`] drives it with a [`StatusSource`] for requests and a
//! [`Sleeper`] for the wait between attempts, so tests can run the whole loop
//! without a clock.

use crate::client::{AuthenticationResult, StatusSource};
use crate::error::{AuthError, AuthResult};
use async_trait::async_trait;
use slackrpc_config::Config;
use std::time::Duration;

/// Default number of poll requests before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;

/// Default wait between poll requests.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl PollConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.poll_interval(),
            max_attempts: config.poll_max_attempts,
        }
    }
}

/// Waits between poll attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real-time sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Next action of the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    /// Issue request number `attempt` (1-based).
    Request { attempt: u32 },
    /// Wait one interval before the next request.
    Sleep,
    /// The attempt budget is spent.
    TimedOut { attempts: u32 },
}

/// Attempt counter for one polling run.
///
/// Every request is either a success (the caller stops) or a miss. After a
/// miss the state yields `Sleep` unless that was the last allowed attempt,
/// in which case it yields `TimedOut` directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    attempts: u32,
    max_attempts: u32,
    sleep_pending: bool,
}

impl PollState {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempts: 0,
            max_attempts,
            sleep_pending: false,
        }
    }

    /// Requests issued so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn next_step(&mut self) -> PollStep {
        if self.sleep_pending {
            self.sleep_pending = false;
            return PollStep::Sleep;
        }
        if self.attempts >= self.max_attempts {
            return PollStep::TimedOut {
                attempts: self.attempts,
            };
        }
        self.attempts += 1;
        PollStep::Request {
            attempt: self.attempts,
        }
    }

    /// Record that the last request did not complete the link.
    pub fn record_miss(&mut self) {
        self.sleep_pending = self.attempts < self.max_attempts;
    }
}

/// Polls a status URL until the link completes or attempts run out.
pub struct Poller<'a, S: ?Sized, Z: ?Sized> {
    source: &'a S,
    sleeper: &'a Z,
}

impl<'a, S, Z> Poller<'a, S, Z>
where
    S: StatusSource + ?Sized,
    Z: Sleeper + ?Sized,
{
    pub fn new(source: &'a S, sleeper: &'a Z) -> Self {
        Self { source, sleeper }
    }

    /// Poll `url` until it reports `complete`.
    ///
    /// Transient failures count as a miss. Any other error is returned as is.
    pub async fn poll(&self, url: &str, config: &PollConfig) -> AuthResult<AuthenticationResult> {
        let mut state = PollState::new(config.max_attempts);

        loop {
            match state.next_step() {
                PollStep::Request { attempt } => match self.source.fetch_status(url).await {
                    Ok(result) if result.is_complete() => {
                        tracing::debug!(attempt, "Link completed");
                        return Ok(result);
                    }
                    Ok(result) => {
                        tracing::debug!(
                            attempt,
                            max_attempts = config.max_attempts,
                            status = %result.status,
                            "Link not completed yet"
                        );
                        state.record_miss();
                    }
                    Err(e) if e.is_transient() => {
                        tracing::warn!(
                            attempt,
                            max_attempts = config.max_attempts,
                            error = %e,
                            error_chain = %e.error_chain(),
                            "Poll attempt failed"
                        );
                        state.record_miss();
                    }
                    Err(e) => return Err(e),
                },
                PollStep::Sleep => self.sleeper.sleep(config.interval).await,
                PollStep::TimedOut { attempts } => {
                    return Err(AuthError::PollTimeout { attempts });
                }
            }
        }
    }
}
