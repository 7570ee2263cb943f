//! Fakes shared by the poller and orchestrator tests.

use crate::client::{AuthenticationResult, LinkService, LinkStart, StatusSource};
use crate::code::{AuthCode, AuthenticationAttempt};
use crate::error::{AuthError, AuthResult};
use crate::poller::Sleeper;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

pub fn pending() -> AuthResult<AuthenticationResult> {
    Ok(AuthenticationResult {
        status: "pending".to_string(),
        token: None,
    })
}

pub fn complete(token: &str) -> AuthResult<AuthenticationResult> {
    Ok(AuthenticationResult {
        status: AuthenticationResult::COMPLETE.to_string(),
        token: Some(token.to_string()),
    })
}

/// A non-success poll status, as a throttled service answers.
pub fn status_miss() -> AuthResult<AuthenticationResult> {
    Err(AuthError::PollStatus(503))
}

/// Link service that replays scripted responses and records every call.
///
/// Once the poll script runs out every further poll is pending.
#[derive(Default)]
pub struct ScriptedService {
    start: Mutex<Option<AuthResult<LinkStart>>>,
    statuses: Mutex<VecDeque<AuthResult<AuthenticationResult>>>,
    start_calls: Mutex<Vec<AuthenticationAttempt>>,
    poll_calls: Mutex<Vec<String>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_link(self, url: &str) -> Self {
        *self.start.lock().unwrap() = Some(Ok(LinkStart {
            url: url.to_string(),
        }));
        self
    }

    pub fn with_start_error(self, error: AuthError) -> Self {
        *self.start.lock().unwrap() = Some(Err(error));
        self
    }

    pub fn with_statuses(
        self,
        statuses: impl IntoIterator<Item = AuthResult<AuthenticationResult>>,
    ) -> Self {
        self.statuses.lock().unwrap().extend(statuses);
        self
    }

    pub fn start_calls(&self) -> Vec<AuthenticationAttempt> {
        self.start_calls.lock().unwrap().clone()
    }

    pub fn poll_calls(&self) -> Vec<String> {
        self.poll_calls.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.start_calls.lock().unwrap().len() + self.poll_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl StatusSource for ScriptedService {
    async fn fetch_status(&self, url: &str) -> AuthResult<AuthenticationResult> {
        self.poll_calls.lock().unwrap().push(url.to_string());
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(pending)
    }
}

#[async_trait]
impl LinkService for ScriptedService {
    async fn start(&self, attempt: &AuthenticationAttempt) -> AuthResult<LinkStart> {
        self.start_calls.lock().unwrap().push(attempt.clone());
        self.start
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(AuthError::Config("no start response scripted".into())))
    }

    fn poll_url(&self, code: &AuthCode) -> AuthResult<String> {
        Ok(format!("fake://poll?code={}", code))
    }
}

/// Sleeper that returns at once and remembers what it was asked to wait.
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
