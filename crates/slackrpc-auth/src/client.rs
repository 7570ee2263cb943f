//! HTTP client for the link service.
//!
//! Two routes are used:
//! - `GET /api/oauth/start?code=..&hostname=..` issues the URL the user
//!   visits to finish linking
//! - `GET /api/oauth/poll?code=..` reports whether that link completed

use crate::code::{AuthCode, AuthenticationAttempt};
use crate::error::{AuthError, AuthResult};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use slackrpc_config::Config;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use url::Url;

const START_PATH: &str = "api/oauth/start";
const POLL_PATH: &str = "api/oauth/poll";

fn summarize_response_body(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}

/// Response of the start route.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkStart {
    /// Page the user opens to approve the link.
    pub url: String,
}

/// Response of the poll route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationResult {
    /// `"complete"` once linked; anything else means keep waiting.
    pub status: String,
    /// Present when `status` is `"complete"`.
    #[serde(default)]
    pub token: Option<String>,
}

impl AuthenticationResult {
    pub const COMPLETE: &'static str = "complete";

    pub fn is_complete(&self) -> bool {
        self.status == Self::COMPLETE
    }
}

/// Anything that can answer one poll request.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, url: &str) -> AuthResult<AuthenticationResult>;
}

/// The remote side of the link handshake.
#[async_trait]
pub trait LinkService: StatusSource {
    /// Ask the service for a link URL for this attempt.
    async fn start(&self, attempt: &AuthenticationAttempt) -> AuthResult<LinkStart>;

    /// URL the poller should query for this code.
    fn poll_url(&self, code: &AuthCode) -> AuthResult<String>;
}

/// reqwest-backed link service client.
#[derive(Clone, Debug)]
pub struct LinkClient {
    http_client: reqwest::Client,
    api_url: String,
}

impl LinkClient {
    /// Create a client for `api_url` sending `user_agent` on every request.
    pub fn new(api_url: impl Into<String>, user_agent: &str) -> AuthResult<Self> {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Url::parse(&api_url)?;

        let http_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            http_client,
            api_url,
        })
    }

    pub fn from_config(config: &Config) -> AuthResult<Self> {
        Self::new(config.api_url.clone(), &config.user_agent)
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> AuthResult<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.api_url, path))?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }
}

#[async_trait]
impl StatusSource for LinkClient {
    async fn fetch_status(&self, url: &str) -> AuthResult<AuthenticationResult> {
        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::PollStatus(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl LinkService for LinkClient {
    async fn start(&self, attempt: &AuthenticationAttempt) -> AuthResult<LinkStart> {
        let url = self.endpoint(
            START_PATH,
            &[
                ("code", attempt.code.as_str()),
                ("hostname", attempt.hostname.as_str()),
            ],
        )?;

        tracing::debug!(code = %attempt.code, hostname = %attempt.hostname, "Requesting link URL");

        let response = self.http_client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("Link service rate-limited the start request");
            return Err(AuthError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body_summary = %summarize_response_body(&body),
                "Link start rejected"
            );
            return Err(AuthError::InitiationFailed {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let start: LinkStart = serde_json::from_str(&body)?;
        Ok(start)
    }

    fn poll_url(&self, code: &AuthCode) -> AuthResult<String> {
        Ok(self
            .endpoint(POLL_PATH, &[("code", code.as_str())])?
            .to_string())
    }
}
