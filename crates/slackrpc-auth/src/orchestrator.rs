//! Drives the link handshake from code generation to a stored token.

use crate::client::LinkService;
use crate::code::{local_hostname, AuthCode, AuthenticationAttempt};
use crate::error::{AuthError, AuthResult};
use crate::handshake_fsm::{HandshakeInput, HandshakeMachine, HandshakeState};
use crate::poller::{PollConfig, Poller, Sleeper, TokioSleeper};
use crate::token::{AuthToken, Credentials};

/// Called with the link URL as soon as the service issues it.
pub type LinkCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Runs one link handshake against a [`LinkService`].
pub struct Orchestrator<L, Z = TokioSleeper> {
    service: L,
    sleeper: Z,
    poll_config: PollConfig,
    hostname: String,
    on_link: Option<LinkCallback>,
    state: HandshakeState,
}

impl<L: LinkService> Orchestrator<L> {
    pub fn new(service: L, poll_config: PollConfig) -> Self {
        Self::with_sleeper(service, TokioSleeper, poll_config)
    }
}

impl<L: LinkService, Z: Sleeper> Orchestrator<L, Z> {
    pub fn with_sleeper(service: L, sleeper: Z, poll_config: PollConfig) -> Self {
        Self {
            service,
            sleeper,
            poll_config,
            hostname: local_hostname(),
            on_link: None,
            state: HandshakeState::Start,
        }
    }

    /// Report this hostname to the service instead of the machine's own.
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn with_link_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_link = Some(Box::new(callback));
        self
    }

    /// State reached by the last `authenticate` call.
    pub fn state(&self) -> HandshakeState {
        self.state
    }

    pub fn service(&self) -> &L {
        &self.service
    }

    /// Make sure `credentials` hold a token, running the handshake if needed.
    ///
    /// A token already present is returned without contacting the service.
    /// Otherwise the obtained token is stored into `credentials`.
    pub async fn authenticate(&mut self, credentials: &Credentials) -> AuthResult<AuthToken> {
        let mut machine = HandshakeMachine::new();
        let result = self.run(&mut machine, credentials).await;
        self.state = HandshakeState::from(machine.state());
        result
    }

    async fn run(
        &self,
        machine: &mut HandshakeMachine,
        credentials: &Credentials,
    ) -> AuthResult<AuthToken> {
        if let Some(token) = credentials.token() {
            transition(machine, HandshakeInput::TokenConfigured)?;
            tracing::info!("Using configured auth token");
            return Ok(token.clone());
        }

        let attempt = AuthenticationAttempt::new(AuthCode::generate(), self.hostname.clone());
        transition(machine, HandshakeInput::CodeGenerated)?;
        tracing::info!(
            code = %attempt.code,
            hostname = %attempt.hostname,
            "Starting link handshake"
        );

        let link = match self.service.start(&attempt).await {
            Ok(link) => link,
            Err(e) => {
                transition(machine, HandshakeInput::InitiationRejected)?;
                return Err(e);
            }
        };
        transition(machine, HandshakeInput::LinkIssued)?;
        tracing::info!(url = %link.url, "Link URL issued");

        if let Some(callback) = &self.on_link {
            callback(&link.url);
        }

        match self.await_token(&attempt, credentials).await {
            Ok(token) => {
                transition(machine, HandshakeInput::TokenReceived)?;
                tracing::info!(
                    elapsed_ms = (chrono::Utc::now() - attempt.created_at).num_milliseconds(),
                    "Link handshake complete"
                );
                Ok(token)
            }
            Err(e) => {
                transition(machine, HandshakeInput::PollFailed)?;
                Err(e)
            }
        }
    }

    async fn await_token(
        &self,
        attempt: &AuthenticationAttempt,
        credentials: &Credentials,
    ) -> AuthResult<AuthToken> {
        let poll_url = self.service.poll_url(&attempt.code)?;
        let result = Poller::new(&self.service, &self.sleeper)
            .poll(&poll_url, &self.poll_config)
            .await?;

        let token = result
            .token
            .filter(|t| !t.trim().is_empty())
            .map(AuthToken::new)
            .ok_or(AuthError::MissingToken)?;

        credentials.set(token.clone())?;
        Ok(token)
    }
}

fn transition(machine: &mut HandshakeMachine, input: HandshakeInput) -> AuthResult<()> {
    let from = machine.state().clone();
    machine.consume(&input).map_err(|_| {
        AuthError::InvalidStateTransition(format!("{:?} does not accept {:?}", from, input))
    })?;
    tracing::debug!(from = ?from, to = ?machine.state(), "Handshake transition");
    Ok(())
}
