//! Device-style link handshake for slackrpc.
//!
//! This crate provides:
//! - Link code generation
//! - An HTTP client for the link service start and poll routes
//! - Bounded polling with an injectable sleeper
//! - An explicit FSM-based orchestrator that yields the auth token

mod client;
mod code;
mod error;
mod handshake_fsm;
mod orchestrator;
mod poller;
mod token;

#[cfg(test)]
mod testing;

pub use client::{AuthenticationResult, LinkClient, LinkService, LinkStart, StatusSource};
pub use code::{
    generate_code, local_hostname, AuthCode, AuthenticationAttempt, CODE_ALPHABET, CODE_LENGTH,
};
pub use error::{AuthError, AuthResult};
pub use handshake_fsm::handshake_machine;
pub use handshake_fsm::{HandshakeInput, HandshakeMachine, HandshakeMachineState, HandshakeState};
pub use orchestrator::{LinkCallback, Orchestrator};
pub use poller::{
    PollConfig, PollState, PollStep, Poller, Sleeper, TokioSleeper, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_POLL_INTERVAL,
};
pub use token::{AuthToken, Credentials};
