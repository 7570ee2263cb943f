//! Link handshake state machine using rust-fsm.
//!
//! ## State Diagram
//!
//! ```text
//!                  ┌──────────────────────┐
//!                  │        Start         │ (initial)
//!                  └──────────┬───────────┘
//!     TokenConfigured         │ CodeGenerated
//!   ┌─────────────────────────┤
//!   │                         ▼
//!   │              ┌──────────────────────┐  InitiationRejected
//!   │              │      Initiating      │ ────────────────────┐
//!   │              └──────────┬───────────┘                     │
//!   │                         │ LinkIssued                      │
//!   │                         ▼                                 ▼
//!   │              ┌──────────────────────┐  PollFailed   ┌──────────┐
//!   │              │  AwaitingCompletion  │ ────────────► │  Failed  │
//!   │              └──────────┬───────────┘               └──────────┘
//!   │                         │ TokenReceived
//!   │                         ▼
//!   │              ┌──────────────────────┐
//!   └────────────► │        Ready         │
//!                  └──────────────────────┘
//! ```
//!
//! `Ready` and `Failed` are terminal; a run passes through the machine once.

use rust_fsm::*;
use serde::{Deserialize, Serialize};

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub handshake_machine(Start)

    Start => {
        TokenConfigured => Ready,
        CodeGenerated => Initiating
    },
    Initiating => {
        LinkIssued => AwaitingCompletion,
        InitiationRejected => Failed
    },
    AwaitingCompletion => {
        TokenReceived => Ready,
        PollFailed => Failed
    }
}

pub use handshake_machine::Input as HandshakeInput;
pub use handshake_machine::State as HandshakeMachineState;
pub use handshake_machine::StateMachine as HandshakeMachine;

/// Handshake progress as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandshakeState {
    Start,
    Initiating,
    AwaitingCompletion,
    Ready,
    Failed,
}

impl HandshakeState {
    /// True once a token is available to the relay.
    pub fn is_ready(&self) -> bool {
        matches!(self, HandshakeState::Ready)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, HandshakeState::Ready | HandshakeState::Failed)
    }
}

impl From<&HandshakeMachineState> for HandshakeState {
    fn from(state: &HandshakeMachineState) -> Self {
        match state {
            HandshakeMachineState::Start => HandshakeState::Start,
            HandshakeMachineState::Initiating => HandshakeState::Initiating,
            HandshakeMachineState::AwaitingCompletion => HandshakeState::AwaitingCompletion,
            HandshakeMachineState::Ready => HandshakeState::Ready,
            HandshakeMachineState::Failed => HandshakeState::Failed,
        }
    }
}
