//! Behavioural tests for the activity relay.
//!
//! - `harness.rs`    - Recording bridge and relay helpers
//! - `forwarding.rs` - Events reach the bridge; bridge failures are survived
//! - `ordering.rs`   - Source order is kept and only one event is in flight
//! - `content.rs`    - Payloads are forwarded untouched
//! - `lifecycle.rs`  - Authentication precondition, end of source, cancel

pub(crate) mod harness;
mod lifecycle;
mod ordering;
