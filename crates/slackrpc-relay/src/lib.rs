//! Activity relay for slackrpc.
//!
//! Once the link handshake has produced a token, the relay moves activity
//! events from a local source to a bridge.
//!
//! # Core Invariants
//!
//! 1. **Authenticated**: a relay cannot be built without a token
//! 2. **Ordered**: events reach the bridge in the order the source produced them
//! 3. **One In-Flight**: each delivery finishes before the next event is taken
//! 4. **Content-Agnostic**: payload JSON text is forwarded byte for byte
//!
//! # Architecture
//!
//! ```text
//! ActivitySource -> EventRelay -> Bridge
//! ```

pub mod bridge;
pub mod error;
pub mod event;
pub mod relay;
pub mod source;

#[cfg(test)]
mod tests;

pub use bridge::{Bridge, JsonLinesBridge};
pub use error::{RelayError, RelayResult};
pub use event::ActivityEvent;
pub use relay::{EventRelay, RelayHandle, RelayStats};
pub use source::{
    ActivityEmitter, ActivitySource, ActivitySubscription, CancelHandle, ChannelSource,
    JsonLinesSource, DEFAULT_CHANNEL_CAPACITY,
};
