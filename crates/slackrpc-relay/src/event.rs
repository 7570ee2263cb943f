//! Activity events.

use crate::error::RelayResult;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;

/// One presence/status notification from the local application.
///
/// The payload is kept as the exact JSON text it arrived as. The relay never
/// looks inside it, so key order, number formatting and integer precision
/// survive the trip to the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityEvent(Box<RawValue>);

impl ActivityEvent {
    /// Wrap one JSON document, rejecting text that is not valid JSON.
    pub fn from_json(text: &str) -> RelayResult<Self> {
        Ok(Self(serde_json::from_str::<Box<RawValue>>(text)?))
    }

    /// Serialize an in-memory value into an event.
    pub fn from_value(payload: &Value) -> RelayResult<Self> {
        Ok(Self(serde_json::value::to_raw_value(payload)?))
    }

    /// The payload text, byte for byte.
    pub fn as_json(&self) -> &str {
        self.0.get()
    }

    pub fn payload(&self) -> &RawValue {
        &self.0
    }
}

impl PartialEq for ActivityEvent {
    fn eq(&self, other: &Self) -> bool {
        self.as_json() == other.as_json()
    }
}

impl Eq for ActivityEvent {}
