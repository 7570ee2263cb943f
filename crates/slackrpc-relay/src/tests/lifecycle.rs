//! Relay construction and teardown.

use super::harness::{authenticated, RecordingBridge};
use crate::error::RelayError;
use crate::relay::EventRelay;
use crate::source::ChannelSource;
use serde_json::json;
use slackrpc_auth::{AuthToken, Credentials};
use std::time::Duration;

#[tokio::test]
async fn refuses_to_start_without_token() {
    let result = EventRelay::new(&Credentials::new(), RecordingBridge::new());
    assert!(matches!(result, Err(RelayError::NotAuthenticated)));
}

#[tokio::test]
async fn accepts_token_from_handshake() {
    let credentials = Credentials::new();
    credentials.set(AuthToken::new("linked")).unwrap();

    let relay = EventRelay::new(&credentials, RecordingBridge::new()).unwrap();

    assert_eq!(relay.token().expose(), "linked");
}

#[tokio::test]
async fn join_resolves_when_source_ends() {
    let relay = EventRelay::new(&authenticated(), RecordingBridge::new()).unwrap();
    let (source, emitter) = ChannelSource::new(4);
    let handle = relay.start(source);

    drop(emitter);

    let stats = tokio::time::timeout(Duration::from_secs(5), handle.join())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stats.forwarded, 0);
}

#[tokio::test]
async fn cancel_stops_an_open_source() {
    let bridge = RecordingBridge::new();
    let relay = EventRelay::new(&authenticated(), bridge.clone()).unwrap();
    let (source, emitter) = ChannelSource::new(4);
    let handle = relay.start(source);

    emitter.emit_value(&json!("before cancel")).await.unwrap();
    while bridge.calls() == 0 {
        tokio::task::yield_now().await;
    }
    handle.cancel();

    let stats = tokio::time::timeout(Duration::from_secs(5), handle.join())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stats.forwarded, 1);
    assert!(emitter.emit_value(&json!("after cancel")).await.is_err());
}
