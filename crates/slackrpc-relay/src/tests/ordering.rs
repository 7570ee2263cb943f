//! Ordering and one-at-a-time delivery.

use super::harness::{authenticated, relay_all, RecordingBridge};
use crate::relay::EventRelay;
use crate::source::ChannelSource;
use serde_json::{json, Value};
use std::time::Duration;

#[tokio::test]
async fn preserves_source_order() {
    let bridge = RecordingBridge::new();
    let payloads: Vec<Value> = (0..50).rev().map(|i| json!(i)).collect();

    relay_all(bridge.clone(), payloads.clone()).await;

    assert_eq!(bridge.received(), payloads);
}

#[tokio::test]
async fn never_has_two_events_in_flight() {
    let bridge = RecordingBridge::new();
    bridge.set_delay(Duration::from_millis(5));
    let payloads: Vec<Value> = (0..10).map(|i| json!({ "seq": i })).collect();

    relay_all(bridge.clone(), payloads.clone()).await;

    assert_eq!(bridge.max_in_flight(), 1);
    assert_eq!(bridge.received(), payloads);
}

#[tokio::test]
async fn events_emitted_while_bridge_is_busy_keep_order() {
    let bridge = RecordingBridge::new();
    bridge.set_delay(Duration::from_millis(2));
    let relay = EventRelay::new(&authenticated(), bridge.clone()).unwrap();
    let (source, emitter) = ChannelSource::new(1);
    let handle = relay.start(source);

    let producer = tokio::spawn(async move {
        for i in 0..20 {
            emitter.emit_value(&json!(i)).await.unwrap();
        }
    });
    producer.await.unwrap();

    let stats = handle.join().await.unwrap();
    assert_eq!(stats.forwarded, 20);
    let expected: Vec<Value> = (0..20).map(|i| json!(i)).collect();
    assert_eq!(bridge.received(), expected);
}
