// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stopping the bridge

use crate::prelude::*;

#[tokio::test]
async fn shutdown_releases_the_peripheral() {
    let bridge = Bridge::connected(deck(["one"])).await;
    bridge.request("start").await;
    let transport = bridge.transport.clone();

    tokio::time::timeout(WAIT, bridge.stop()).await.unwrap();
    assert!(!transport.is_connected());
    assert!(!transport.is_subscribed());
}

#[tokio::test]
async fn shutdown_while_searching_for_peripheral() {
    let transport = FakeTransport::new();
    transport.fail_next_connects(10_000, TransportError::NotFound(ADDRESS.into()));
    let bridge = Bridge::start_with(transport, deck(["one"]), fast_timing());
    tokio::time::sleep(Duration::from_millis(50)).await;
    let transport = bridge.transport.clone();

    tokio::time::timeout(WAIT, bridge.stop()).await.unwrap();
    assert_eq!(transport.sessions(), 0);
}

#[tokio::test]
async fn no_commands_are_executed_after_shutdown() {
    let bridge = Bridge::connected(deck(["one", "two"])).await;
    bridge.request("start").await;
    let automation = bridge.automation.clone();
    let before = automation.calls().len();

    bridge.stop().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(automation.calls().len(), before);
}
