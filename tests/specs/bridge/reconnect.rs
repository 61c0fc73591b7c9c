// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Link loss and recovery

use crate::prelude::*;

#[tokio::test]
async fn absent_peripheral_is_retried_until_found() {
    let transport = FakeTransport::new();
    transport.fail_next_connects(3, TransportError::NotFound(ADDRESS.into()));
    let bridge = Bridge::start_with(transport, deck(["one"]), fast_timing());

    assert!(bridge.transport.wait_for_subscribed(WAIT).await);
    assert_eq!(bridge.transport.connect_attempts(), 4);
    assert!(bridge.request("start").await.is_showing);
    bridge.stop().await;
}

#[tokio::test]
async fn write_failure_reconnects_and_flushes_later_records() {
    let bridge = Bridge::connected(deck(["one", "two", "three"])).await;
    bridge.transport.fail_next_write(TransportError::WriteFailed("gatt error".into()));

    bridge.send("start");
    bridge.send("next");
    bridge.send("next");

    // The record that failed to write is dropped, the rest arrive in order
    let records = bridge.records(2).await;
    let pages: Vec<u16> = records.iter().map(|r| r.current_page).collect();
    assert_eq!(pages, vec![2, 3]);
    assert_eq!(bridge.transport.sessions(), 2);
    bridge.stop().await;
}

#[tokio::test]
async fn records_produced_while_disconnected_are_delivered_after_reconnect() {
    let bridge = Bridge::connected(deck(["one", "two"])).await;
    // Slow enough that the link is lost before the answer exists
    bridge.automation.set_latency(Duration::from_millis(100));
    bridge.transport.fail_next_connects(20, TransportError::ConnectFailed("out of range".into()));

    bridge.send("start");
    bridge.transport.drop_link();

    let records = bridge.records(1).await;
    assert!(records[0].is_showing);
    assert_eq!(records[0].current_page, 1);
    assert_eq!(bridge.transport.sessions(), 2);
    assert!(bridge.transport.connect_attempts() >= 21);
    bridge.stop().await;
}

#[tokio::test]
async fn dropped_link_recovers_and_keeps_serving() {
    let bridge = Bridge::connected(deck(["one", "two"])).await;
    bridge.request("start").await;

    bridge.transport.drop_link();
    let deadline = tokio::time::Instant::now() + WAIT;
    while !(bridge.transport.sessions() == 2 && bridge.transport.is_subscribed()) {
        assert!(tokio::time::Instant::now() < deadline, "link never came back");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    assert_eq!(bridge.request("next").await.current_page, 2);
    bridge.stop().await;
}

#[tokio::test]
async fn link_state_follows_the_connection() {
    let transport = FakeTransport::new();
    transport.fail_next_connects(2, TransportError::NoAdapter);
    let bridge = Bridge::start_with(transport, deck(["one"]), fast_timing());

    let mut state = bridge.link_state();
    let listening = tokio::time::timeout(WAIT, state.wait_for(|s| *s == LinkState::Listening)).await;
    assert!(listening.is_ok());
    drop(listening);
    bridge.stop().await;
}
