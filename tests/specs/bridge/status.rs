// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status records as they reach the peripheral

use crate::prelude::*;
use kanpe_adapters::AutomationError;

#[tokio::test]
async fn no_presentation_is_all_zero() {
    let bridge = Bridge::connected(FakeAutomation::without_presentation()).await;

    for command in ["start", "next", "black", "check"] {
        bridge.send(command);
    }
    let writes = bridge.transport.wait_for_writes(4, WAIT).await;
    assert_eq!(writes, vec![vec![0u8; 8]; 4]);
    assert!(bridge.automation.mutations().is_empty());
    bridge.stop().await;
}

#[tokio::test]
async fn presentation_closed_mid_show_reports_no_presentation() {
    let bridge = Bridge::connected(deck(["one", "two"])).await;
    bridge.request("start").await;
    bridge.automation.close();

    assert_eq!(bridge.request("next").await, StatusRecord::no_presentation());
    bridge.stop().await;
}

#[tokio::test]
async fn backend_failure_still_answers() {
    let bridge = Bridge::connected(deck(["one"])).await;
    bridge.automation.fail_next_query(AutomationError::Failed("rpc server unavailable".into()));

    assert_eq!(bridge.request("check").await, StatusRecord::no_presentation());
    assert!(bridge.request("check").await.has_presentation);
    bridge.stop().await;
}

#[tokio::test]
async fn repeated_check_is_idempotent() {
    let bridge = Bridge::connected(deck(["one", "two"])).await;
    bridge.request("start").await;

    let first = bridge.request("check").await;
    for _ in 0..5 {
        similar_asserts::assert_eq!(bridge.request("check").await, first);
    }
    bridge.stop().await;
}

#[tokio::test]
async fn long_note_is_cut_at_a_character_boundary() {
    let note = "ノート".repeat(200);
    let bridge = Bridge::connected(deck([note.as_str()])).await;
    bridge.request("start").await;

    let bytes = bridge.transport.writes().remove(0);
    assert!(bytes.len() <= 307);
    assert_eq!(bytes.last(), Some(&0));
    let text = std::str::from_utf8(&bytes[7..bytes.len() - 1]).unwrap();
    assert!(text.len() <= 299);
    assert!(note.starts_with(text));
    bridge.stop().await;
}

#[tokio::test]
async fn note_line_endings_become_crlf() {
    let bridge = Bridge::connected(deck(["line one\rline two\nline three\r\n"])).await;

    let record = bridge.request("start").await;
    assert_eq!(record.note, "line one\r\nline two\r\nline three\r\n");
    bridge.stop().await;
}

#[tokio::test]
async fn unreadable_note_is_sent_empty() {
    let mut slides = SimulatedDeck::with_notes(["fine", "garbled"]);
    slides.corrupt_note(2);
    let bridge = Bridge::connected(FakeAutomation::with_deck(slides)).await;
    bridge.request("start").await;

    let record = bridge.request("next").await;
    assert!(record.is_showing);
    assert_eq!(record.current_page, 2);
    assert_eq!(record.note, "");
    bridge.stop().await;
}
