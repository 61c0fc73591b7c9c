// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote commands and the records answering them

use crate::prelude::*;

#[tokio::test]
async fn start_without_show_starts_on_first_slide() {
    let bridge = Bridge::connected(deck(["welcome", "agenda"])).await;

    let record = bridge.request("start").await;
    assert!(record.has_presentation);
    assert!(record.is_showing);
    assert!(!record.is_blackout);
    assert_eq!(record.current_page, 1);
    assert_eq!(record.total_pages, 2);
    assert_eq!(record.note, "welcome");
    bridge.stop().await;
}

#[tokio::test]
async fn start_during_show_ends_it() {
    let bridge = Bridge::connected(deck(["welcome", "agenda"])).await;
    bridge.request("start").await;
    bridge.request("next").await;

    let record = bridge.request("start").await;
    similar_asserts::assert_eq!(
        record,
        StatusRecord { has_presentation: true, total_pages: 2, ..StatusRecord::default() }
    );
    bridge.stop().await;
}

#[tokio::test]
async fn navigation_walks_the_deck() {
    let bridge = Bridge::connected(deck(["one", "two", "three"])).await;
    bridge.request("start").await;

    let pages = [
        ("next", 2, "two"),
        ("next", 3, "three"),
        ("prev", 2, "two"),
        ("prev", 1, "one"),
        ("prev", 1, "one"),
    ];
    for (command, page, note) in pages {
        let record = bridge.request(command).await;
        assert_eq!((record.current_page, record.note.as_str()), (page, note), "after {command}");
    }
    bridge.stop().await;
}

#[tokio::test]
async fn next_past_last_slide_reports_show_not_running() {
    let bridge = Bridge::connected(deck(["only"])).await;
    bridge.request("start").await;

    let record = bridge.request("next").await;
    assert!(record.has_presentation);
    assert!(!record.is_showing);
    assert_eq!(record.current_page, 0);

    // The finished show window is still open, so start closes it
    bridge.request("start").await;
    assert_eq!(bridge.automation.mutations().last(), Some(&AutomationCall::EndShow));
    bridge.stop().await;
}

#[tokio::test]
async fn black_toggles_blackout() {
    let bridge = Bridge::connected(deck(["one", "two"])).await;
    bridge.request("start").await;

    let blackouts: Vec<bool> = [
        bridge.request("black").await,
        bridge.request("black").await,
        bridge.request("black").await,
    ]
    .iter()
    .map(|r| r.is_blackout)
    .collect();
    assert_eq!(blackouts, vec![true, false, true]);
    bridge.stop().await;
}

#[tokio::test]
async fn black_from_white_screen_resumes() {
    let bridge = Bridge::connected(deck(["one"])).await;
    bridge.request("start").await;
    bridge.automation.set_phase(ShowPhase::WhiteScreen).unwrap();

    let record = bridge.request("black").await;
    assert!(record.is_showing);
    assert!(!record.is_blackout);
    assert_eq!(bridge.automation.mutations().last(), Some(&AutomationCall::Resume));
    bridge.stop().await;
}

#[tokio::test]
async fn unknown_text_changes_nothing_and_answers_like_check() {
    let bridge = Bridge::connected(deck(["one", "two"])).await;
    bridge.request("start").await;
    bridge.request("next").await;
    let mutations = bridge.automation.mutations();

    let check = bridge.request("check").await;
    let unknown = bridge.request("fire the lasers").await;
    similar_asserts::assert_eq!(unknown, check);
    assert_eq!(bridge.automation.mutations(), mutations);
    bridge.stop().await;
}

#[tokio::test]
async fn keywords_are_trimmed_but_case_sensitive() {
    let bridge = Bridge::connected(deck(["one", "two"])).await;
    bridge.request(" start\r\n").await;

    let record = bridge.request("NEXT").await;
    assert_eq!(record.current_page, 1);
    let record = bridge.request("next\n").await;
    assert_eq!(record.current_page, 2);
    bridge.stop().await;
}

#[tokio::test]
async fn every_command_gets_one_record_in_order() {
    let bridge = Bridge::connected(deck(["1", "2", "3", "4", "5", "6"])).await;
    let burst = ["start", "next", "check", "next", "bogus", "prev", "next", "next"];
    for command in burst {
        bridge.send(command);
    }

    let pages: Vec<u16> = bridge.records(burst.len()).await.iter().map(|r| r.current_page).collect();
    assert_eq!(pages, vec![1, 2, 2, 3, 3, 2, 3, 4]);

    // Nothing beyond one record per command
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(bridge.transport.writes().len(), burst.len());
    bridge.stop().await;
}
