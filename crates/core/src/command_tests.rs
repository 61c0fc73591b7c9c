// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    start = { b"start", Command::Start },
    next  = { b"next",  Command::Next },
    prev  = { b"prev",  Command::Prev },
    black = { b"black", Command::Black },
    check = { b"check", Command::Check },
)]
fn parse_known_keywords(payload: &[u8], expected: Command) {
    assert_eq!(Command::parse(payload), expected);
}

#[yare::parameterized(
    trailing_newline = { b"next\r\n" },
    leading_spaces   = { b"   next" },
    tabs             = { b"\tnext\t" },
    trailing_nul_pad = { b"next\0" },
)]
fn parse_trims_surrounding_whitespace(payload: &[u8]) {
    assert_eq!(Command::parse(payload), Command::Next);
}

#[test]
fn parse_stops_at_first_nul() {
    assert_eq!(Command::parse(b"black\0garbage"), Command::Black);
}

#[test]
fn parse_unrecognized_keeps_trimmed_text() {
    assert_eq!(Command::parse(b" xyz \n"), Command::Unknown("xyz".to_string()));
}

#[test]
fn parse_is_case_sensitive() {
    assert_eq!(Command::parse(b"START"), Command::Unknown("START".to_string()));
}

#[test]
fn parse_empty_payload_is_unknown() {
    assert_eq!(Command::parse(b""), Command::Unknown(String::new()));
    assert_eq!(Command::parse(b"  \r\n"), Command::Unknown(String::new()));
}

#[test]
fn parse_drops_invalid_utf8() {
    assert_eq!(Command::parse(b"bl\xffack"), Command::Black);
}

#[test]
fn parse_keeps_literal_replacement_character() {
    assert_eq!(
        Command::parse("x\u{FFFD}".as_bytes()),
        Command::Unknown("x\u{FFFD}".to_string())
    );
}

#[test]
fn display_uses_wire_keyword() {
    assert_eq!(Command::Prev.to_string(), "prev");
    assert_eq!(Command::Unknown("hello".to_string()).to_string(), "hello");
}
