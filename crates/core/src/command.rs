// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commands sent by the peripheral.
//!
//! The peripheral notifies short ASCII keywords. Anything outside the fixed
//! keyword set is kept verbatim as [`Command::Unknown`] so it can still be
//! answered with a status record.

use std::fmt;

/// A command decoded from one inbound notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the slide show, or end it when a show window is already open.
    Start,
    Next,
    Prev,
    /// Enter blackout while the show is running, otherwise resume it.
    Black,
    /// Report status without touching the presentation.
    Check,
    Unknown(String),
}

impl Command {
    /// Decode a notification payload.
    ///
    /// The payload is read as a C string (bytes after the first NUL are
    /// ignored). Invalid UTF-8 sequences are dropped rather than rejected, and
    /// surrounding whitespace is trimmed before matching keywords.
    pub fn parse(payload: &[u8]) -> Self {
        let payload = match payload.iter().position(|b| *b == 0) {
            Some(end) => &payload[..end],
            None => payload,
        };
        let text: String = payload.utf8_chunks().map(|chunk| chunk.valid()).collect();
        Self::from_keyword(text.trim())
    }

    /// Match a trimmed keyword. Matching is case-sensitive.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "start" => Command::Start,
            "next" => Command::Next,
            "prev" => Command::Prev,
            "black" => Command::Black,
            "check" => Command::Check,
            other => Command::Unknown(other.to_string()),
        }
    }

    /// Wire keyword for known commands; the raw text for unknown ones.
    pub fn as_str(&self) -> &str {
        match self {
            Command::Start => "start",
            Command::Next => "next",
            Command::Prev => "prev",
            Command::Black => "black",
            Command::Check => "check",
            Command::Unknown(text) => text,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
