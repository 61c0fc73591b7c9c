// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Note section encoding.

use crate::NOTE_MAX_BYTES;

/// Longest prefix of `text` that fits in `max_bytes` without splitting a
/// code point.
pub fn truncate_utf8(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// The part of a note that fits on the wire.
///
/// The note is cut at the first interior NUL (the peripheral reads a C
/// string) and then truncated to [`NOTE_MAX_BYTES`].
pub fn clamp_note(note: &str) -> &str {
    let note = match note.find('\0') {
        Some(end) => &note[..end],
        None => note,
    };
    truncate_utf8(note, NOTE_MAX_BYTES)
}

/// Append a note as its NUL-terminated wire section.
pub fn encode_note(note: &str, out: &mut Vec<u8>) {
    out.extend_from_slice(clamp_note(note).as_bytes());
    out.push(0);
}

#[cfg(test)]
#[path = "note_tests.rs"]
mod tests;
