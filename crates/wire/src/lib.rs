// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status record exchanged with the peripheral.
//!
//! Wire format (written host → peripheral, one record per write):
//!
//! ```text
//! offset  size  field
//! 0       1     has_presentation (0/1)
//! 1       1     is_showing       (0/1)
//! 2       1     is_blackout      (0/1)
//! 3       2     current_page     u16 LE
//! 5       2     total_pages      u16 LE
//! 7       1..   note             UTF-8, at most 299 bytes, NUL terminated
//! ```

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod note;
mod record;

pub use note::{clamp_note, encode_note, truncate_utf8};
pub use record::{encode, ProtocolError, StatusRecord};

/// Size of the flag and page header preceding the note.
pub const HEADER_LEN: usize = 7;

/// Longest note payload, excluding the terminator.
pub const NOTE_MAX_BYTES: usize = 299;

/// Shortest record: header plus an empty, terminated note.
pub const MIN_RECORD_LEN: usize = HEADER_LEN + 1;

/// Longest record: header plus a full note and its terminator.
pub const MAX_RECORD_LEN: usize = HEADER_LEN + NOTE_MAX_BYTES + 1;

#[cfg(test)]
mod property_tests;
