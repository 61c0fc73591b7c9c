// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-layout status record.

use kanpe_core::PresentationState;
use thiserror::Error;

use crate::note::{clamp_note, encode_note};
use crate::{HEADER_LEN, MAX_RECORD_LEN, MIN_RECORD_LEN};

/// Errors from decoding a status record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("record too short: {0} bytes")]
    TooShort(usize),

    #[error("record too long: {0} bytes")]
    TooLong(usize),

    #[error("invalid flag byte {value:#04x} at offset {offset}")]
    InvalidFlag { offset: usize, value: u8 },

    #[error("note is not NUL terminated")]
    MissingTerminator,

    #[error("note is not valid UTF-8")]
    InvalidNote,
}

/// Typed form of the bytes written to the peripheral.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusRecord {
    pub has_presentation: bool,
    pub is_showing: bool,
    pub is_blackout: bool,
    pub current_page: u16,
    pub total_pages: u16,
    pub note: String,
}

impl StatusRecord {
    /// Record for a presentation state.
    ///
    /// Without a presentation every field is zero. Without a running show
    /// only `total_pages` survives. The note is clamped to what fits on the
    /// wire.
    pub fn from_state(state: &PresentationState) -> Self {
        if !state.has_presentation {
            return Self::default();
        }
        if !state.is_showing {
            return Self { has_presentation: true, total_pages: state.total_pages, ..Self::default() };
        }
        Self {
            has_presentation: true,
            is_showing: true,
            is_blackout: state.is_blackout,
            current_page: state.current_page,
            total_pages: state.total_pages,
            note: clamp_note(&state.note_text).to_string(),
        }
    }

    /// Record sent when the presentation state is unknown.
    pub fn no_presentation() -> Self {
        Self::default()
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.note.len() + 1);
        out.push(u8::from(self.has_presentation));
        out.push(u8::from(self.is_showing));
        out.push(u8::from(self.is_blackout));
        out.extend_from_slice(&self.current_page.to_le_bytes());
        out.extend_from_slice(&self.total_pages.to_le_bytes());
        encode_note(&self.note, &mut out);
        out
    }

    /// Parse a record as the peripheral does.
    ///
    /// Bytes after the note terminator are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        if bytes.len() < MIN_RECORD_LEN {
            return Err(ProtocolError::TooShort(bytes.len()));
        }
        if bytes.len() > MAX_RECORD_LEN {
            return Err(ProtocolError::TooLong(bytes.len()));
        }

        let flag = |offset: usize| match bytes[offset] {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(ProtocolError::InvalidFlag { offset, value }),
        };
        let has_presentation = flag(0)?;
        let is_showing = flag(1)?;
        let is_blackout = flag(2)?;
        let current_page = u16::from_le_bytes([bytes[3], bytes[4]]);
        let total_pages = u16::from_le_bytes([bytes[5], bytes[6]]);

        let section = &bytes[HEADER_LEN..];
        let end = section.iter().position(|b| *b == 0).ok_or(ProtocolError::MissingTerminator)?;
        let note = std::str::from_utf8(&section[..end])
            .map_err(|_| ProtocolError::InvalidNote)?
            .to_string();

        Ok(Self { has_presentation, is_showing, is_blackout, current_page, total_pages, note })
    }
}

impl From<&PresentationState> for StatusRecord {
    fn from(state: &PresentationState) -> Self {
        Self::from_state(state)
    }
}

/// Encode a presentation state as a status record.
pub fn encode(state: &PresentationState) -> Vec<u8> {
    StatusRecord::from_state(state).encode()
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
