// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Presentation snapshots.
//!
//! [`Presentation`] is what an automation backend reports about the active
//! presentation. [`PresentationState`] is the flattened view the peripheral
//! sees; it is recomputed on every query and never stored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of an open slide show window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowPhase {
    Running,
    Paused,
    BlackScreen,
    WhiteScreen,
    /// The show ran past its last slide but the window is still open.
    Done,
}

impl ShowPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShowPhase::Running => "running",
            ShowPhase::Paused => "paused",
            ShowPhase::BlackScreen => "black_screen",
            ShowPhase::WhiteScreen => "white_screen",
            ShowPhase::Done => "done",
        }
    }

    /// Running or paused: the phases a blackout can be entered from.
    pub fn is_live(&self) -> bool {
        matches!(self, ShowPhase::Running | ShowPhase::Paused)
    }
}

impl fmt::Display for ShowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The open slide show window, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowView {
    pub phase: ShowPhase,
    /// 1-based index of the slide on screen
    pub current_page: u16,
    /// Speaker notes of the current slide; `None` when they could not be read.
    #[serde(default)]
    pub note: Option<String>,
}

/// Raw snapshot of the active presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub total_pages: u16,
    /// `None` when no slide show window is open.
    #[serde(default)]
    pub show: Option<ShowView>,
}

impl Presentation {
    /// A presentation with no slide show window.
    pub fn idle(total_pages: u16) -> Self {
        Self { total_pages, show: None }
    }

    pub fn phase(&self) -> Option<ShowPhase> {
        self.show.as_ref().map(|view| view.phase)
    }
}

/// Status reported to the peripheral.
///
/// `current_page` and `note_text` are only meaningful while `is_showing`;
/// otherwise they are `0` and empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationState {
    pub has_presentation: bool,
    pub is_showing: bool,
    pub is_blackout: bool,
    pub current_page: u16,
    pub total_pages: u16,
    pub note_text: String,
}

impl PresentationState {
    /// State reported when there is no presentation, or when it could not be
    /// determined at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Flatten a backend snapshot.
    ///
    /// A finished show (`ShowPhase::Done`) reports the same as a closed
    /// window: only the page count.
    pub fn from_presentation(presentation: &Presentation) -> Self {
        let idle = Self {
            has_presentation: true,
            total_pages: presentation.total_pages,
            ..Self::default()
        };
        match &presentation.show {
            None => idle,
            Some(view) if view.phase == ShowPhase::Done => idle,
            Some(view) => Self {
                is_showing: true,
                is_blackout: view.phase == ShowPhase::BlackScreen,
                current_page: view.current_page,
                note_text: view.note.as_deref().map(normalize_line_endings).unwrap_or_default(),
                ..idle
            },
        }
    }
}

impl From<&Presentation> for PresentationState {
    fn from(presentation: &Presentation) -> Self {
        Self::from_presentation(presentation)
    }
}

/// Convert every line break (`\r\n`, `\r`, `\n`) to `\r\n`.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").replace('\n', "\r\n")
}

#[cfg(test)]
#[path = "presentation_tests.rs"]
mod tests;
