// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process presentation used for dry runs and tests.
//!
//! Navigation follows the usual slide show rules: advancing past the last
//! slide leaves the window open in the `Done` phase, going back from `Done`
//! returns to the last slide, and navigating out of a black or white screen
//! resumes the show.

use kanpe_core::{Presentation, ShowPhase, ShowView};

use super::{Automation, AutomationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Show {
    phase: ShowPhase,
    page: u16,
}

/// A deck of slides with speaker notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedDeck {
    /// One entry per slide; `None` marks notes that cannot be read
    notes: Vec<Option<String>>,
    show: Option<Show>,
}

impl SimulatedDeck {
    /// A deck with `slides` slides and empty notes.
    pub fn new(slides: u16) -> Self {
        Self { notes: vec![Some(String::new()); usize::from(slides)], show: None }
    }

    /// A deck with one slide per note.
    ///
    /// Slide counts are capped at `u16::MAX`.
    pub fn with_notes<I, S>(notes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let notes = notes.into_iter().take(usize::from(u16::MAX)).map(|n| Some(n.into())).collect();
        Self { notes, show: None }
    }

    /// Mark the note of a 1-based slide as unreadable.
    pub fn corrupt_note(&mut self, page: u16) {
        if let Some(note) = self.notes.get_mut(usize::from(page).wrapping_sub(1)) {
            *note = None;
        }
    }

    /// Force the phase of an open show (for paused or white screen states
    /// that no command produces).
    pub fn set_phase(&mut self, phase: ShowPhase) -> Result<(), AutomationError> {
        let show = self.show_mut()?;
        show.phase = phase;
        Ok(())
    }

    pub fn total_pages(&self) -> u16 {
        // Capped in the constructors
        u16::try_from(self.notes.len()).unwrap_or(u16::MAX)
    }

    pub fn is_showing(&self) -> bool {
        self.show.is_some()
    }

    fn show_mut(&mut self) -> Result<&mut Show, AutomationError> {
        self.show.as_mut().ok_or_else(|| AutomationError::Failed("no slide show window".into()))
    }

    fn note(&self, page: u16) -> Option<String> {
        self.notes.get(usize::from(page).wrapping_sub(1)).cloned().flatten()
    }
}

impl Automation for SimulatedDeck {
    fn query(&mut self) -> Result<Presentation, AutomationError> {
        let show = self.show.map(|show| ShowView {
            phase: show.phase,
            current_page: show.page,
            note: self.note(show.page),
        });
        Ok(Presentation { total_pages: self.total_pages(), show })
    }

    fn start_show(&mut self) -> Result<(), AutomationError> {
        if self.show.is_some() {
            return Err(AutomationError::Failed("slide show already running".into()));
        }
        if self.notes.is_empty() {
            return Err(AutomationError::Failed("presentation has no slides".into()));
        }
        self.show = Some(Show { phase: ShowPhase::Running, page: 1 });
        Ok(())
    }

    fn end_show(&mut self) -> Result<(), AutomationError> {
        self.show_mut()?;
        self.show = None;
        Ok(())
    }

    fn next(&mut self) -> Result<(), AutomationError> {
        let total = self.total_pages();
        let show = self.show_mut()?;
        match show.phase {
            ShowPhase::Done => {}
            ShowPhase::BlackScreen | ShowPhase::WhiteScreen => show.phase = ShowPhase::Running,
            ShowPhase::Running | ShowPhase::Paused if show.page >= total => {
                show.phase = ShowPhase::Done;
            }
            ShowPhase::Running | ShowPhase::Paused => {
                show.page += 1;
                show.phase = ShowPhase::Running;
            }
        }
        Ok(())
    }

    fn previous(&mut self) -> Result<(), AutomationError> {
        let show = self.show_mut()?;
        match show.phase {
            ShowPhase::Done => show.phase = ShowPhase::Running,
            ShowPhase::BlackScreen | ShowPhase::WhiteScreen => show.phase = ShowPhase::Running,
            ShowPhase::Running | ShowPhase::Paused => {
                show.page = show.page.saturating_sub(1).max(1);
                show.phase = ShowPhase::Running;
            }
        }
        Ok(())
    }

    fn enter_blackout(&mut self) -> Result<(), AutomationError> {
        self.show_mut()?.phase = ShowPhase::BlackScreen;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), AutomationError> {
        self.show_mut()?.phase = ShowPhase::Running;
        Ok(())
    }
}

#[cfg(test)]
#[path = "simulated_tests.rs"]
mod tests;
