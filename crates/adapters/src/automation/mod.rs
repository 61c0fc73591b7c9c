// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Presentation automation backends
//!
//! The [`Automation`] trait is a blocking interface to a presentation engine.
//! Backends are assumed non-reentrant: the daemon only ever drives one from a
//! single dedicated thread, one call at a time.

mod command;
mod simulated;

pub use command::CommandAutomation;
pub use simulated::SimulatedDeck;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{AutomationCall, FakeAutomation};

use kanpe_core::Presentation;
use thiserror::Error;

/// Errors from automation backends
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomationError {
    /// No host application or no active presentation.
    #[error("no presentation available")]
    Unavailable,
    #[error("automation call failed: {0}")]
    Failed(String),
    #[error("malformed automation output: {0}")]
    Malformed(String),
}

/// Blocking capability over a running presentation engine.
pub trait Automation: Send + 'static {
    /// Snapshot the active presentation.
    ///
    /// Fails with [`AutomationError::Unavailable`] when there is none.
    fn query(&mut self) -> Result<Presentation, AutomationError>;

    /// Open a slide show window from the first slide.
    fn start_show(&mut self) -> Result<(), AutomationError>;

    /// Close the slide show window.
    fn end_show(&mut self) -> Result<(), AutomationError>;

    fn next(&mut self) -> Result<(), AutomationError>;

    fn previous(&mut self) -> Result<(), AutomationError>;

    fn enter_blackout(&mut self) -> Result<(), AutomationError>;

    /// Return to the running phase from blackout or any other paused phase.
    fn resume(&mut self) -> Result<(), AutomationError>;
}

impl<A: Automation + ?Sized> Automation for Box<A> {
    fn query(&mut self) -> Result<Presentation, AutomationError> {
        (**self).query()
    }

    fn start_show(&mut self) -> Result<(), AutomationError> {
        (**self).start_show()
    }

    fn end_show(&mut self) -> Result<(), AutomationError> {
        (**self).end_show()
    }

    fn next(&mut self) -> Result<(), AutomationError> {
        (**self).next()
    }

    fn previous(&mut self) -> Result<(), AutomationError> {
        (**self).previous()
    }

    fn enter_blackout(&mut self) -> Result<(), AutomationError> {
        (**self).enter_blackout()
    }

    fn resume(&mut self) -> Result<(), AutomationError> {
        (**self).resume()
    }
}
