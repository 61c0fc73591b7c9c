// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Automation through an external helper program.
//!
//! Each capability call runs `<program> <args...> <verb>` and waits for it.
//! The `state` verb prints the active presentation as JSON on stdout:
//!
//! ```json
//! {"total_pages": 12, "show": {"phase": "running", "current_page": 3, "note": "..."}}
//! ```
//!
//! `show` is `null` when no slide show window is open. Printing `null`, or
//! exiting with [`EXIT_UNAVAILABLE`], means there is no presentation.
//! Other verbs (`start`, `end`, `next`, `previous`, `blackout`, `resume`)
//! only report success through their exit status.

use std::path::PathBuf;
use std::process::{Command, Output};

use kanpe_core::{Presentation, ShowPhase, ShowView};
use serde::Deserialize;

use super::{Automation, AutomationError};

/// Exit status a helper uses to report that no presentation is open.
pub const EXIT_UNAVAILABLE: i32 = 3;

#[derive(Deserialize)]
struct RawPresentation {
    total_pages: u16,
    #[serde(default)]
    show: Option<RawShow>,
}

#[derive(Deserialize)]
struct RawShow {
    phase: ShowPhase,
    current_page: u16,
    #[serde(default)]
    note: serde_json::Value,
}

/// Automation backend that shells out to a helper program.
#[derive(Debug, Clone)]
pub struct CommandAutomation {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandAutomation {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    fn run(&self, verb: &str) -> Result<Output, AutomationError> {
        tracing::debug!(program = %self.program.display(), verb, "running automation helper");
        Command::new(&self.program)
            .args(&self.args)
            .arg(verb)
            .output()
            .map_err(|e| AutomationError::Failed(format!("{}: {e}", self.program.display())))
    }

    fn action(&self, verb: &str) -> Result<(), AutomationError> {
        let output = self.run(verb)?;
        if output.status.success() {
            return Ok(());
        }
        if output.status.code() == Some(EXIT_UNAVAILABLE) {
            return Err(AutomationError::Unavailable);
        }
        Err(AutomationError::Failed(failure_message(verb, &output)))
    }
}

fn failure_message(verb: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("{verb} exited with {}", output.status)
    } else {
        format!("{verb} exited with {}: {stderr}", output.status)
    }
}

/// Parse the output of the `state` verb.
///
/// Notes that are not strings, or that were not valid UTF-8, are reported
/// as unreadable (`note: None`) instead of failing the whole query.
pub(crate) fn parse_state(stdout: &[u8]) -> Result<Presentation, AutomationError> {
    // Only a lossy decode can have put U+FFFD in place of bad bytes
    let (text, lossy) = match std::str::from_utf8(stdout) {
        Ok(text) => (std::borrow::Cow::Borrowed(text), false),
        Err(_) => (String::from_utf8_lossy(stdout), true),
    };
    let raw: Option<RawPresentation> =
        serde_json::from_str(text.trim()).map_err(|e| AutomationError::Malformed(e.to_string()))?;
    let raw = raw.ok_or(AutomationError::Unavailable)?;

    let show = raw.show.map(|show| {
        let note = match show.note {
            serde_json::Value::String(note) if !(lossy && note.contains(char::REPLACEMENT_CHARACTER)) => {
                Some(note)
            }
            serde_json::Value::Null => Some(String::new()),
            _ => None,
        };
        ShowView { phase: show.phase, current_page: show.current_page, note }
    });
    Ok(Presentation { total_pages: raw.total_pages, show })
}

impl Automation for CommandAutomation {
    fn query(&mut self) -> Result<Presentation, AutomationError> {
        let output = self.run("state")?;
        if output.status.code() == Some(EXIT_UNAVAILABLE) {
            return Err(AutomationError::Unavailable);
        }
        if !output.status.success() {
            return Err(AutomationError::Failed(failure_message("state", &output)));
        }
        parse_state(&output.stdout)
    }

    fn start_show(&mut self) -> Result<(), AutomationError> {
        self.action("start")
    }

    fn end_show(&mut self) -> Result<(), AutomationError> {
        self.action("end")
    }

    fn next(&mut self) -> Result<(), AutomationError> {
        self.action("next")
    }

    fn previous(&mut self) -> Result<(), AutomationError> {
        self.action("previous")
    }

    fn enter_blackout(&mut self) -> Result<(), AutomationError> {
        self.action("blackout")
    }

    fn resume(&mut self) -> Result<(), AutomationError> {
        self.action("resume")
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
