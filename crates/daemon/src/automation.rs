// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Automation worker: the only caller of the automation backend.
//!
//! Runs on a dedicated OS thread because backends block and are not
//! reentrant. Commands are taken from the command queue one at a time, and
//! every command taken produces exactly one status record on the response
//! queue, whatever happened while executing it.

use std::thread::JoinHandle;
use std::time::Duration;

use kanpe_adapters::{Automation, AutomationError};
use kanpe_core::{Command, Presentation, PresentationState};
use kanpe_wire::StatusRecord;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::queue::{Consumer, Popped, Producer};

/// Worker that serially drains the command queue.
pub struct AutomationWorker<A> {
    automation: A,
    commands: Consumer<Command>,
    responses: Producer<Vec<u8>>,
    idle_poll: Duration,
    cancel: CancellationToken,
}

impl<A: Automation> AutomationWorker<A> {
    pub fn new(
        automation: A,
        commands: Consumer<Command>,
        responses: Producer<Vec<u8>>,
        idle_poll: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self { automation, commands, responses, idle_poll, cancel }
    }

    /// Run the worker on its own named thread.
    pub fn spawn(self) -> std::io::Result<JoinHandle<()>> {
        std::thread::Builder::new().name("automation".to_string()).spawn(move || self.run())
    }

    /// Process commands until cancelled.
    ///
    /// Also stops when either queue is closed, which only happens once the
    /// link worker is gone during shutdown.
    pub fn run(mut self) {
        info!(idle_poll_ms = self.idle_poll.as_millis() as u64, "automation worker started");
        while !self.cancel.is_cancelled() {
            match self.commands.try_pop() {
                Popped::Item(command) => {
                    let record = process(&mut self.automation, &command);
                    if self.responses.push(record).is_err() {
                        debug!(%command, "response queue closed, dropping status");
                        break;
                    }
                }
                Popped::Empty => std::thread::sleep(self.idle_poll),
                Popped::Closed => {
                    debug!("command queue closed");
                    break;
                }
            }
        }
        info!("automation worker stopped");
    }
}

/// Execute one command and encode the resulting status.
///
/// Never fails: backend errors are logged and the status falls back to the
/// "no presentation" record when the state cannot be read.
pub fn process<A: Automation + ?Sized>(automation: &mut A, command: &Command) -> Vec<u8> {
    let presentation = match automation.query() {
        Ok(presentation) => presentation,
        Err(AutomationError::Unavailable) => {
            info!(%command, "no active presentation");
            return StatusRecord::no_presentation().encode();
        }
        Err(e) => {
            warn!(%command, error = %e, "presentation query failed");
            return StatusRecord::no_presentation().encode();
        }
    };

    if let Err(e) = dispatch(automation, command, &presentation) {
        warn!(%command, error = %e, "command failed");
    }

    // Report the effect, not the intent
    report(automation)
}

/// Apply a command to the presentation, branching on its observed state.
fn dispatch<A: Automation + ?Sized>(
    automation: &mut A,
    command: &Command,
    presentation: &Presentation,
) -> Result<(), AutomationError> {
    match (command, presentation.phase()) {
        (Command::Start, None) => {
            automation.start_show()?;
            info!("slide show started");
        }
        (Command::Start, Some(_)) => {
            automation.end_show()?;
            info!("slide show ended");
        }
        (Command::Next, Some(_)) => {
            automation.next()?;
            debug!("next slide");
        }
        (Command::Prev, Some(_)) => {
            automation.previous()?;
            debug!("previous slide");
        }
        (Command::Black, Some(phase)) if phase.is_live() => {
            automation.enter_blackout()?;
            info!("blackout");
        }
        (Command::Black, Some(phase)) => {
            automation.resume()?;
            info!(from = %phase, "slide show resumed");
        }
        (Command::Next | Command::Prev | Command::Black, None) => {
            info!(%command, "no slide show running");
        }
        (Command::Check, _) => debug!("status check"),
        (Command::Unknown(text), _) => warn!(command = %text, "unknown command"),
    }
    Ok(())
}

/// Query the backend again and encode what it reports.
fn report<A: Automation + ?Sized>(automation: &mut A) -> Vec<u8> {
    let state = match automation.query() {
        Ok(presentation) => PresentationState::from(&presentation),
        Err(AutomationError::Unavailable) => PresentationState::none(),
        Err(e) => {
            warn!(error = %e, "status query failed");
            PresentationState::none()
        }
    };
    debug!(?state, "status");
    kanpe_wire::encode(&state)
}

#[cfg(test)]
#[path = "automation_tests.rs"]
mod tests;
