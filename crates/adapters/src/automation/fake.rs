// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake automation backend for testing

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use kanpe_core::{Presentation, ShowPhase};
use parking_lot::Mutex;

use super::{Automation, AutomationError, SimulatedDeck};

/// Recorded automation call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomationCall {
    Query,
    StartShow,
    EndShow,
    Next,
    Previous,
    EnterBlackout,
    Resume,
}

impl AutomationCall {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, AutomationCall::Query)
    }
}

struct FakeAutomationState {
    /// `None` means no presentation is open
    deck: Option<SimulatedDeck>,
    calls: Vec<AutomationCall>,
    query_errors: VecDeque<AutomationError>,
    action_errors: VecDeque<AutomationError>,
    /// Delay added to every call
    latency: Duration,
}

/// Fake automation backend for testing.
///
/// Wraps a [`SimulatedDeck`] so actions have realistic effects, records every
/// call, and can be told to fail upcoming calls. Clones share state, so a test
/// can keep a handle while the worker owns another.
#[derive(Clone)]
pub struct FakeAutomation {
    inner: Arc<Mutex<FakeAutomationState>>,
}

impl Default for FakeAutomation {
    fn default() -> Self {
        Self::new(None)
    }
}

impl FakeAutomation {
    fn new(deck: Option<SimulatedDeck>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeAutomationState {
                deck,
                calls: Vec::new(),
                query_errors: VecDeque::new(),
                action_errors: VecDeque::new(),
                latency: Duration::ZERO,
            })),
        }
    }

    /// Backend with no open presentation.
    pub fn without_presentation() -> Self {
        Self::default()
    }

    /// Backend with an open presentation.
    pub fn with_deck(deck: SimulatedDeck) -> Self {
        Self::new(Some(deck))
    }

    /// Open (or replace) the presentation.
    pub fn open(&self, deck: SimulatedDeck) {
        self.inner.lock().deck = Some(deck);
    }

    /// Close the presentation.
    pub fn close(&self) {
        self.inner.lock().deck = None;
    }

    /// Force the phase of the open show.
    pub fn set_phase(&self, phase: ShowPhase) -> Result<(), AutomationError> {
        match self.inner.lock().deck.as_mut() {
            Some(deck) => deck.set_phase(phase),
            None => Err(AutomationError::Unavailable),
        }
    }

    /// Fail the next query with `error`. Queued errors are used in order.
    pub fn fail_next_query(&self, error: AutomationError) {
        self.inner.lock().query_errors.push_back(error);
    }

    /// Fail the next action (any non-query call) with `error`.
    pub fn fail_next_action(&self, error: AutomationError) {
        self.inner.lock().action_errors.push_back(error);
    }

    /// Make every call block for `latency`, like a slow automation server.
    pub fn set_latency(&self, latency: Duration) {
        self.inner.lock().latency = latency;
    }

    fn pause(&self) {
        let latency = self.inner.lock().latency;
        if !latency.is_zero() {
            std::thread::sleep(latency);
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<AutomationCall> {
        self.inner.lock().calls.clone()
    }

    /// Recorded calls that could change presentation state
    pub fn mutations(&self) -> Vec<AutomationCall> {
        self.calls().into_iter().filter(AutomationCall::is_mutation).collect()
    }

    /// Current snapshot without recording a call.
    pub fn peek(&self) -> Option<Presentation> {
        self.inner.lock().deck.as_mut().and_then(|deck| deck.query().ok())
    }

    fn act(
        &mut self,
        call: AutomationCall,
        action: impl FnOnce(&mut SimulatedDeck) -> Result<(), AutomationError>,
    ) -> Result<(), AutomationError> {
        self.pause();
        let mut state = self.inner.lock();
        state.calls.push(call);
        if let Some(error) = state.action_errors.pop_front() {
            return Err(error);
        }
        match state.deck.as_mut() {
            Some(deck) => action(deck),
            None => Err(AutomationError::Unavailable),
        }
    }
}

impl Automation for FakeAutomation {
    fn query(&mut self) -> Result<Presentation, AutomationError> {
        self.pause();
        let mut state = self.inner.lock();
        state.calls.push(AutomationCall::Query);
        if let Some(error) = state.query_errors.pop_front() {
            return Err(error);
        }
        match state.deck.as_mut() {
            Some(deck) => deck.query(),
            None => Err(AutomationError::Unavailable),
        }
    }

    fn start_show(&mut self) -> Result<(), AutomationError> {
        self.act(AutomationCall::StartShow, SimulatedDeck::start_show)
    }

    fn end_show(&mut self) -> Result<(), AutomationError> {
        self.act(AutomationCall::EndShow, SimulatedDeck::end_show)
    }

    fn next(&mut self) -> Result<(), AutomationError> {
        self.act(AutomationCall::Next, SimulatedDeck::next)
    }

    fn previous(&mut self) -> Result<(), AutomationError> {
        self.act(AutomationCall::Previous, SimulatedDeck::previous)
    }

    fn enter_blackout(&mut self) -> Result<(), AutomationError> {
        self.act(AutomationCall::EnterBlackout, SimulatedDeck::enter_blackout)
    }

    fn resume(&mut self) -> Result<(), AutomationError> {
        self.act(AutomationCall::Resume, SimulatedDeck::resume)
    }
}
