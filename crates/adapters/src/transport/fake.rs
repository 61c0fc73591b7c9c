// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake transport for testing

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{Link, LinkTarget, NotifyHandler, Transport, TransportError};

#[derive(Default)]
struct FakeTransportState {
    connect_errors: VecDeque<TransportError>,
    subscribe_errors: VecDeque<TransportError>,
    write_errors: VecDeque<TransportError>,
    connect_attempts: usize,
    /// Incremented on every successful connect; links from older sessions are dead
    session: u64,
    connected: bool,
    handler: Option<NotifyHandler>,
    unsubscribes: usize,
    writes: Vec<Vec<u8>>,
    targets: Vec<LinkTarget>,
}

/// Fake transport for testing.
///
/// Connects instantly unless told to fail, records every successful write,
/// and lets tests play the peripheral: inject notifications with
/// [`FakeTransport::notify`] and drop the link with
/// [`FakeTransport::drop_link`]. Clones share state.
#[derive(Clone, Default)]
pub struct FakeTransport {
    inner: Arc<Mutex<FakeTransportState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` connect attempts with `error`.
    pub fn fail_next_connects(&self, count: usize, error: TransportError) {
        let mut state = self.inner.lock();
        for _ in 0..count {
            state.connect_errors.push_back(error.clone());
        }
    }

    pub fn fail_next_subscribe(&self, error: TransportError) {
        self.inner.lock().subscribe_errors.push_back(error);
    }

    pub fn fail_next_write(&self, error: TransportError) {
        self.inner.lock().write_errors.push_back(error);
    }

    /// Simulate the peripheral going away.
    pub fn drop_link(&self) {
        let mut state = self.inner.lock();
        state.connected = false;
        state.handler = None;
    }

    /// Deliver a notification as the peripheral would.
    ///
    /// Returns false when nothing is subscribed.
    pub fn notify(&self, payload: &[u8]) -> bool {
        // Call outside the lock; the handler may be slow or re-enter the fake
        let handler = self.inner.lock().handler.clone();
        match handler {
            Some(handler) => {
                handler(payload.to_vec());
                true
            }
            None => false,
        }
    }

    /// All successful writes, in order
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.inner.lock().writes.clone()
    }

    pub fn connect_attempts(&self) -> usize {
        self.inner.lock().connect_attempts
    }

    /// Number of successful connects
    pub fn sessions(&self) -> u64 {
        self.inner.lock().session
    }

    pub fn is_connected(&self) -> bool {
        self.inner.lock().connected
    }

    pub fn is_subscribed(&self) -> bool {
        self.inner.lock().handler.is_some()
    }

    pub fn unsubscribes(&self) -> usize {
        self.inner.lock().unsubscribes
    }

    /// Targets passed to connect, in order
    pub fn targets(&self) -> Vec<LinkTarget> {
        self.inner.lock().targets.clone()
    }

    /// Wait until at least `count` writes were recorded, returning them.
    ///
    /// Returns whatever was written so far if `timeout` elapses first.
    pub async fn wait_for_writes(&self, count: usize, timeout: Duration) -> Vec<Vec<u8>> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let writes = self.writes();
            if writes.len() >= count || tokio::time::Instant::now() >= deadline {
                return writes;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    /// Wait until a link is connected and subscribed.
    pub async fn wait_for_subscribed(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.is_connected() && self.is_subscribed() {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    type Link = FakeLink;

    async fn connect(&self, target: &LinkTarget) -> Result<FakeLink, TransportError> {
        let mut state = self.inner.lock();
        state.connect_attempts += 1;
        state.targets.push(target.clone());
        if let Some(error) = state.connect_errors.pop_front() {
            return Err(error);
        }
        state.session += 1;
        state.connected = true;
        state.handler = None;
        Ok(FakeLink { inner: Arc::clone(&self.inner), session: state.session })
    }
}

/// Link handed out by [`FakeTransport`]
pub struct FakeLink {
    inner: Arc<Mutex<FakeTransportState>>,
    session: u64,
}

impl FakeLink {
    fn check_live(state: &FakeTransportState, session: u64) -> Result<(), TransportError> {
        if state.connected && state.session == session {
            Ok(())
        } else {
            Err(TransportError::Disconnected)
        }
    }
}

#[async_trait]
impl Link for FakeLink {
    async fn subscribe(&mut self, handler: NotifyHandler) -> Result<(), TransportError> {
        let mut state = self.inner.lock();
        Self::check_live(&state, self.session)?;
        if let Some(error) = state.subscribe_errors.pop_front() {
            return Err(error);
        }
        state.handler = Some(handler);
        Ok(())
    }

    async fn unsubscribe(&mut self) -> Result<(), TransportError> {
        let mut state = self.inner.lock();
        state.unsubscribes += 1;
        Self::check_live(&state, self.session)?;
        state.handler = None;
        Ok(())
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let mut state = self.inner.lock();
        Self::check_live(&state, self.session)?;
        if let Some(error) = state.write_errors.pop_front() {
            return Err(error);
        }
        state.writes.push(bytes.to_vec());
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        let state = self.inner.lock();
        Self::check_live(&state, self.session).is_ok()
    }

    async fn disconnect(&mut self) {
        let mut state = self.inner.lock();
        if state.session == self.session {
            state.connected = false;
            state.handler = None;
        }
    }
}
