// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Link worker: keeps the peripheral connected.
//!
//! Inbound notifications become commands on the command queue. Status records
//! from the response queue are written back while a session is listening;
//! records produced while disconnected stay queued until the next session.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use kanpe_adapters::{Link, LinkTarget, NotifyHandler, Transport};
use kanpe_core::Command;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::queue::{Consumer, Popped, Producer};

/// Connection state, published for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
    /// Subscribed to commands and writing responses
    Listening,
}

impl LinkState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkState::Disconnected => "disconnected",
            LinkState::Connecting => "connecting",
            LinkState::Connected => "connected",
            LinkState::Listening => "listening",
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    /// Subscribe or write failed
    Failed,
    /// Peripheral went away between writes
    Lost,
    Cancelled,
    /// Response queue closed, nothing left to deliver
    Closed,
}

/// Worker owning the transport side of the bridge.
pub struct LinkWorker<T: Transport> {
    transport: T,
    target: LinkTarget,
    commands: Producer<Command>,
    responses: Consumer<Vec<u8>>,
    reconnect_backoff: Duration,
    response_wait: Duration,
    cancel: CancellationToken,
    state: watch::Sender<LinkState>,
}

impl<T: Transport> LinkWorker<T> {
    pub fn new(
        transport: T,
        target: LinkTarget,
        commands: Producer<Command>,
        responses: Consumer<Vec<u8>>,
        reconnect_backoff: Duration,
        response_wait: Duration,
        cancel: CancellationToken,
    ) -> Self {
        let (state, _) = watch::channel(LinkState::Disconnected);
        Self { transport, target, commands, responses, reconnect_backoff, response_wait, cancel, state }
    }

    /// Receiver tracking the connection state.
    pub fn state(&self) -> watch::Receiver<LinkState> {
        self.state.subscribe()
    }

    fn set_state(&self, state: LinkState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            debug!(from = %previous, to = %state, "link state");
        }
    }

    /// Connect, listen and reconnect until cancelled.
    pub async fn run(mut self) {
        info!(address = %self.target.address, "link worker started");
        loop {
            self.set_state(LinkState::Connecting);
            let connected = tokio::select! {
                _ = self.cancel.cancelled() => break,
                result = self.transport.connect(&self.target) => result,
            };

            let backoff = match connected {
                Ok(link) => {
                    info!(address = %self.target.address, "connected");
                    self.set_state(LinkState::Connected);
                    match self.session(link).await {
                        SessionEnd::Failed => true,
                        SessionEnd::Lost => false,
                        SessionEnd::Cancelled | SessionEnd::Closed => break,
                    }
                }
                Err(e) => {
                    warn!(address = %self.target.address, error = %e, "connect failed");
                    true
                }
            };

            self.set_state(LinkState::Disconnected);
            if backoff {
                tokio::select! {
                    _ = self.cancel.cancelled() => break,
                    _ = tokio::time::sleep(self.reconnect_backoff) => {}
                }
            }
        }
        self.set_state(LinkState::Disconnected);
        info!("link worker stopped");
    }

    /// One connection, from subscribe until it fails or is cancelled.
    ///
    /// The link is always released before returning.
    async fn session(&mut self, mut link: T::Link) -> SessionEnd {
        let end = match link.subscribe(self.handler()).await {
            Ok(()) => {
                self.set_state(LinkState::Listening);
                info!("listening for commands");
                self.listen(&mut link).await
            }
            Err(e) => {
                warn!(error = %e, "subscribe failed");
                SessionEnd::Failed
            }
        };

        if let Err(e) = link.unsubscribe().await {
            debug!(error = %e, "unsubscribe failed");
        }
        link.disconnect().await;
        info!(reason = ?end, "disconnected");
        end
    }

    /// Notification handler feeding the command queue.
    fn handler(&self) -> NotifyHandler {
        let commands = self.commands.clone();
        Arc::new(move |payload: Vec<u8>| {
            let command = Command::parse(&payload);
            debug!(%command, len = payload.len(), "command received");
            if commands.push(command).is_err() {
                debug!("command queue closed, dropping command");
            }
        })
    }

    /// Deliver queued records until the session ends.
    ///
    /// Liveness is only rechecked when no record arrives within
    /// `response_wait`; under steady traffic a dropped link shows up as a
    /// failed write instead. Each write is bounded by `response_wait` and a
    /// write that times out ends the session like any other write error.
    async fn listen(&mut self, link: &mut T::Link) -> SessionEnd {
        loop {
            let popped = tokio::select! {
                _ = self.cancel.cancelled() => return SessionEnd::Cancelled,
                popped = self.responses.pop_timeout(self.response_wait) => popped,
            };
            match popped {
                Popped::Item(record) => {
                    let written = tokio::select! {
                        _ = self.cancel.cancelled() => return SessionEnd::Cancelled,
                        written = tokio::time::timeout(self.response_wait, link.write(&record)) => written,
                    };
                    match written {
                        Ok(Ok(())) => debug!(len = record.len(), "status written"),
                        Ok(Err(e)) => {
                            warn!(error = %e, len = record.len(), "write failed, dropping status");
                            return SessionEnd::Failed;
                        }
                        Err(_) => {
                            warn!(
                                timeout_ms = self.response_wait.as_millis() as u64,
                                len = record.len(),
                                "write timed out, dropping status"
                            );
                            return SessionEnd::Failed;
                        }
                    }
                }
                Popped::Empty => {
                    if !link.is_connected().await {
                        warn!("link lost");
                        return SessionEnd::Lost;
                    }
                }
                Popped::Closed => return SessionEnd::Closed,
            }
        }
    }
}

#[cfg(test)]
#[path = "link_tests.rs"]
mod tests;
