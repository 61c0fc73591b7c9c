// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires the queues and both workers together and owns their lifetimes.

use std::future::Future;
use std::thread;
use std::time::Duration;

use kanpe_adapters::{Automation, LinkTarget, Transport};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::automation::AutomationWorker;
use crate::link::{LinkState, LinkWorker};
use crate::queue;

/// Worker intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Automation worker sleep when the command queue is empty
    pub idle_poll: Duration,
    /// Delay before reconnecting after a transport error
    pub reconnect_backoff: Duration,
    /// Longest wait for a response before checking the link
    pub response_wait: Duration,
    /// Bound on joining the workers at shutdown
    pub shutdown_timeout: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            idle_poll: Duration::from_millis(100),
            reconnect_backoff: Duration::from_secs(1),
            response_wait: Duration::from_secs(1),
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("failed to spawn automation thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("workers did not stop within {0:?}")]
    Timeout(Duration),
    #[error("{0} worker panicked")]
    Panicked(&'static str),
}

/// Handle to the running bridge.
pub struct Supervisor {
    cancel: CancellationToken,
    link: JoinHandle<()>,
    automation: thread::JoinHandle<()>,
    link_state: watch::Receiver<LinkState>,
    shutdown_timeout: Duration,
}

impl Supervisor {
    /// Create the queues and start both workers.
    ///
    /// Must be called from within a tokio runtime. Cancelling `cancel` stops
    /// the workers; [`Supervisor::shutdown`] also waits for them.
    pub fn start<T, A>(
        timing: &Timing,
        target: LinkTarget,
        transport: T,
        automation: A,
        cancel: CancellationToken,
    ) -> Result<Self, SupervisorError>
    where
        T: Transport,
        A: Automation,
    {
        let cancel = cancel.child_token();
        let (command_tx, command_rx) = queue::unbounded();
        let (response_tx, response_rx) = queue::unbounded();

        let automation = AutomationWorker::new(
            automation,
            command_rx,
            response_tx,
            timing.idle_poll,
            cancel.clone(),
        )
        .spawn()?;

        let link = LinkWorker::new(
            transport,
            target,
            command_tx,
            response_rx,
            timing.reconnect_backoff,
            timing.response_wait,
            cancel.clone(),
        );
        let link_state = link.state();
        let link = tokio::spawn(link.run());

        info!("bridge started");
        Ok(Self { cancel, link, automation, link_state, shutdown_timeout: timing.shutdown_timeout })
    }

    pub fn link_state(&self) -> watch::Receiver<LinkState> {
        self.link_state.clone()
    }

    /// Stop both workers and wait for them to exit.
    ///
    /// Anything still queued is discarded.
    pub async fn shutdown(self) -> Result<(), SupervisorError> {
        let Supervisor { cancel, link, automation, shutdown_timeout, .. } = self;
        info!("shutting down");
        cancel.cancel();

        let joined = tokio::time::timeout(shutdown_timeout, async move {
            let link = link.await;
            let automation = tokio::task::spawn_blocking(move || automation.join()).await;
            (link, automation)
        })
        .await;

        let (link, automation) = match joined {
            Ok(results) => results,
            Err(_) => {
                warn!(timeout_ms = shutdown_timeout.as_millis() as u64, "workers did not stop");
                return Err(SupervisorError::Timeout(shutdown_timeout));
            }
        };
        if link.is_err() {
            return Err(SupervisorError::Panicked("link"));
        }
        match automation {
            Ok(Ok(())) => {
                info!("bridge stopped");
                Ok(())
            }
            _ => Err(SupervisorError::Panicked("automation")),
        }
    }
}

/// Run the bridge until `shutdown` resolves, then stop it.
pub async fn run_until<T, A, F>(
    timing: &Timing,
    target: LinkTarget,
    transport: T,
    automation: A,
    shutdown: F,
) -> Result<(), SupervisorError>
where
    T: Transport,
    A: Automation,
    F: Future<Output = ()>,
{
    let supervisor = Supervisor::start(timing, target, transport, automation, CancellationToken::new())?;
    shutdown.await;
    supervisor.shutdown().await
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
