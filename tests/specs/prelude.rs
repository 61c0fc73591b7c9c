// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness for bridge specs

pub use std::time::Duration;

pub use kanpe_adapters::{AutomationCall, FakeAutomation, FakeTransport, SimulatedDeck, TransportError};
pub use kanpe_core::ShowPhase;
pub use kanpe_daemon::{LinkState, Supervisor, Timing};
pub use kanpe_wire::StatusRecord;

use kanpe_adapters::LinkTarget;
use tokio_util::sync::CancellationToken;

pub const ADDRESS: &str = "C7:66:0E:39:B6:29";
pub const WAIT: Duration = Duration::from_secs(5);

pub fn fast_timing() -> Timing {
    Timing {
        idle_poll: Duration::from_millis(2),
        reconnect_backoff: Duration::from_millis(20),
        response_wait: Duration::from_millis(10),
        shutdown_timeout: WAIT,
    }
}

/// Backend with an open presentation carrying these speaker notes.
pub fn deck<const N: usize>(notes: [&str; N]) -> FakeAutomation {
    FakeAutomation::with_deck(SimulatedDeck::with_notes(notes))
}

/// A running bridge plus handles on both fakes.
pub struct Bridge {
    pub transport: FakeTransport,
    pub automation: FakeAutomation,
    supervisor: Supervisor,
}

impl Bridge {
    /// Start a bridge without waiting for the link.
    pub fn start_with(transport: FakeTransport, automation: FakeAutomation, timing: Timing) -> Self {
        let supervisor = Supervisor::start(
            &timing,
            LinkTarget::new(ADDRESS),
            transport.clone(),
            automation.clone(),
            CancellationToken::new(),
        )
        .unwrap();
        Self { transport, automation, supervisor }
    }

    /// Start a bridge and wait until it listens for commands.
    pub async fn connected(automation: FakeAutomation) -> Self {
        let bridge = Self::start_with(FakeTransport::new(), automation, fast_timing());
        assert!(bridge.transport.wait_for_subscribed(WAIT).await, "bridge never subscribed");
        bridge
    }

    /// Deliver a command as the peripheral would.
    pub fn send(&self, command: &str) {
        assert!(self.transport.notify(command.as_bytes()), "no subscriber for {command:?}");
    }

    /// Wait for `count` written records and decode them.
    pub async fn records(&self, count: usize) -> Vec<StatusRecord> {
        let writes = self.transport.wait_for_writes(count, WAIT).await;
        assert_eq!(writes.len(), count, "expected {count} records, got {}", writes.len());
        writes.iter().map(|bytes| StatusRecord::decode(bytes).unwrap()).collect()
    }

    /// Send one command and return the record answering it.
    pub async fn request(&self, command: &str) -> StatusRecord {
        let before = self.transport.writes().len();
        self.send(command);
        let records = self.records(before + 1).await;
        records[before].clone()
    }

    pub fn link_state(&self) -> tokio::sync::watch::Receiver<LinkState> {
        self.supervisor.link_state()
    }

    pub async fn stop(self) {
        self.supervisor.shutdown().await.unwrap();
    }
}
