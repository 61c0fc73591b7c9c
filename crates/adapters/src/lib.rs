// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapters for the presenter bridge's external collaborators
//!
//! - [`automation`]: the blocking, non-reentrant presentation backend
//! - [`transport`]: the wireless link to the peripheral

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod automation;
pub mod transport;

pub use automation::{Automation, AutomationError, CommandAutomation, SimulatedDeck};
#[cfg(feature = "ble")]
pub use transport::BleTransport;
pub use transport::{Link, LinkTarget, NotifyHandler, Transport, TransportError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use automation::{AutomationCall, FakeAutomation};
#[cfg(any(test, feature = "test-support"))]
pub use transport::{FakeLink, FakeTransport};
