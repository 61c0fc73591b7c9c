// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wireless transport to the peripheral
//!
//! The daemon only needs "commands in, bytes out": connect to the peripheral,
//! subscribe to its command notifications, and write status records to its
//! response characteristic. Discovery, pairing and GATT details stay inside
//! the concrete transport.

#[cfg(feature = "ble")]
mod ble;
#[cfg(feature = "ble")]
pub use ble::BleTransport;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLink, FakeTransport};

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Primary service advertised by the peripheral.
pub const SERVICE_UUID: Uuid = Uuid::from_u128(0xba21ce66_9974_4ecd_b2e5_ab6d1497a7f0);

/// Characteristic the peripheral notifies commands on.
pub const COMMAND_CHARACTERISTIC_UUID: Uuid =
    Uuid::from_u128(0xba21ce66_9974_4ecd_b2e5_ab6d1497a7f1);

/// Characteristic status records are written to.
pub const RESPONSE_CHARACTERISTIC_UUID: Uuid =
    Uuid::from_u128(0xba21ce66_9974_4ecd_b2e5_ab6d1497a7f2);

/// Callback invoked with the raw payload of each inbound notification.
pub type NotifyHandler = Arc<dyn Fn(Vec<u8>) + Send + Sync>;

/// Errors from transport operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("no bluetooth adapter available")]
    NoAdapter,
    #[error("peripheral {0} not found")]
    NotFound(String),
    #[error("connect failed: {0}")]
    ConnectFailed(String),
    #[error("characteristic {0} not found")]
    MissingCharacteristic(Uuid),
    #[error("subscribe failed: {0}")]
    SubscribeFailed(String),
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("link disconnected")]
    Disconnected,
}

/// Where to connect and which characteristics to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    /// Peripheral address, e.g. `C7:66:0E:39:B6:29`
    pub address: String,
    pub service: Uuid,
    pub command_characteristic: Uuid,
    pub response_characteristic: Uuid,
}

impl LinkTarget {
    /// Target using the peripheral's fixed service and characteristics.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            service: SERVICE_UUID,
            command_characteristic: COMMAND_CHARACTERISTIC_UUID,
            response_characteristic: RESPONSE_CHARACTERISTIC_UUID,
        }
    }

    /// Whether `address` names this target. Addresses compare case-insensitively.
    pub fn matches_address(&self, address: &str) -> bool {
        self.address.eq_ignore_ascii_case(address)
    }
}

/// Opens links to the peripheral.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    type Link: Link;

    async fn connect(&self, target: &LinkTarget) -> Result<Self::Link, TransportError>;
}

/// One open connection. Dropping it releases the connection.
#[async_trait]
pub trait Link: Send + Sync + 'static {
    /// Start delivering command notifications to `handler`.
    async fn subscribe(&mut self, handler: NotifyHandler) -> Result<(), TransportError>;

    async fn unsubscribe(&mut self) -> Result<(), TransportError>;

    /// Write one status record to the response characteristic.
    async fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    async fn is_connected(&self) -> bool;

    /// Close the connection. Errors are ignored; the link is unusable afterwards.
    async fn disconnect(&mut self);
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
