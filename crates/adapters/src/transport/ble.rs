// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bluetooth LE central transport built on btleplug.
//!
//! The host acts as central: it scans for the peripheral by address,
//! connects, subscribes to the command characteristic and writes status
//! records (with response) to the response characteristic.

use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{
    Central as _, Characteristic, Manager as _, Peripheral as _, ScanFilter, WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures_util::StreamExt;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::{Link, LinkTarget, NotifyHandler, Transport, TransportError};

/// Interval between peripheral list checks while scanning
const SCAN_POLL: Duration = Duration::from_millis(200);

/// BLE transport using the first available adapter.
pub struct BleTransport {
    scan_timeout: Duration,
    adapter: OnceCell<Adapter>,
}

impl BleTransport {
    pub fn new(scan_timeout: Duration) -> Self {
        Self { scan_timeout, adapter: OnceCell::new() }
    }

    async fn adapter(&self) -> Result<&Adapter, TransportError> {
        self.adapter
            .get_or_try_init(|| async {
                let manager = Manager::new().await.map_err(connect_failed)?;
                let adapters = manager.adapters().await.map_err(connect_failed)?;
                adapters.into_iter().next().ok_or(TransportError::NoAdapter)
            })
            .await
    }

    /// Scan until the peripheral with the target address shows up.
    async fn find(&self, adapter: &Adapter, target: &LinkTarget) -> Result<Peripheral, TransportError> {
        let deadline = tokio::time::Instant::now() + self.scan_timeout;
        loop {
            for peripheral in adapter.peripherals().await.map_err(connect_failed)? {
                if target.matches_address(&peripheral.address().to_string()) {
                    return Ok(peripheral);
                }
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(TransportError::NotFound(target.address.clone()));
            }
            tokio::time::sleep(SCAN_POLL).await;
        }
    }
}

fn connect_failed(e: btleplug::Error) -> TransportError {
    TransportError::ConnectFailed(e.to_string())
}

/// Pick the characteristic `uuid` that belongs to `service`.
fn find_characteristic(
    characteristics: impl IntoIterator<Item = Characteristic>,
    service: Uuid,
    uuid: Uuid,
) -> Result<Characteristic, TransportError> {
    characteristics
        .into_iter()
        .find(|c| c.service_uuid == service && c.uuid == uuid)
        .ok_or(TransportError::MissingCharacteristic(uuid))
}

/// Discover services and resolve both characteristics of `target`.
async fn resolve(
    peripheral: &Peripheral,
    target: &LinkTarget,
) -> Result<(Characteristic, Characteristic), TransportError> {
    peripheral.discover_services().await.map_err(connect_failed)?;
    let characteristics = peripheral.characteristics();
    let command =
        find_characteristic(characteristics.iter().cloned(), target.service, target.command_characteristic)?;
    let response =
        find_characteristic(characteristics, target.service, target.response_characteristic)?;
    Ok((command, response))
}

#[async_trait]
impl Transport for BleTransport {
    type Link = BleLink;

    async fn connect(&self, target: &LinkTarget) -> Result<BleLink, TransportError> {
        let adapter = self.adapter().await?;

        adapter.start_scan(ScanFilter::default()).await.map_err(connect_failed)?;
        let found = self.find(adapter, target).await;
        if let Err(e) = adapter.stop_scan().await {
            tracing::debug!(error = %e, "failed to stop scan");
        }
        let peripheral = found?;

        if !peripheral.is_connected().await.unwrap_or(false) {
            peripheral.connect().await.map_err(connect_failed)?;
        }
        let (command, response) = match resolve(&peripheral, target).await {
            Ok(found) => found,
            Err(e) => {
                if let Err(err) = peripheral.disconnect().await {
                    tracing::debug!(error = %err, "disconnect after failed setup");
                }
                return Err(e);
            }
        };
        tracing::info!(address = %target.address, "peripheral connected");

        Ok(BleLink { peripheral, command, response, forwarder: None })
    }
}

/// Open BLE connection to the peripheral
pub struct BleLink {
    peripheral: Peripheral,
    command: Characteristic,
    response: Characteristic,
    /// Task forwarding the notification stream to the subscriber
    forwarder: Option<JoinHandle<()>>,
}

impl BleLink {
    fn stop_forwarder(&mut self) {
        if let Some(task) = self.forwarder.take() {
            task.abort();
        }
    }
}

#[async_trait]
impl Link for BleLink {
    async fn subscribe(&mut self, handler: NotifyHandler) -> Result<(), TransportError> {
        let mut notifications = self
            .peripheral
            .notifications()
            .await
            .map_err(|e| TransportError::SubscribeFailed(e.to_string()))?;
        self.peripheral
            .subscribe(&self.command)
            .await
            .map_err(|e| TransportError::SubscribeFailed(e.to_string()))?;

        let uuid = self.command.uuid;
        self.stop_forwarder();
        self.forwarder = Some(tokio::spawn(async move {
            while let Some(notification) = notifications.next().await {
                if notification.uuid == uuid {
                    handler(notification.value);
                }
            }
            tracing::debug!("notification stream ended");
        }));
        Ok(())
    }

    async fn unsubscribe(&mut self) -> Result<(), TransportError> {
        self.stop_forwarder();
        self.peripheral
            .unsubscribe(&self.command)
            .await
            .map_err(|e| TransportError::SubscribeFailed(e.to_string()))
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.peripheral
            .write(&self.response, bytes, WriteType::WithResponse)
            .await
            .map_err(|e| TransportError::WriteFailed(e.to_string()))
    }

    async fn is_connected(&self) -> bool {
        self.peripheral.is_connected().await.unwrap_or(false)
    }

    async fn disconnect(&mut self) {
        self.stop_forwarder();
        if let Err(e) = self.peripheral.disconnect().await {
            tracing::debug!(error = %e, "disconnect failed");
        }
    }
}

impl Drop for BleLink {
    fn drop(&mut self) {
        self.stop_forwarder();
    }
}

#[cfg(test)]
#[path = "ble_tests.rs"]
mod tests;
