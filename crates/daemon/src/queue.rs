// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unbounded FIFO queues between the workers.
//!
//! Each queue has exactly one consumer. [`Consumer`] is not `Clone` and every
//! pop takes `&mut self`, so a value can never be observed by two readers.
//! Producers can be cloned freely; pushes never block, which lets the
//! automation thread and notification callbacks hand values off without
//! waiting on the other side.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;

/// The consumer side was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("queue consumer is gone")]
pub struct QueueClosed;

/// Outcome of a pop.
#[derive(Debug, PartialEq, Eq)]
pub enum Popped<T> {
    Item(T),
    /// Nothing was queued (or nothing arrived before the timeout).
    Empty,
    /// Every producer was dropped and the queue is drained.
    Closed,
}

/// Create a queue.
pub fn unbounded<T>() -> (Producer<T>, Consumer<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Producer { tx }, Consumer { rx })
}

/// Sending side of a queue.
#[derive(Debug)]
pub struct Producer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for Producer<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T> Producer<T> {
    /// Append a value. Never blocks.
    pub fn push(&self, value: T) -> Result<(), QueueClosed> {
        self.tx.send(value).map_err(|_| QueueClosed)
    }
}

/// Receiving side of a queue.
#[derive(Debug)]
pub struct Consumer<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Consumer<T> {
    /// Remove the oldest value without waiting.
    pub fn try_pop(&mut self) -> Popped<T> {
        match self.rx.try_recv() {
            Ok(value) => Popped::Item(value),
            Err(mpsc::error::TryRecvError::Empty) => Popped::Empty,
            Err(mpsc::error::TryRecvError::Disconnected) => Popped::Closed,
        }
    }

    /// Wait for the oldest value, giving up after `timeout`.
    ///
    /// Cancel safe: dropping the future never loses a value.
    pub async fn pop_timeout(&mut self, timeout: Duration) -> Popped<T> {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(value)) => Popped::Item(value),
            Ok(None) => Popped::Closed,
            Err(_) => Popped::Empty,
        }
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
