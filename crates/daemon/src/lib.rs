// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kanpe daemon library
//!
//! Bridges a wireless presenter remote to a slide show: the link worker turns
//! peripheral notifications into commands, the automation worker executes them
//! one at a time, and every command is answered with a status record.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod automation;
pub mod config;
pub mod env;
pub mod link;
pub mod logging;
pub mod queue;
pub mod supervisor;

pub use automation::{process, AutomationWorker};
pub use config::{Backend, Config, ConfigError};
pub use link::{LinkState, LinkWorker};
pub use queue::{Consumer, Popped, Producer, QueueClosed};
pub use supervisor::{run_until, Supervisor, SupervisorError, Timing};
