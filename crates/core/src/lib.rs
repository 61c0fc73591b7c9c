// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kanpe-core: domain types shared by the presenter bridge crates

pub mod command;
pub mod presentation;

pub use command::Command;
pub use presentation::{
    normalize_line_endings, Presentation, PresentationState, ShowPhase, ShowView,
};
