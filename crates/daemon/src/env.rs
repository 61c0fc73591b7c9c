// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::ConfigError;

/// Config file named by `KANPE_CONFIG`
pub fn config_path() -> Option<PathBuf> {
    std::env::var("KANPE_CONFIG").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Default config file: `<config_dir>/kanpe/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("kanpe").join("config.toml"))
}

/// Resolve state directory: KANPE_STATE_DIR > <state_dir>/kanpe > <data_local_dir>/kanpe
pub fn state_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("KANPE_STATE_DIR") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join("kanpe"))
        .ok_or(ConfigError::NoStateDir)
}

/// Peripheral address override
pub fn address() -> Option<String> {
    std::env::var("KANPE_ADDRESS").ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Automation idle poll override
pub fn idle_poll() -> Option<Duration> {
    millis("KANPE_IDLE_POLL_MS")
}

/// Reconnect backoff override
pub fn reconnect_backoff() -> Option<Duration> {
    millis("KANPE_RECONNECT_MS")
}

fn millis(var: &str) -> Option<Duration> {
    std::env::var(var).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}
