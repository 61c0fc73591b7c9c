// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration.
//!
//! Read from a TOML file where every field is optional, then overridden by
//! `KANPE_*` environment variables. Command-line flags are applied on top by
//! the binary before [`Config::validate`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use kanpe_adapters::transport::{
    COMMAND_CHARACTERISTIC_UUID, RESPONSE_CHARACTERISTIC_UUID, SERVICE_UUID,
};
use kanpe_adapters::{Automation, CommandAutomation, LinkTarget, SimulatedDeck};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::env;
use crate::supervisor::Timing;

/// Address of the presenter remote the bridge was built for.
pub const DEFAULT_ADDRESS: &str = "C7:66:0E:39:B6:29";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("could not determine state directory")]
    NoStateDir,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub link: LinkConfig,
    pub automation: AutomationConfig,
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkConfig {
    /// Peripheral address
    pub address: String,
    /// How long one connect attempt scans for the peripheral
    pub scan_timeout_ms: u64,
    pub service: Uuid,
    pub command_characteristic: Uuid,
    pub response_characteristic: Uuid,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            scan_timeout_ms: 10_000,
            service: SERVICE_UUID,
            command_characteristic: COMMAND_CHARACTERISTIC_UUID,
            response_characteristic: RESPONSE_CHARACTERISTIC_UUID,
        }
    }
}

impl LinkConfig {
    pub fn scan_timeout(&self) -> Duration {
        Duration::from_millis(self.scan_timeout_ms)
    }
}

/// Presentation backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// External helper program
    #[default]
    Command,
    /// In-process deck, for dry runs
    Simulated,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::Command => "command",
            Backend::Simulated => "simulated",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutomationConfig {
    pub backend: Backend,
    /// Helper program for the `command` backend
    pub program: String,
    /// Arguments placed before the verb
    pub args: Vec<String>,
    /// Slide count for the `simulated` backend when `notes` is empty
    pub slides: u16,
    /// Speaker notes for the `simulated` backend, one per slide
    pub notes: Vec<String>,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Command,
            program: String::new(),
            args: Vec::new(),
            slides: 10,
            notes: Vec::new(),
        }
    }
}

impl AutomationConfig {
    /// Build the configured backend.
    pub fn build(&self) -> Box<dyn Automation> {
        match self.backend {
            Backend::Command => Box::new(CommandAutomation::new(&self.program, self.args.clone())),
            Backend::Simulated if self.notes.is_empty() => Box::new(SimulatedDeck::new(self.slides)),
            Backend::Simulated => Box::new(SimulatedDeck::with_notes(self.notes.iter().cloned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub idle_poll_ms: u64,
    pub reconnect_backoff_ms: u64,
    pub response_wait_ms: u64,
    pub shutdown_timeout_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        let timing = Timing::default();
        Self {
            idle_poll_ms: timing.idle_poll.as_millis() as u64,
            reconnect_backoff_ms: timing.reconnect_backoff.as_millis() as u64,
            response_wait_ms: timing.response_wait.as_millis() as u64,
            shutdown_timeout_ms: timing.shutdown_timeout.as_millis() as u64,
        }
    }
}

impl Config {
    /// Load configuration and apply environment overrides.
    ///
    /// The file is `explicit`, else `KANPE_CONFIG`, else the default location.
    /// Only a missing default file falls back to defaults; a named file must
    /// exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let named = explicit.map(Path::to_path_buf).or_else(env::config_path);
        let mut config = match named {
            Some(path) => Self::from_file(&path)?,
            None => match env::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Apply `KANPE_*` overrides.
    pub fn apply_env(&mut self) {
        if let Some(address) = env::address() {
            self.link.address = address;
        }
        if let Some(idle_poll) = env::idle_poll() {
            self.timing.idle_poll_ms = idle_poll.as_millis() as u64;
        }
        if let Some(backoff) = env::reconnect_backoff() {
            self.timing.reconnect_backoff_ms = backoff.as_millis() as u64;
        }
    }

    /// Reject settings the daemon cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.link.address.trim().is_empty() {
            return Err(ConfigError::Invalid("link.address is empty".into()));
        }
        if self.link.scan_timeout_ms == 0 {
            return Err(ConfigError::Invalid("link.scan_timeout_ms must be positive".into()));
        }
        match self.automation.backend {
            Backend::Command if self.automation.program.trim().is_empty() => {
                return Err(ConfigError::Invalid(
                    "automation.program is required for the command backend".into(),
                ));
            }
            Backend::Simulated if self.automation.slides == 0 && self.automation.notes.is_empty() => {
                return Err(ConfigError::Invalid("simulated deck needs at least one slide".into()));
            }
            _ => {}
        }
        let timing = &self.timing;
        for (name, value) in [
            ("timing.idle_poll_ms", timing.idle_poll_ms),
            ("timing.reconnect_backoff_ms", timing.reconnect_backoff_ms),
            ("timing.response_wait_ms", timing.response_wait_ms),
            ("timing.shutdown_timeout_ms", timing.shutdown_timeout_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        Ok(())
    }

    pub fn target(&self) -> LinkTarget {
        LinkTarget {
            address: self.link.address.trim().to_string(),
            service: self.link.service,
            command_characteristic: self.link.command_characteristic,
            response_characteristic: self.link.response_characteristic,
        }
    }

    pub fn timing(&self) -> Timing {
        Timing {
            idle_poll: Duration::from_millis(self.timing.idle_poll_ms),
            reconnect_backoff: Duration::from_millis(self.timing.reconnect_backoff_ms),
            response_wait: Duration::from_millis(self.timing.response_wait_ms),
            shutdown_timeout: Duration::from_millis(self.timing.shutdown_timeout_ms),
        }
    }

    /// Render the resolved configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
