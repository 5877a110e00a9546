//! Global configuration parsing and validation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{AppError, Result};

fn default_broker_addr() -> String {
    "127.0.0.1:7878".into()
}

fn default_topic() -> String {
    "sensors".into()
}

fn default_identity_prefix() -> String {
    "SyncDevice".into()
}

fn default_exec_timeout() -> u64 {
    30
}

fn default_wait_seconds() -> u64 {
    5
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Relay endpoint and topic shared by every participant.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct BusConfig {
    /// Relay address (`host:port`).
    #[serde(default = "default_broker_addr")]
    pub broker_addr: String,
    /// Topic all channel traffic blends into.
    #[serde(default = "default_topic")]
    pub topic: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            broker_addr: default_broker_addr(),
            topic: default_topic(),
        }
    }
}

/// Agent-side settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AgentConfig {
    /// Prefix for generated agent identities.
    #[serde(default = "default_identity_prefix")]
    pub identity_prefix: String,
    /// Hard deadline for external command execution.
    #[serde(default = "default_exec_timeout")]
    pub exec_timeout_seconds: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            identity_prefix: default_identity_prefix(),
            exec_timeout_seconds: default_exec_timeout(),
        }
    }
}

/// Controller-side settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ControllerConfig {
    /// Default response wait window, in seconds.
    #[serde(default = "default_wait_seconds")]
    pub wait_seconds: u64,
    /// Directory fetched artifacts are saved into.
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            wait_seconds: default_wait_seconds(),
            artifact_dir: default_artifact_dir(),
        }
    }
}

/// Global configuration parsed from `config.toml`.
///
/// Every section and field is optional; omitted values fall back to the
/// defaults above, so the binaries run with no config file at all.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Bus connectivity settings.
    #[serde(default)]
    pub bus: BusConfig,
    /// Agent-side settings.
    #[serde(default)]
    pub agent: AgentConfig,
    /// Controller-side settings.
    #[serde(default)]
    pub controller: ControllerConfig,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] when the file cannot be read, parsed,
    /// or validated.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("cannot read {}: {err}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] for invalid TOML or invalid values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field values, including CLI overrides applied after load.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] for an empty broker address or topic,
    /// or a zero execution deadline.
    pub fn validate(&self) -> Result<()> {
        if self.bus.broker_addr.trim().is_empty() {
            return Err(AppError::Config("broker_addr must not be empty".into()));
        }
        if self.bus.topic.trim().is_empty() {
            return Err(AppError::Config("topic must not be empty".into()));
        }
        if self.agent.exec_timeout_seconds == 0 {
            return Err(AppError::Config(
                "exec_timeout_seconds must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
