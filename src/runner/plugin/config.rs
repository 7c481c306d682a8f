//! Startup configuration for the bridge.
//!
//! Expected format:
//! ```toml
//! [runtime]
//! server_mode = true
//!
//! [components]
//! standard = ["console", "Json", "sleep", "sync", "Lock", "ReadWriteLock"]
//! ```
//!
//! Both tables are optional. Without a file the bridge runs in one-shot mode
//! with every standard component registered.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::runner::std_lib::core::{is_standard_component, STANDARD_COMPONENT_NAMES};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown standard component: {0}")]
    UnknownComponent(String),
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Long-lived multi-request process when `true`, one-shot script run
    /// otherwise. Read on every resolution, never changed after startup.
    pub server_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ComponentsConfig {
    /// Standard components to register, by declared name.
    pub standard: Vec<String>,
}

impl Default for ComponentsConfig {
    fn default() -> Self {
        ComponentsConfig {
            standard: STANDARD_COMPONENT_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub runtime: RuntimeConfig,
    pub components: ComponentsConfig,
}

impl BridgeConfig {
    /// One-shot mode, all standard components.
    pub fn new() -> Self {
        BridgeConfig::default()
    }

    /// Server mode, all standard components.
    pub fn server() -> Self {
        let mut config = BridgeConfig::default();
        config.runtime.server_mode = true;
        config
    }

    pub fn with_standard_components(mut self, names: &[&str]) -> Self {
        self.components.standard = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn server_mode(&self) -> bool {
        self.runtime.server_mode
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: BridgeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self
            .components
            .standard
            .iter()
            .find(|name| !is_standard_component(name))
        {
            Some(unknown) => Err(ConfigError::UnknownComponent(unknown.clone())),
            None => Ok(()),
        }
    }
}
