//! Bridge configuration (`[bridge]` table of hostcall.toml)

use std::path::Path;

use hostcall_sdk::CoercionPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::naming::NamePolicy;

/// Errors that can occur while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to render TOML
    #[error("Failed to serialize config: {0}")]
    Serialize(String),
}

/// Settings of one bridge session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// How arguments are converted to native types
    pub coercion: CoercionPolicy,

    /// Which function names may be registered
    pub names: NamePolicy,

    /// Turn panics in native code into guest exceptions
    pub catch_panics: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            coercion: CoercionPolicy::Strict,
            names: NamePolicy::Dotted,
            catch_panics: true,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    bridge: BridgeConfig,
}

impl BridgeConfig {
    /// Load from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse from TOML text. A missing `[bridge]` table yields the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.bridge)
    }

    /// Render as TOML, including the `[bridge]` header
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(&ConfigFile { bridge: *self })
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Set the coercion policy
    pub fn with_coercion(mut self, coercion: CoercionPolicy) -> Self {
        self.coercion = coercion;
        self
    }

    /// Set the naming policy
    pub fn with_names(mut self, names: NamePolicy) -> Self {
        self.names = names;
        self
    }

    /// Enable or disable panic catching
    pub fn with_catch_panics(mut self, catch_panics: bool) -> Self {
        self.catch_panics = catch_panics;
        self
    }
}
