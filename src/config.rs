//! Engine configuration.
//!
//! All values have sensible defaults; a deployment can override them
//! with a TOML file. Validation happens at load time so a bad config is
//! rejected before it can affect any user mutation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Main configuration for the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Pellet economy configuration.
    pub economy: EconomyConfig,
    /// Exp-earning policy.
    pub exp: ExpConfig,
    /// Trend analysis configuration.
    pub trends: TrendsConfig,
}

/// Pellet economy configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EconomyConfig {
    /// Negative pellets granted at registration.
    pub starting_negative: u32,
    /// Positive pellets granted at registration.
    pub starting_positive: u32,
    /// Negative pellets credited by one erase purchase.
    pub erase_credit: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_negative: 10,
            starting_positive: 5,
            erase_credit: 1,
        }
    }
}

/// Exp-earning policy.
///
/// The progression calculator itself is a pure conversion; which actions
/// earn how much exp is policy, and it lives here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExpConfig {
    /// Exp awarded to the tagger per tag given.
    pub per_tag_given: u32,
    /// Exp awarded to the target per positive tag received.
    pub per_positive_received: u32,
}

impl Default for ExpConfig {
    fn default() -> Self {
        Self {
            per_tag_given: 10,
            per_positive_received: 5,
        }
    }
}

/// Trend analysis configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrendsConfig {
    /// Length of each trend window, in days.
    pub window_days: i64,
    /// Number of top tagging reasons reported.
    pub top_reasons: usize,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            top_reasons: 3,
        }
    }
}

impl Config {
    /// Parse a config from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)
            .map_err(|e| EngineError::config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).map_err(|e| EngineError::storage(path.to_path_buf(), e))?;
        Self::from_toml_str(&text)
    }

    /// Validate config values.
    pub fn validate(&self) -> Result<()> {
        if self.trends.window_days < 1 {
            return Err(EngineError::config(format!(
                "trends.window_days must be >= 1, got {}",
                self.trends.window_days
            )));
        }
        if self.trends.top_reasons < 1 {
            return Err(EngineError::config(format!(
                "trends.top_reasons must be >= 1, got {}",
                self.trends.top_reasons
            )));
        }
        Ok(())
    }
}
