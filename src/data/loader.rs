//! RON config loader
//!
//! Loads the level curve and completion rewards from an external RON file,
//! with fallback to hardcoded defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::progression::{CurveError, LevelCurve, LevelingEngine};
use super::rewards::XpRewards;

/// Default location of the config file
pub const CONFIG_PATH: &str = "assets/data/questline.ron";

/// Config loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid level curve: {0}")]
    Curve(#[from] CurveError),
}

/// Everything read from the config file
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestlineConfig {
    pub curve: LevelCurve,
    pub rewards: XpRewards,
}

impl QuestlineConfig {
    /// Parse a config from RON text and check the curve
    pub fn from_ron(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: QuestlineConfig = ron::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        // Full check, so a curve the engine would refuse never counts as loaded
        LevelingEngine::new(config.curve)?;
        Ok(config)
    }

    /// Read and parse a config file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&content, path)
    }

    /// Load from `path`, falling back to defaults when it is missing or broken
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(config) => {
                log::info!("Config loaded from {:?}", path);
                config
            }
            Err(ConfigError::Curve(e)) => {
                // Rewards may still be usable, so only the curve falls back
                log::warn!("Invalid curve in {:?}: {}. Using default curve.", path, e);
                let rewards = fs::read_to_string(path)
                    .ok()
                    .and_then(|content| ron::from_str::<QuestlineConfig>(&content).ok())
                    .map(|config| config.rewards)
                    .unwrap_or_default();
                Self { curve: LevelCurve::default(), rewards }
            }
            Err(e) => {
                log::warn!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Build the leveling engine for this config, falling back to the
    /// default curve if this one is rejected
    pub fn engine(&self) -> LevelingEngine {
        LevelingEngine::new(self.curve).unwrap_or_else(|e| {
            log::warn!("Level curve rejected: {}. Using default curve.", e);
            LevelingEngine::default()
        })
    }
}
