//! Data loading and external configuration
//!
//! This module handles loading the level curve and rewards from external
//! RON files, allowing them to be tuned without a rebuild.

pub mod loader;
pub mod rewards;

pub use loader::{QuestlineConfig, ConfigError, CONFIG_PATH};
pub use rewards::{ContentKind, XpRewards};
