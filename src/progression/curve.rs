//! Level cost curve configuration

use serde::{Deserialize, Serialize};

use super::error::CurveError;

/// Base cost of clearing level 1
pub const DEFAULT_BASE_XP: f64 = 300.0;
/// Per-level growth of the level cost
pub const DEFAULT_XP_MULTIPLIER: f64 = 1.5;

/// Geometric level cost curve: level N costs `base_xp * multiplier^(N - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelCurve {
    /// XP needed to clear level 1
    pub base_xp: f64,
    /// Growth factor applied per level (must be > 1)
    pub multiplier: f64,
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            base_xp: DEFAULT_BASE_XP,
            multiplier: DEFAULT_XP_MULTIPLIER,
        }
    }
}

impl LevelCurve {
    pub fn new(base_xp: f64, multiplier: f64) -> Self {
        Self { base_xp, multiplier }
    }

    /// Check the constants on their own.
    /// The per-level checks happen when the engine builds its table.
    pub fn validate(&self) -> Result<(), CurveError> {
        if !self.base_xp.is_finite() || self.base_xp < 1.0 {
            return Err(CurveError::BaseTooSmall(self.base_xp));
        }
        if !self.multiplier.is_finite() || self.multiplier <= 1.0 {
            return Err(CurveError::MultiplierTooSmall(self.multiplier));
        }
        Ok(())
    }

    /// Unrounded cost of a level (1-indexed)
    pub(crate) fn raw_cost(&self, level: u32) -> f64 {
        self.base_xp * self.multiplier.powf(f64::from(level.saturating_sub(1)))
    }
}
