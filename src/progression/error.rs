//! Leveling errors

use thiserror::Error;

/// Error returned by the leveling engine operations.
///
/// The engine performs no I/O, so the only way a call can fail is bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl LevelError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        LevelError::InvalidArgument(msg.into())
    }
}

/// Misconfigured level curve, reported when an engine is built
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("base XP must be a finite number >= 1, got {0}")]
    BaseTooSmall(f64),
    #[error("XP multiplier must be a finite number > 1, got {0}")]
    MultiplierTooSmall(f64),
    #[error("level costs stop increasing at level {level} ({cost} XP)")]
    NotStrictlyIncreasing { level: u32, cost: u64 },
    #[error("XP cost or threshold of level {level} does not fit in 64 bits")]
    CostOverflow { level: u32 },
    #[error("curve grows too slowly to cover every XP total within {max_levels} levels")]
    TooShallow { max_levels: u32 },
}
