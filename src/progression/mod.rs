//! Progression systems

pub mod curve;
pub mod error;
pub mod xp;
pub mod ranks;
pub mod notify;

pub use curve::{LevelCurve, DEFAULT_BASE_XP, DEFAULT_XP_MULTIPLIER};
pub use error::{CurveError, LevelError};
pub use xp::{LevelingEngine, LevelProgress, MAX_CURVE_LEVELS, xp_from_f64, level_from_f64};
pub use ranks::level_title;
pub use notify::{LevelUp, LevelUpListener, LevelUpNotifier, LogListener, LevelUpHistory};
