//! Questline - gamified learning progress
//!
//! Learners complete missions, quests and expeditions to earn XP.
//! The leveling engine turns accumulated XP into levels and progress-bar
//! statistics; the rest of the crate awards XP, persists the learner
//! profile and renders a terminal dashboard.

pub mod progression;
pub mod data;
pub mod save;
pub mod ui;

// Re-export commonly used types
pub use progression::{LevelCurve, LevelError, LevelProgress, LevelingEngine};
pub use save::LearnerProfile;
