//! Save/load system
//!
//! Handles the persistent learner profile.

pub mod profile;

pub use profile::{
    LearnerProfile, CompletionStats, ProfileError,
    load_profile, save_profile, load_profile_from, save_profile_to, profile_path,
};
