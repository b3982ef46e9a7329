//! Learner profile and persistent progression
//!
//! Holds the learner's total XP and level, awards XP for completed content
//! and stores everything as JSON between sessions.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::data::{ContentKind, XpRewards};
use crate::progression::{LevelError, LevelProgress, LevelUp, LevelUpNotifier, LevelingEngine};

/// Current profile version for compatibility
const PROFILE_VERSION: u32 = 1;

/// Profile storage errors
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Profile version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Persistent learner profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerProfile {
    /// Version for compatibility checking
    pub version: u32,
    /// Accumulated XP. Always written together with `level`.
    pub total_xp: i64,
    /// Level derived from `total_xp`
    pub level: u32,
    /// Completion counters
    pub stats: CompletionStats,
}

/// Completed content counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionStats {
    pub missions: u32,
    pub quests: u32,
    pub expeditions: u32,
}

impl CompletionStats {
    fn record(&mut self, kind: ContentKind) {
        let counter = match kind {
            ContentKind::Mission => &mut self.missions,
            ContentKind::Quest => &mut self.quests,
            ContentKind::Expedition => &mut self.expeditions,
        };
        *counter = counter.saturating_add(1);
    }

    pub fn total(&self) -> u32 {
        self.missions
            .saturating_add(self.quests)
            .saturating_add(self.expeditions)
    }
}

impl Default for LearnerProfile {
    fn default() -> Self {
        Self {
            version: PROFILE_VERSION,
            total_xp: 0,
            level: 1,
            stats: CompletionStats::default(),
        }
    }
}

impl LearnerProfile {
    /// Create a new profile
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed piece of content and award its XP.
    /// Returns the level-up, if the award crossed a level boundary.
    pub fn complete(
        &mut self,
        kind: ContentKind,
        rewards: &XpRewards,
        engine: &LevelingEngine,
        notifier: &mut LevelUpNotifier,
    ) -> Result<Option<LevelUp>, LevelError> {
        let level_up = self.award_xp(rewards.reward_for(kind), engine, notifier)?;
        self.stats.record(kind);
        log::debug!("Completed {} (+{} XP)", kind.name(), rewards.reward_for(kind));
        Ok(level_up)
    }

    /// Add XP, recompute the level and emit a level-up if one happened.
    /// The profile is left untouched on error.
    pub fn award_xp(
        &mut self,
        amount: u32,
        engine: &LevelingEngine,
        notifier: &mut LevelUpNotifier,
    ) -> Result<Option<LevelUp>, LevelError> {
        let new_total = self.total_xp.saturating_add(i64::from(amount));
        let new_level = engine.level_from_xp(new_total)?;
        let previous_level = self.level;

        self.total_xp = new_total;
        self.level = new_level;

        if new_level > previous_level {
            let event = LevelUp { previous_level, new_level, total_xp: new_total };
            notifier.emit(&event);
            Ok(Some(event))
        } else {
            Ok(None)
        }
    }

    /// Progress within the current level
    pub fn progress(&self, engine: &LevelingEngine) -> Result<LevelProgress, LevelError> {
        engine.level_progress(self.total_xp, self.level)
    }

    /// Fix values that could not have been written by this program:
    /// negative XP is clamped to 0 and a stale level is recomputed.
    /// Returns true if anything changed.
    pub fn repair(&mut self, engine: &LevelingEngine) -> bool {
        let mut changed = false;
        if self.total_xp < 0 {
            log::warn!("Profile had negative XP ({}), resetting to 0", self.total_xp);
            self.total_xp = 0;
            changed = true;
        }
        // Non-negative now, so this can't fail
        let level = engine.level_from_xp(self.total_xp).unwrap_or(1);
        if level != self.level {
            log::warn!("Profile level {} did not match {} XP, corrected to {}", self.level, self.total_xp, level);
            self.level = level;
            changed = true;
        }
        changed
    }
}

// ============================================================================
// Profile Storage
// ============================================================================

/// Get the profile file path
pub fn profile_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "questline", "Questline") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("profile.json");
        path
    } else {
        PathBuf::from("./profile.json")
    }
}

/// Read a profile from a specific file
pub fn load_profile_from(path: &Path) -> Result<LearnerProfile, ProfileError> {
    let data = fs::read_to_string(path)?;
    let profile: LearnerProfile = serde_json::from_str(&data)?;

    if profile.version != PROFILE_VERSION {
        return Err(ProfileError::VersionMismatch {
            expected: PROFILE_VERSION,
            found: profile.version,
        });
    }
    Ok(profile)
}

/// Write a profile to a specific file
pub fn save_profile_to(profile: &LearnerProfile, path: &Path) -> Result<(), ProfileError> {
    // Ensure directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(profile)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load the learner profile (or create default), repairing stale values
pub fn load_profile(engine: &LevelingEngine) -> LearnerProfile {
    let path = profile_path();

    let mut profile = if path.exists() {
        match load_profile_from(&path) {
            Ok(profile) => {
                log::info!("Profile loaded from {:?}", path);
                profile
            }
            Err(e) => {
                log::warn!("Failed to load profile: {}, creating new", e);
                LearnerProfile::new()
            }
        }
    } else {
        log::info!("Creating new profile");
        LearnerProfile::new()
    };

    profile.repair(engine);
    profile
}

/// Save the learner profile
pub fn save_profile(profile: &LearnerProfile) -> Result<(), ProfileError> {
    let path = profile_path();
    save_profile_to(profile, &path)?;
    log::info!("Profile saved to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::LevelUpHistory;

    fn test_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("questline-test-{}", std::process::id()))
            .join(format!("{}.json", name))
    }

    #[test]
    fn test_complete_awards_xp() {
        let engine = LevelingEngine::default();
        let rewards = XpRewards::default();
        let mut notifier = LevelUpNotifier::new();
        let mut profile = LearnerProfile::new();

        let level_up = profile.complete(ContentKind::Mission, &rewards, &engine, &mut notifier).unwrap();
        assert_eq!(level_up, None);
        assert_eq!(profile.total_xp, 50);
        assert_eq!(profile.level, 1);
        assert_eq!(profile.stats.missions, 1);
    }

    #[test]
    fn test_level_up_is_emitted() {
        let engine = LevelingEngine::default();
        let rewards = XpRewards::default();
        let history = LevelUpHistory::new(4);
        let mut notifier = LevelUpNotifier::new();
        notifier.subscribe(history.clone());
        let mut profile = LearnerProfile::new();

        // 1000 XP skips straight from level 1 to level 3
        let level_up = profile
            .complete(ContentKind::Expedition, &rewards, &engine, &mut notifier)
            .unwrap()
            .expect("should level up");
        assert_eq!(level_up, LevelUp { previous_level: 1, new_level: 3, total_xp: 1000 });
        assert_eq!(level_up.levels_gained(), 2);
        assert_eq!(history.recent(), vec![level_up]);
        assert_eq!(profile.level, 3);

        let progress = profile.progress(&engine).unwrap();
        assert_eq!(progress.current, 250);
        assert_eq!(progress.required, 675);
    }

    #[test]
    fn test_quest_reaches_level_two_exactly() {
        let engine = LevelingEngine::default();
        let mut notifier = LevelUpNotifier::new();
        let mut profile = LearnerProfile::new();

        let level_up = profile
            .complete(ContentKind::Quest, &XpRewards::default(), &engine, &mut notifier)
            .unwrap();
        assert_eq!(level_up.map(|l| l.new_level), Some(2));
        assert_eq!(profile.progress(&engine).unwrap().current, 0);
        assert_eq!(profile.stats.total(), 1);
    }

    #[test]
    fn test_failed_award_leaves_profile_untouched() {
        let engine = LevelingEngine::default();
        let mut notifier = LevelUpNotifier::new();
        let mut profile = LearnerProfile { total_xp: -10, ..LearnerProfile::new() };
        let before = profile.clone();

        assert!(profile.award_xp(5, &engine, &mut notifier).is_err());
        assert_eq!(profile, before);
    }

    #[test]
    fn test_repair() {
        let engine = LevelingEngine::default();

        let mut negative = LearnerProfile { total_xp: -40, level: 2, ..LearnerProfile::new() };
        assert!(negative.repair(&engine));
        assert_eq!(negative.total_xp, 0);
        assert_eq!(negative.level, 1);

        let mut stale = LearnerProfile { total_xp: 800, level: 1, ..LearnerProfile::new() };
        assert!(stale.repair(&engine));
        assert_eq!(stale.level, 3);

        let mut fine = LearnerProfile { total_xp: 800, level: 3, ..LearnerProfile::new() };
        assert!(!fine.repair(&engine));
    }

    #[test]
    fn test_save_and_load() {
        let path = test_path("roundtrip");
        let mut profile = LearnerProfile::new();
        profile.total_xp = 1425;
        profile.level = 4;
        profile.stats.quests = 3;

        save_profile_to(&profile, &path).unwrap();
        let loaded = load_profile_from(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_version_mismatch() {
        let path = test_path("old-version");
        let profile = LearnerProfile { version: 99, ..LearnerProfile::new() };
        save_profile_to(&profile, &path).unwrap();
        let err = load_profile_from(&path).unwrap_err();
        let _ = fs::remove_file(&path);

        assert!(matches!(err, ProfileError::VersionMismatch { expected: 1, found: 99 }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_profile_from(&test_path("does-not-exist")).unwrap_err();
        assert!(matches!(err, ProfileError::Io(_)));
    }
}
