//! Completion rewards
//!
//! Fixed XP granted for finishing each kind of learning content.

use serde::{Deserialize, Serialize};

/// Kinds of content a learner can complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    /// A single exercise
    Mission,
    /// A course
    Quest,
    /// A learning path spanning several courses
    Expedition,
}

impl ContentKind {
    pub fn name(&self) -> &'static str {
        match self {
            ContentKind::Mission => "Mission",
            ContentKind::Quest => "Quest",
            ContentKind::Expedition => "Expedition",
        }
    }
}

/// XP reward per content kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XpRewards {
    pub mission: u32,
    pub quest: u32,
    pub expedition: u32,
}

impl Default for XpRewards {
    fn default() -> Self {
        Self {
            mission: 50,
            quest: 300,
            expedition: 1000,
        }
    }
}

impl XpRewards {
    pub fn reward_for(&self, kind: ContentKind) -> u32 {
        match kind {
            ContentKind::Mission => self.mission,
            ContentKind::Quest => self.quest,
            ContentKind::Expedition => self.expedition,
        }
    }
}
