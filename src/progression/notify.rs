//! Level-up notifications
//!
//! Whoever awards XP emits a [`LevelUp`] through a [`LevelUpNotifier`],
//! which fans it out to every subscribed listener.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// A learner crossed one or more level boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    pub previous_level: u32,
    pub new_level: u32,
    /// Total XP after the award that caused the level-up
    pub total_xp: i64,
}

impl LevelUp {
    pub fn levels_gained(&self) -> u32 {
        self.new_level.saturating_sub(self.previous_level)
    }
}

/// Receives level-up events
pub trait LevelUpListener: Send {
    fn on_level_up(&mut self, event: &LevelUp);
}

/// Fans level-up events out to subscribed listeners
#[derive(Default)]
pub struct LevelUpNotifier {
    listeners: Vec<Box<dyn LevelUpListener>>,
}

impl LevelUpNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl LevelUpListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, event: &LevelUp) {
        for listener in &mut self.listeners {
            listener.on_level_up(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Writes level-ups to the log
#[derive(Debug, Default)]
pub struct LogListener;

impl LevelUpListener for LogListener {
    fn on_level_up(&mut self, event: &LevelUp) {
        log::info!(
            "Level up: {} -> {} ({} XP total)",
            event.previous_level, event.new_level, event.total_xp
        );
    }
}

/// Bounded list of recent level-ups, shared between the notifier and readers
#[derive(Debug, Clone)]
pub struct LevelUpHistory {
    events: Arc<Mutex<VecDeque<LevelUp>>>,
    capacity: usize,
}

impl LevelUpHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    /// Newest first
    pub fn recent(&self) -> Vec<LevelUp> {
        self.events.lock().iter().rev().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl LevelUpListener for LevelUpHistory {
    fn on_level_up(&mut self, event: &LevelUp) {
        let mut events = self.events.lock();
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(*event);
    }
}
