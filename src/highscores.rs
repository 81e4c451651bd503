//! Best score per level and the unlocked-level counter
//!
//! Both persist through the key/value store and only ever improve.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Best score for each level played
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub best: BTreeMap<u32, u64>,
}

impl HighScores {
    /// Store key
    pub const STORAGE_KEY: &'static str = "snake_horror_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Best score recorded for a level
    pub fn best(&self, level: u32) -> Option<u64> {
        self.best.get(&level).copied()
    }

    /// Check if a score would improve the level's record
    pub fn qualifies(&self, level: u32, score: u64) -> bool {
        self.best(level).map(|b| score > b).unwrap_or(true)
    }

    /// Record a score. Returns true if it became the new best.
    pub fn record(&mut self, level: u32, score: u64) -> bool {
        if !self.qualifies(level, score) {
            return false;
        }
        self.best.insert(level, score);
        true
    }

    /// Top score across all levels
    pub fn top_score(&self) -> Option<u64> {
        self.best.values().copied().max()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }

    /// Load from the store; malformed data yields an empty table
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(json) = store.get(Self::STORAGE_KEY) else {
            log::info!("No high scores found, starting fresh");
            return Self::new();
        };
        match serde_json::from_str::<HighScores>(&json) {
            Ok(scores) => {
                log::info!("Loaded high scores for {} levels", scores.best.len());
                scores
            }
            Err(e) => {
                log::warn!("Failed to parse high scores ({e}), starting fresh");
                Self::new()
            }
        }
    }

    /// Save to the store (best effort)
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        let result = serde_json::to_string(self)
            .map_err(Into::into)
            .and_then(|json| store.set(Self::STORAGE_KEY, &json));
        match result {
            Ok(()) => log::debug!("High scores saved ({} levels)", self.best.len()),
            Err(e) => log::warn!("Failed to save high scores: {e}"),
        }
    }
}

/// Highest level the player may select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUnlocks {
    max_level: u32,
}

impl Default for LevelUnlocks {
    fn default() -> Self {
        Self { max_level: 1 }
    }
}

impl LevelUnlocks {
    /// Store key
    pub const STORAGE_KEY: &'static str = "snake_horror_max_level";

    pub fn new(max_level: u32) -> Self {
        Self {
            max_level: max_level.max(1),
        }
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn is_unlocked(&self, level: u32) -> bool {
        level >= 1 && level <= self.max_level
    }

    /// Unlock the next level if `completed` is the current frontier.
    /// Returns true when the frontier moved.
    pub fn complete(&mut self, completed: u32) -> bool {
        if completed == self.max_level {
            self.max_level += 1;
            true
        } else {
            false
        }
    }

    /// Load from the store; missing or malformed values mean level 1
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY).map(|s| s.trim().parse::<u32>()) {
            Some(Ok(level)) => Self::new(level),
            Some(Err(e)) => {
                log::warn!("Malformed max level ({e}), resetting to 1");
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Save to the store (best effort)
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        if let Err(e) = store.set(Self::STORAGE_KEY, &self.max_level.to_string()) {
            log::warn!("Failed to save max level: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_record_only_improves() {
        let mut scores = HighScores::new();
        assert!(scores.record(1, 40));
        assert!(!scores.record(1, 30));
        assert!(!scores.record(1, 40));
        assert!(scores.record(1, 90));
        assert_eq!(scores.best(1), Some(90));
        assert_eq!(scores.best(2), None);
    }

    #[test]
    fn test_first_score_counts_even_if_zero() {
        let mut scores = HighScores::new();
        assert!(scores.record(3, 0));
        assert_eq!(scores.best(3), Some(0));
    }

    #[test]
    fn test_top_score() {
        let mut scores = HighScores::new();
        assert!(scores.is_empty());
        scores.record(1, 50);
        scores.record(4, 120);
        assert_eq!(scores.top_score(), Some(120));
    }

    #[test]
    fn test_scores_roundtrip_and_corruption() {
        let mut store = MemoryStore::new();
        let mut scores = HighScores::new();
        scores.record(2, 70);
        scores.save(&mut store);
        assert_eq!(HighScores::load(&store), scores);

        store.set(HighScores::STORAGE_KEY, "nope").unwrap();
        assert!(HighScores::load(&store).is_empty());
    }

    #[test]
    fn test_unlock_only_at_frontier() {
        let mut unlocks = LevelUnlocks::new(3);
        assert!(!unlocks.complete(2));
        assert_eq!(unlocks.max_level(), 3);
        assert!(unlocks.complete(3));
        assert_eq!(unlocks.max_level(), 4);
        assert!(unlocks.is_unlocked(4));
        assert!(!unlocks.is_unlocked(5));
        assert!(!unlocks.is_unlocked(0));
    }

    #[test]
    fn test_unlocks_load_fallbacks() {
        let mut store = MemoryStore::new();
        assert_eq!(LevelUnlocks::load(&store).max_level(), 1);

        store.set(LevelUnlocks::STORAGE_KEY, "seven").unwrap();
        assert_eq!(LevelUnlocks::load(&store).max_level(), 1);

        LevelUnlocks::new(6).save(&mut store);
        assert_eq!(LevelUnlocks::load(&store).max_level(), 6);
    }
}
