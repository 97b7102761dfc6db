//! Top-N score table persisted as JSON.

use std::cmp::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::store::{KeyValueStore, StorageError};

/// Slot the table is stored under.
pub const LEADERBOARD_KEY: &str = "algebra-quest-leaderboard";

/// Entries kept after each save.
pub const MAX_SCORES: usize = 10;

/// A failed leaderboard write.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// The backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The table could not be encoded.
    #[error("failed to encode scores: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One finished player's result.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Player name.
    pub name: String,
    /// Final score.
    pub score: u32,
    /// Milliseconds since the Unix epoch. Unique per entry.
    pub timestamp: u64,
}

impl ScoreEntry {
    /// Create an entry.
    pub fn new(name: impl Into<String>, score: u32, timestamp: u64) -> Self {
        Self {
            name: name.into(),
            score,
            timestamp,
        }
    }
}

/// Leaderboard order: higher score first, newer entry first on ties.
#[must_use]
pub fn rank_order(a: &ScoreEntry, b: &ScoreEntry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.timestamp.cmp(&a.timestamp))
}

/// Current wall-clock time in milliseconds since the Unix epoch.
#[must_use]
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Bounded, sorted score table over a key-value store.
#[derive(Clone, Debug)]
pub struct Leaderboard<S> {
    store: S,
    key: String,
    capacity: usize,
}

impl<S: KeyValueStore> Leaderboard<S> {
    /// Keep the top [`MAX_SCORES`] under [`LEADERBOARD_KEY`].
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: LEADERBOARD_KEY.to_string(),
            capacity: MAX_SCORES,
        }
    }

    /// Use a different slot.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Keep a different number of entries.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Entries kept after each save.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All entries, best first.
    ///
    /// A missing, unreadable or malformed table reads as empty.
    #[must_use]
    pub fn get_scores(&self) -> Vec<ScoreEntry> {
        let text = match self.store.get(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::error!("failed to read leaderboard: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<ScoreEntry>>(&text) {
            Ok(mut scores) => {
                scores.sort_by(rank_order);
                scores
            }
            Err(e) => {
                log::warn!("discarding malformed leaderboard: {e}");
                Vec::new()
            }
        }
    }

    /// Add one entry, keep the best `capacity`, and persist.
    pub fn save_score(&mut self, entry: ScoreEntry) -> Result<(), LeaderboardError> {
        let mut scores = self.get_scores();
        scores.push(entry);
        scores.sort_by(rank_order);
        scores.truncate(self.capacity);

        let json = serde_json::to_string(&scores)?;
        self.store.set(&self.key, json).map_err(|e| {
            log::error!("failed to save leaderboard: {e}");
            LeaderboardError::from(e)
        })
    }

    /// Drop every entry.
    pub fn clear(&mut self) -> Result<(), LeaderboardError> {
        self.store.remove(&self.key)?;
        Ok(())
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the backing store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Take the backing store back.
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::MemoryStore;

    #[test]
    fn test_rank_order() {
        let mut scores = vec![
            ScoreEntry::new("a", 10, 1),
            ScoreEntry::new("b", 30, 2),
            ScoreEntry::new("c", 10, 3),
        ];
        scores.sort_by(rank_order);

        let names: Vec<_> = scores.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_empty_when_never_written() {
        let board = Leaderboard::new(MemoryStore::new());
        assert!(board.get_scores().is_empty());
    }

    #[test]
    fn test_malformed_reads_as_empty() {
        let mut store = MemoryStore::new();
        store.set(LEADERBOARD_KEY, "{ not json".to_string()).unwrap();

        let mut board = Leaderboard::new(store);
        assert!(board.get_scores().is_empty());

        // Saving over a corrupt table starts it fresh.
        board.save_score(ScoreEntry::new("Ana", 12, 5)).unwrap();
        assert_eq!(board.get_scores(), vec![ScoreEntry::new("Ana", 12, 5)]);
    }

    #[test]
    fn test_unsorted_storage_is_sorted_on_read() {
        let mut store = MemoryStore::new();
        store
            .set(
                LEADERBOARD_KEY,
                r#"[{"name":"low","score":1,"timestamp":1},{"name":"high","score":9,"timestamp":2}]"#
                    .to_string(),
            )
            .unwrap();

        let board = Leaderboard::new(store);
        assert_eq!(board.get_scores()[0].name, "high");
    }

    #[test]
    fn test_custom_key_and_capacity() {
        let mut board = Leaderboard::new(MemoryStore::new())
            .with_key("other")
            .with_capacity(2);

        for (i, score) in [5, 7, 6].into_iter().enumerate() {
            board.save_score(ScoreEntry::new(format!("p{i}"), score, i as u64)).unwrap();
        }

        let scores: Vec<_> = board.get_scores().iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![7, 6]);
        assert!(board.store().get(LEADERBOARD_KEY).unwrap().is_none());
    }

    #[test]
    fn test_unix_millis_is_recent() {
        // 2020-01-01 in milliseconds.
        assert!(unix_millis() > 1_577_836_800_000);
    }
}
