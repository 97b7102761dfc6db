//! Local high-score table.
//!
//! - `store`: the key-value backends (`MemoryStore`, `FileStore`)
//! - `scores`: the sorted, bounded table kept in one slot
//!
//! Reads never fail: anything unreadable is treated as an empty table.

pub mod store;
pub mod scores;

pub use store::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use scores::{
    rank_order, unix_millis, Leaderboard, LeaderboardError, ScoreEntry, LEADERBOARD_KEY,
    MAX_SCORES,
};
