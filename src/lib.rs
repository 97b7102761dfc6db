//! # algebra-quest
//!
//! The engine behind a turn-based, 2 to 4 player board race. Players roll a
//! die, move along a fixed track, and either gain points, lose ground, or face
//! a timed algebra question depending on where they land. The first pawn to
//! the finish ends the game; the highest score wins and final scores go to a
//! persistent local leaderboard.
//!
//! ## Design Principles
//!
//! 1. **Single owner**: `TurnEngine` holds all game state. Callers send
//!    intents and read snapshots; nothing else mutates the game.
//!
//! 2. **Virtual time**: Every presentation delay is a timer on the engine's
//!    own scheduler. `advance` moves time forward, so a whole game can be
//!    played deterministically and instantly.
//!
//! 3. **Injected randomness**: Dice and challenge draws come from a
//!    `RandomSource`. The default is seeded; tests can script exact faces.
//!
//! ## Modules
//!
//! - `core`: Players, randomness, the virtual-time scheduler, configuration
//! - `board`: The track and its space kinds
//! - `challenges`: The question bank and answer parsing
//! - `engine`: Turn state machine, snapshots and the event log
//! - `leaderboard`: Sorted top-N scores over a key-value store
//! - `audio`: Sound cue service driven by engine events

pub mod core;
pub mod board;
pub mod challenges;
pub mod engine;
pub mod leaderboard;
pub mod audio;

// Re-export commonly used types
pub use crate::core::{
    leader_index, Player, PlayerId, Roster,
    GameRng, RandomSource, ScriptedSource, SeededSource,
    Scheduler, TimerId,
    ConfigError, GameConfig, Scoring, Timings,
};

pub use crate::board::{BoardError, BoardLayout, BoardSpace, SpaceKind};

pub use crate::challenges::{parse_answer, Challenge, ChallengeBank, ChallengeId};

pub use crate::engine::{
    AnswerOutcome, EventRecord, GameEvent,
    ChallengeView, GameSnapshot, GameState, TurnState,
    EngineError, SetupError, TurnEngine,
};

pub use crate::leaderboard::{
    FileStore, KeyValueStore, MemoryStore, StorageError,
    Leaderboard, LeaderboardError, ScoreEntry, LEADERBOARD_KEY, MAX_SCORES,
};

pub use crate::audio::{AudioBackend, AudioError, AudioSettings, Cue, SoundBoard};
