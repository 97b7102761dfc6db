//! Core engine types: players, randomness, virtual time, configuration.

pub mod player;
pub mod rng;
pub mod clock;
pub mod config;

pub use player::{leader_index, Player, PlayerId, Roster, PLAYER_COLORS};
pub use rng::{GameRng, RandomSource, ScriptedSource, SeededSource};
pub use clock::{Scheduler, TimerId};
pub use config::{ConfigError, GameConfig, Scoring, Timings};
