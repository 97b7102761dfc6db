//! The turn engine.
//!
//! - `state`: screen and turn phases, plus the snapshot type
//! - `events`: the transition log the presentation layer consumes
//! - `turn`: `TurnEngine`, which owns the game and sequences every turn

pub mod state;
pub mod events;
pub mod turn;

pub use state::{ChallengeView, GameSnapshot, GameState, TurnState};
pub use events::{AnswerOutcome, EventRecord, GameEvent};
pub use turn::{EngineError, SetupError, TurnEngine};
