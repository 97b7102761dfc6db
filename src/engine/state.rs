//! Engine phases and the read-only snapshot handed to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::challenges::ChallengeId;
use crate::core::Player;

/// Which top-level screen is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    /// Title screen.
    #[default]
    Start,
    /// Entering player names.
    Setup,
    /// A game is running.
    Playing,
    /// Someone reached the finish; final standings shown.
    GameOver,
    /// Saved high scores.
    Leaderboard,
}

/// Sub-state of the active player's turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnState {
    /// Waiting for the player to roll.
    #[default]
    RollDice,
    /// Dice and pawn animating.
    Waiting,
    /// Landed; the space effect is pending or a challenge is open.
    Action,
}

/// The open challenge as the player sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeView {
    /// Which challenge.
    pub id: ChallengeId,
    /// Equation to solve.
    pub question: String,
    /// Countdown ticks left.
    pub time_left: u32,
}

/// Everything the presentation layer needs after a transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Active screen.
    pub game_state: GameState,
    /// Players in seat order.
    pub players: Vec<Player>,
    /// Seat whose turn it is.
    pub current_player_index: usize,
    /// Phase of that turn.
    pub turn_state: TurnState,
    /// Shown until the turn ends.
    pub dice_result: Option<u8>,
    /// Open challenge, if any.
    pub active_challenge: Option<ChallengeView>,
    /// Status line.
    pub turn_message: String,
    /// Set once the game is over.
    pub winner: Option<Player>,
    /// 1-based turn counter.
    pub turn_number: u32,
    /// Virtual time in milliseconds.
    pub now_ms: u64,
    /// Leaderboard entry to highlight after saving.
    pub highlighted_timestamp: Option<u64>,
}

impl GameSnapshot {
    /// The player whose turn it is, if a game is running.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }
}
