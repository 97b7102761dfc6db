//! Transitions recorded by the engine.
//!
//! Every state change appends one `GameEvent` to the engine's history. The
//! presentation layer drains new records to trigger sounds and animations;
//! the engine itself never calls out.

use serde::{Deserialize, Serialize};

use crate::board::SpaceKind;
use crate::challenges::ChallengeId;
use crate::core::PlayerId;

/// How a challenge was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerOutcome {
    /// Matched the solution.
    Correct,
    /// Did not match, or was not a number.
    Incorrect,
    /// The countdown ran out.
    TimedOut,
}

impl AnswerOutcome {
    /// Whether the player earns the challenge points.
    #[must_use]
    pub const fn is_correct(self) -> bool {
        matches!(self, AnswerOutcome::Correct)
    }
}

/// Something that happened in the game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The setup screen was opened.
    SetupOpened,
    /// A new game began.
    GameStarted { players: usize },
    /// A player's turn began.
    TurnStarted { player: PlayerId },
    /// The die was rolled.
    DiceRolled { player: PlayerId, value: u8 },
    /// A pawn moved forward.
    PlayerMoved { player: PlayerId, from: usize, to: usize },
    /// A pawn came to rest on a space.
    Landed { player: PlayerId, position: usize, kind: SpaceKind },
    /// The landed space's effect was applied.
    SpaceResolved { player: PlayerId, kind: SpaceKind },
    /// A challenge was put to the player.
    ChallengePresented { player: PlayerId, challenge: ChallengeId },
    /// The challenge countdown ticked.
    ChallengeTick { remaining: u32 },
    /// A challenge was answered or expired.
    ChallengeResolved { player: PlayerId, outcome: AnswerOutcome },
    /// Points awarded.
    ScoreAwarded { player: PlayerId, points: u32, total: u32 },
    /// A pawn was sent back.
    SetBack { player: PlayerId, from: usize, to: usize },
    /// A pawn reached the finish.
    FinishReached { player: PlayerId },
    /// The game ended.
    GameOver { winner: PlayerId },
    /// The game was abandoned for a new setup.
    Restarted,
    /// Final scores were written to the leaderboard.
    ScoresSaved { entries: usize },
    /// The leaderboard screen was opened.
    LeaderboardShown,
    /// Back to the start screen.
    ReturnedHome,
}

/// A `GameEvent` stamped with when it happened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Virtual time in milliseconds.
    pub at_ms: u64,
    /// Turn number the event belongs to (0 outside a game).
    pub turn: u32,
    /// What happened.
    pub event: GameEvent,
}
