//! Player identification and per-player race data.
//!
//! ## PlayerId
//!
//! Type-safe seat identifier. Seats follow the order names were entered.
//!
//! ## Roster
//!
//! The players of one game, stored inline: a game never seats more than four.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Color tags handed out by seat.
pub const PLAYER_COLORS: [&str; 4] = ["red", "blue", "green", "yellow"];

/// Seat identifier.
///
/// Player indices are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use algebra_quest::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(players.len(), 3);
    /// assert_eq!(players[2], PlayerId::new(2));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// A racer on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Seat.
    pub id: PlayerId,
    /// Display name as entered at setup.
    pub name: String,
    /// Points earned. Only ever grows.
    pub score: u32,
    /// Index into the board.
    pub position: usize,
    /// Pawn color tag.
    pub color: String,
}

impl Player {
    /// Create a player at the start space with no points.
    ///
    /// The color is taken from [`PLAYER_COLORS`] by seat, wrapping around.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            score: 0,
            position: 0,
            color: PLAYER_COLORS[id.index() % PLAYER_COLORS.len()].to_string(),
        }
    }

    /// Add points.
    pub fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Move forward, stopping at `last_index`.
    ///
    /// Returns the new position.
    pub fn advance(&mut self, steps: usize, last_index: usize) -> usize {
        self.position = self.position.saturating_add(steps).min(last_index);
        self.position
    }

    /// Move backward, stopping at the start space.
    ///
    /// Returns the new position.
    pub fn retreat(&mut self, steps: usize) -> usize {
        self.position = self.position.saturating_sub(steps);
        self.position
    }
}

/// All players of one game, in seat order.
pub type Roster = SmallVec<[Player; 4]>;

/// Index of the leading player: strictly highest score, earliest seat on ties.
#[must_use]
pub fn leader_index(players: &[Player]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, player) in players.iter().enumerate() {
        match best {
            Some(b) if players[b].score >= player.score => {}
            _ => best = Some(i),
        }
    }
    best
}
