//! Game configuration types.
//!
//! - `Timings`: the presentation delays between turn transitions
//! - `Scoring`: points and setbacks applied by spaces and challenges
//! - `GameConfig`: combines all configuration
//!
//! Every field has a default matching the standard game, so a JSON config
//! only needs the keys it overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON could not be parsed.
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Player bounds are unusable.
    #[error("player bounds {min}..={max} are invalid")]
    PlayerBounds { min: usize, max: usize },

    /// A die needs at least one face.
    #[error("die must have at least one face")]
    NoDieFaces,

    /// Challenges need at least one tick to answer in.
    #[error("challenge countdown must be at least one tick")]
    NoChallengeTicks,

    /// A zero-length tick would never advance the countdown.
    #[error("challenge tick length must be non-zero")]
    ZeroTick,
}

/// Delays between turn transitions, in milliseconds of virtual time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Dice animation: roll until the pawn starts moving.
    pub roll_to_move_ms: u64,
    /// Pawn glide: movement until the landing message.
    pub move_to_land_ms: u64,
    /// Landing message until the space effect resolves.
    pub land_to_resolve_ms: u64,
    /// Result message until the next player's turn.
    pub end_turn_ms: u64,
    /// Length of one challenge countdown tick.
    pub challenge_tick_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            roll_to_move_ms: 1500,
            move_to_land_ms: 1000,
            land_to_resolve_ms: 1500,
            end_turn_ms: 2000,
            challenge_tick_ms: 1000,
        }
    }
}

impl Timings {
    /// All delays zero except the tick, which must stay positive.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            roll_to_move_ms: 0,
            move_to_land_ms: 0,
            land_to_resolve_ms: 0,
            end_turn_ms: 0,
            challenge_tick_ms: 1,
        }
    }
}

/// Points and setbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scoring {
    /// Points for landing on a lucky space.
    pub lucky_bonus: u32,
    /// Points for a correct challenge answer.
    pub correct_answer: u32,
    /// Points for reaching the finish.
    pub finish_bonus: u32,
    /// Spaces lost on an unlucky space or a failed challenge.
    pub setback_spaces: usize,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            lucky_bonus: 5,
            correct_answer: 10,
            finish_bonus: 25,
            setback_spaces: 3,
        }
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fewest players a game may start with.
    pub min_players: usize,

    /// Most players a game may start with.
    pub max_players: usize,

    /// Faces on the die.
    pub die_faces: u8,

    /// Ticks a player has to answer a challenge.
    pub challenge_ticks: u32,

    /// Transition delays.
    pub timings: Timings,

    /// Points and setbacks.
    pub scoring: Scoring,

    /// Seed for the default random source.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 4,
            die_faces: 6,
            challenge_ticks: 30,
            timings: Timings::default(),
            scoring: Scoring::default(),
            seed: 42,
        }
    }
}

impl GameConfig {
    /// Create the standard configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) JSON configuration and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is playable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_players == 0
            || self.min_players > self.max_players
            || self.max_players > usize::from(u8::MAX)
        {
            return Err(ConfigError::PlayerBounds {
                min: self.min_players,
                max: self.max_players,
            });
        }
        if self.die_faces == 0 {
            return Err(ConfigError::NoDieFaces);
        }
        if self.challenge_ticks == 0 {
            return Err(ConfigError::NoChallengeTicks);
        }
        if self.timings.challenge_tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        Ok(())
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the transition delays.
    #[must_use]
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// Set points and setbacks.
    #[must_use]
    pub fn with_scoring(mut self, scoring: Scoring) -> Self {
        self.scoring = scoring;
        self
    }

    /// Set the challenge countdown length in ticks.
    #[must_use]
    pub fn with_challenge_ticks(mut self, ticks: u32) -> Self {
        self.challenge_ticks = ticks;
        self
    }

    /// Set the player count bounds.
    #[must_use]
    pub fn with_player_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_players = min;
        self.max_players = max;
        self
    }

    /// Full countdown length in milliseconds.
    #[must_use]
    pub fn challenge_duration_ms(&self) -> u64 {
        u64::from(self.challenge_ticks) * self.timings.challenge_tick_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();

        assert_eq!(config.min_players, 2);
        assert_eq!(config.max_players, 4);
        assert_eq!(config.die_faces, 6);
        assert_eq!(config.challenge_ticks, 30);
        assert_eq!(config.scoring.finish_bonus, 25);
        assert_eq!(config.timings.end_turn_ms, 2000);
        assert_eq!(config.challenge_duration_ms(), 30_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = GameConfig::new()
            .with_seed(7)
            .with_challenge_ticks(5)
            .with_timings(Timings::instant())
            .with_player_bounds(1, 2);

        assert_eq!(config.seed, 7);
        assert_eq!(config.challenge_ticks, 5);
        assert_eq!(config.timings.roll_to_move_ms, 0);
        assert_eq!(config.max_players, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = GameConfig::from_json_str(
            r#"{ "seed": 99, "scoring": { "lucky_bonus": 8 } }"#,
        )
        .unwrap();

        assert_eq!(config.seed, 99);
        assert_eq!(config.scoring.lucky_bonus, 8);
        assert_eq!(config.scoring.correct_answer, 10);
        assert_eq!(config.max_players, 4);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            GameConfig::new().with_player_bounds(3, 2).validate(),
            Err(ConfigError::PlayerBounds { min: 3, max: 2 })
        ));
        assert!(GameConfig::new().with_player_bounds(2, 300).validate().is_err());
        assert!(matches!(
            GameConfig::new().with_challenge_ticks(0).validate(),
            Err(ConfigError::NoChallengeTicks)
        ));
        assert!(matches!(
            GameConfig::from_json_str(r#"{ "die_faces": 0 }"#),
            Err(ConfigError::NoDieFaces)
        ));
        assert!(matches!(
            GameConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
