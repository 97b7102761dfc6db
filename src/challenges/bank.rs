//! Challenge definitions and the bank they are drawn from.

use serde::{Deserialize, Serialize};

use crate::core::RandomSource;

/// Challenge identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChallengeId(pub u32);

impl ChallengeId {
    /// Create a new challenge ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Challenge({})", self.0)
    }
}

/// An algebra question: solve for `x`.
#[derive(Clone, Debug)]
pub struct Challenge {
    /// Unique within a bank.
    pub id: ChallengeId,
    /// Equation shown to the player.
    pub question: String,
    solve: fn() -> f64,
}

impl Challenge {
    /// Create a challenge whose answer is computed by `solve`.
    pub fn new(id: u32, question: impl Into<String>, solve: fn() -> f64) -> Self {
        Self {
            id: ChallengeId::new(id),
            question: question.into(),
            solve,
        }
    }

    /// The correct value of `x`.
    #[must_use]
    pub fn solution(&self) -> f64 {
        (self.solve)()
    }

    /// Whether `value` is exactly the solution.
    #[must_use]
    pub fn is_solved_by(&self, value: f64) -> bool {
        value == self.solution()
    }
}

/// Registry of challenges.
///
/// Keeps insertion order so a drawn index maps to the same challenge for the
/// same seed.
#[derive(Clone, Debug, Default)]
pub struct ChallengeBank {
    challenges: Vec<Challenge>,
}

impl ChallengeBank {
    /// Create a new empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard set of linear equations.
    #[must_use]
    pub fn standard() -> Self {
        let mut bank = Self::new();
        bank.register(Challenge::new(1, "2x + 3 = 11", || (11.0 - 3.0) / 2.0));
        bank.register(Challenge::new(2, "5x - 7 = 3x + 1", || (1.0 + 7.0) / (5.0 - 3.0)));
        bank.register(Challenge::new(3, "x / 2 + 1 = 4", || (4.0 - 1.0) * 2.0));
        bank.register(Challenge::new(4, "3(x - 2) = 12", || 12.0 / 3.0 + 2.0));
        bank.register(Challenge::new(5, "4x = 10", || 10.0 / 4.0));
        bank.register(Challenge::new(6, "x - 9 = -4", || -4.0 + 9.0));
        bank.register(Challenge::new(7, "7x = 49", || 49.0 / 7.0));
        bank.register(Challenge::new(8, "2x + 5 = x + 9", || 9.0 - 5.0));
        bank.register(Challenge::new(9, "10 - x = 3", || 10.0 - 3.0));
        bank.register(Challenge::new(10, "x / 3 = 5", || 5.0 * 3.0));
        bank.register(Challenge::new(11, "6x + 2 = 20", || (20.0 - 2.0) / 6.0));
        bank.register(Challenge::new(12, "-2x = 8", || 8.0 / -2.0));
        bank.register(Challenge::new(13, "0.5x = 3", || 3.0 / 0.5));
        bank.register(Challenge::new(14, "4(x + 1) = 2x + 10", || (10.0 - 4.0) / (4.0 - 2.0)));
        bank.register(Challenge::new(15, "9x - 4 = 5x + 12", || (12.0 + 4.0) / (9.0 - 5.0)));
        bank
    }

    /// Register a challenge.
    ///
    /// Panics if a challenge with the same ID already exists.
    pub fn register(&mut self, challenge: Challenge) {
        if self.contains(challenge.id) {
            panic!("Challenge with ID {:?} already registered", challenge.id);
        }
        self.challenges.push(challenge);
    }

    /// Get a challenge by ID.
    #[must_use]
    pub fn get(&self, id: ChallengeId) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id == id)
    }

    /// Get a challenge by position in the bank.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Challenge> {
        self.challenges.get(index)
    }

    /// Check if a challenge ID is registered.
    #[must_use]
    pub fn contains(&self, id: ChallengeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of challenges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    /// Check if the bank is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    /// Iterate over all challenges.
    pub fn iter(&self) -> impl Iterator<Item = &Challenge> {
        self.challenges.iter()
    }

    /// Draw one challenge uniformly at random.
    ///
    /// Returns its index and the challenge, or `None` for an empty bank.
    pub fn draw(&self, rng: &mut impl RandomSource) -> Option<(usize, &Challenge)> {
        if self.challenges.is_empty() {
            return None;
        }
        let index = rng.pick_index(self.challenges.len());
        self.challenges.get(index).map(|c| (index, c))
    }
}
