//! Algebra challenges.
//!
//! - `bank`: the static question set and uniform draws from it
//! - `answer`: lenient parsing of typed answers

pub mod bank;
pub mod answer;

pub use bank::{Challenge, ChallengeBank, ChallengeId};
pub use answer::parse_answer;
