//! The race track.
//!
//! A board is a static, ordered list of spaces. The engine only reads it:
//! movement clamps to the last index and the landed space's kind decides the
//! turn's effect.

pub mod layout;

pub use layout::{BoardError, BoardLayout, BoardSpace, SpaceKind};
