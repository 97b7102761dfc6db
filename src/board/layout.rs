//! Board spaces and the validated race track.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a space does when a pawn lands on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceKind {
    /// Where every pawn begins. No effect.
    Start,
    /// Draws a timed algebra challenge.
    Challenge,
    /// Rest stop. No effect.
    Safe,
    /// End of the race. Bonus points, then the game ends.
    Finish,
    /// Bonus points.
    Lucky,
    /// Go back a few spaces.
    Unlucky,
}

impl SpaceKind {
    /// Title used when a layout is built from kinds alone.
    #[must_use]
    pub const fn default_title(self) -> &'static str {
        match self {
            SpaceKind::Start => "Start",
            SpaceKind::Challenge => "Challenge",
            SpaceKind::Safe => "Rest",
            SpaceKind::Finish => "Finish",
            SpaceKind::Lucky => "Lucky",
            SpaceKind::Unlucky => "Unlucky",
        }
    }
}

/// One cell of the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSpace {
    /// Effect.
    #[serde(rename = "type")]
    pub kind: SpaceKind,
    /// Display title.
    pub title: String,
}

impl BoardSpace {
    /// Create a space with a custom title.
    pub fn new(kind: SpaceKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
        }
    }
}

impl From<SpaceKind> for BoardSpace {
    fn from(kind: SpaceKind) -> Self {
        Self::new(kind, kind.default_title())
    }
}

/// A layout that breaks the track rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    /// Fewer than two spaces.
    #[error("board needs at least 2 spaces, got {len}")]
    TooShort { len: usize },

    /// Index 0 is not a start space.
    #[error("first space must be start")]
    MissingStart,

    /// Last index is not a finish space.
    #[error("last space must be finish")]
    MissingFinish,

    /// A start space somewhere other than index 0.
    #[error("start space at index {index}, only index 0 may be start")]
    MisplacedStart { index: usize },

    /// A finish space somewhere other than the last index.
    #[error("finish space at index {index}, only the last index may be finish")]
    MisplacedFinish { index: usize },

    /// Layout JSON could not be parsed.
    #[error("malformed board: {0}")]
    Parse(String),
}

/// Ordered race track.
///
/// Invariant: exactly one start at index 0 and exactly one finish at the
/// last index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoardLayout {
    spaces: Vec<BoardSpace>,
}

impl BoardLayout {
    /// Validate and build a layout.
    pub fn new(spaces: Vec<BoardSpace>) -> Result<Self, BoardError> {
        let len = spaces.len();
        if len < 2 {
            return Err(BoardError::TooShort { len });
        }
        if spaces[0].kind != SpaceKind::Start {
            return Err(BoardError::MissingStart);
        }
        if spaces[len - 1].kind != SpaceKind::Finish {
            return Err(BoardError::MissingFinish);
        }
        for (index, space) in spaces.iter().enumerate().take(len - 1).skip(1) {
            match space.kind {
                SpaceKind::Start => return Err(BoardError::MisplacedStart { index }),
                SpaceKind::Finish => return Err(BoardError::MisplacedFinish { index }),
                _ => {}
            }
        }
        Ok(Self { spaces })
    }

    /// Build a layout from kinds, using each kind's default title.
    pub fn from_kinds(kinds: &[SpaceKind]) -> Result<Self, BoardError> {
        Self::new(kinds.iter().copied().map(BoardSpace::from).collect())
    }

    /// Parse a JSON array of `{ "type": ..., "title": ... }` and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, BoardError> {
        let spaces: Vec<BoardSpace> =
            serde_json::from_str(json).map_err(|e| BoardError::Parse(e.to_string()))?;
        Self::new(spaces)
    }

    /// The standard 20-space track.
    #[must_use]
    pub fn standard() -> Self {
        use SpaceKind::*;

        let track = [
            (Start, "Start"),
            (Challenge, "Challenge"),
            (Safe, "Rest"),
            (Challenge, "Challenge"),
            (Lucky, "Lucky"),
            (Challenge, "Challenge"),
            (Unlucky, "Unlucky"),
            (Challenge, "Challenge"),
            (Safe, "Rest"),
            (Lucky, "Lucky"),
            (Challenge, "Challenge"),
            (Unlucky, "Unlucky"),
            (Challenge, "Challenge"),
            (Safe, "Rest"),
            (Lucky, "Lucky"),
            (Challenge, "Challenge"),
            (Unlucky, "Unlucky"),
            (Challenge, "Challenge"),
            (Safe, "Rest"),
            (Finish, "Finish"),
        ];

        Self {
            spaces: track
                .iter()
                .map(|&(kind, title)| BoardSpace::new(kind, title))
                .collect(),
        }
    }

    /// Number of spaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    /// Always false: a valid layout has at least two spaces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    /// Index of the finish space.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.spaces.len() - 1
    }

    /// Space at `index`, if on the board.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&BoardSpace> {
        self.spaces.get(index)
    }

    /// Space at `index`, clamped onto the board.
    #[must_use]
    pub fn space_at(&self, index: usize) -> &BoardSpace {
        &self.spaces[index.min(self.last_index())]
    }

    /// Iterate spaces in track order.
    pub fn iter(&self) -> impl Iterator<Item = &BoardSpace> {
        self.spaces.iter()
    }

    /// How many spaces of `kind` the track has.
    #[must_use]
    pub fn count(&self, kind: SpaceKind) -> usize {
        self.spaces.iter().filter(|s| s.kind == kind).count()
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SpaceKind::*;

    #[test]
    fn test_standard_board_is_valid() {
        let board = BoardLayout::standard();

        assert_eq!(board.len(), 20);
        assert_eq!(board.last_index(), 19);
        assert_eq!(board.space_at(0).kind, Start);
        assert_eq!(board.space_at(19).kind, Finish);
        assert_eq!(board.count(Start), 1);
        assert_eq!(board.count(Finish), 1);

        // Rebuilding through the validator must succeed.
        let spaces: Vec<_> = board.iter().cloned().collect();
        assert_eq!(BoardLayout::new(spaces).unwrap(), board);
    }

    #[test]
    fn test_from_kinds_uses_default_titles() {
        let board = BoardLayout::from_kinds(&[Start, Lucky, Safe, Finish]).unwrap();

        assert_eq!(board.space_at(1).title, "Lucky");
        assert_eq!(board.space_at(2).title, "Rest");
    }

    #[test]
    fn test_space_at_clamps() {
        let board = BoardLayout::from_kinds(&[Start, Finish]).unwrap();
        assert_eq!(board.space_at(99).kind, Finish);
        assert!(board.get(99).is_none());
    }

    #[test]
    fn test_rejects_invalid_tracks() {
        assert_eq!(
            BoardLayout::from_kinds(&[Finish]),
            Err(BoardError::TooShort { len: 1 })
        );
        assert_eq!(
            BoardLayout::from_kinds(&[Safe, Finish]),
            Err(BoardError::MissingStart)
        );
        assert_eq!(
            BoardLayout::from_kinds(&[Start, Safe]),
            Err(BoardError::MissingFinish)
        );
        assert_eq!(
            BoardLayout::from_kinds(&[Start, Start, Finish]),
            Err(BoardError::MisplacedStart { index: 1 })
        );
        assert_eq!(
            BoardLayout::from_kinds(&[Start, Finish, Safe, Finish]),
            Err(BoardError::MisplacedFinish { index: 1 })
        );
    }

    #[test]
    fn test_from_json() {
        let board = BoardLayout::from_json_str(
            r#"[
                { "type": "start", "title": "Go" },
                { "type": "unlucky", "title": "Pothole" },
                { "type": "finish", "title": "Goal" }
            ]"#,
        )
        .unwrap();

        assert_eq!(board.space_at(1), &BoardSpace::new(Unlucky, "Pothole"));
        assert!(matches!(
            BoardLayout::from_json_str(r#"[{ "type": "teleport", "title": "?" }]"#),
            Err(BoardError::Parse(_))
        ));
    }
}
