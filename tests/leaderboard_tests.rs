//! Leaderboard persistence tests.

use algebra_quest::board::{BoardLayout, SpaceKind};
use algebra_quest::challenges::ChallengeBank;
use algebra_quest::core::{GameConfig, ScriptedSource, Timings};
use algebra_quest::engine::{GameEvent, GameState, TurnEngine};
use algebra_quest::leaderboard::{
    FileStore, KeyValueStore, Leaderboard, MemoryStore, ScoreEntry, StorageError,
    LEADERBOARD_KEY, MAX_SCORES,
};

/// Reads like an empty store, rejects every write.
#[derive(Default)]
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: String) -> Result<(), StorageError> {
        Err(StorageError::ReadOnly)
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::ReadOnly)
    }
}

/// A two-player game on a four-space track, already over.
///
/// Ana rolls 3 and finishes at once with 25 points; Bia never moves.
fn finished_game() -> TurnEngine<ScriptedSource> {
    let board = BoardLayout::from_kinds(&[
        SpaceKind::Start,
        SpaceKind::Safe,
        SpaceKind::Safe,
        SpaceKind::Finish,
    ])
    .unwrap();
    let config = GameConfig::default().with_timings(Timings::instant());
    let rng = ScriptedSource::new(1).with_rolls([3]);
    let mut engine = TurnEngine::with_parts(config, board, ChallengeBank::new(), rng).unwrap();

    engine.start_game(&["Ana", "Bia"]).unwrap();
    engine.roll_dice();
    engine.settle();
    assert_eq!(engine.game_state(), GameState::GameOver);
    engine
}

#[test]
fn test_keeps_top_ten_sorted() {
    let mut board = Leaderboard::new(MemoryStore::new());

    for i in 0..15u32 {
        board
            .save_score(ScoreEntry::new(format!("p{i}"), (i * 7) % 40, u64::from(i)))
            .unwrap();
    }

    let scores = board.get_scores();
    assert_eq!(scores.len(), MAX_SCORES);
    for pair in scores.windows(2) {
        assert!(
            pair[0].score > pair[1].score
                || (pair[0].score == pair[1].score && pair[0].timestamp > pair[1].timestamp),
            "{pair:?} out of order"
        );
    }
}

#[test]
fn test_low_score_not_kept_when_full() {
    let mut board = Leaderboard::new(MemoryStore::new());
    for i in 0..MAX_SCORES as u64 {
        board.save_score(ScoreEntry::new("high", 50, i)).unwrap();
    }

    board.save_score(ScoreEntry::new("low", 1, 99)).unwrap();

    let scores = board.get_scores();
    assert_eq!(scores.len(), MAX_SCORES);
    assert!(scores.iter().all(|s| s.name == "high"));
}

#[test]
fn test_stored_as_json_array() {
    let mut board = Leaderboard::new(MemoryStore::new());
    board.save_score(ScoreEntry::new("Ana", 35, 1_700_000_000_000)).unwrap();

    let raw = board.store().get(LEADERBOARD_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{ "name": "Ana", "score": 35, "timestamp": 1_700_000_000_000u64 }])
    );
}

#[test]
fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut board = Leaderboard::new(FileStore::new(dir.path()));
        board.save_score(ScoreEntry::new("Ana", 20, 1)).unwrap();
        board.save_score(ScoreEntry::new("Bia", 30, 2)).unwrap();
    }

    let reopened = Leaderboard::new(FileStore::new(dir.path()));
    let names: Vec<_> = reopened.get_scores().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["Bia", "Ana"]);
}

#[test]
fn test_file_store_corrupt_file_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    std::fs::write(store.path_for(LEADERBOARD_KEY), "[{\"name\":").unwrap();

    let board = Leaderboard::new(store);
    assert!(board.get_scores().is_empty());
}

#[test]
fn test_failed_write_is_reported() {
    let mut board = Leaderboard::new(ReadOnlyStore);

    let err = board.save_score(ScoreEntry::new("Ana", 1, 1)).unwrap_err();
    assert!(err.to_string().contains("read-only"));
    assert!(board.get_scores().is_empty());
}

#[test]
fn test_save_and_exit_writes_every_player() {
    let mut engine = finished_game();
    let mut board = Leaderboard::new(MemoryStore::new());

    let highlighted = engine.save_and_exit(&mut board, 1_000);

    assert_eq!(highlighted, Some(1_000));
    let scores = board.get_scores();
    assert_eq!(
        scores,
        vec![ScoreEntry::new("Ana", 25, 1_000), ScoreEntry::new("Bia", 0, 1_001)]
    );

    let snap = engine.snapshot();
    assert_eq!(snap.game_state, GameState::Leaderboard);
    assert!(snap.players.is_empty());
    assert!(snap.winner.is_none());
    assert_eq!(snap.highlighted_timestamp, Some(1_000));
    assert_eq!(
        engine.history().last().map(|r| r.event.clone()),
        Some(GameEvent::ScoresSaved { entries: 2 })
    );
}

#[test]
fn test_save_and_exit_only_after_game_over() {
    let mut engine = TurnEngine::new(GameConfig::default()).unwrap();
    let mut board = Leaderboard::new(MemoryStore::new());

    assert_eq!(engine.save_and_exit(&mut board, 1), None);

    engine.start_game(&["Ana", "Bia"]).unwrap();
    assert_eq!(engine.save_and_exit(&mut board, 1), None);
    assert!(board.get_scores().is_empty());
    assert_eq!(engine.game_state(), GameState::Playing);
}

#[test]
fn test_save_and_exit_survives_storage_failure() {
    let mut engine = finished_game();
    let mut board = Leaderboard::new(ReadOnlyStore);

    let highlighted = engine.save_and_exit(&mut board, 500);

    assert_eq!(highlighted, Some(500));
    assert_eq!(engine.game_state(), GameState::Leaderboard);
    assert_eq!(
        engine.history().last().map(|r| r.event.clone()),
        Some(GameEvent::ScoresSaved { entries: 0 })
    );
}

#[test]
fn test_leaderboard_navigation() {
    let mut engine = TurnEngine::new(GameConfig::default()).unwrap();

    assert!(engine.show_leaderboard());
    assert_eq!(engine.game_state(), GameState::Leaderboard);
    assert_eq!(engine.snapshot().highlighted_timestamp, None);

    assert!(engine.go_home());
    assert_eq!(engine.game_state(), GameState::Start);

    engine.start_game(&["Ana", "Bia"]).unwrap();
    assert!(!engine.show_leaderboard());
    assert!(!engine.go_home());
}
