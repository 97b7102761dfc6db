//! The turn state machine.
//!
//! A turn runs `RollDice → Waiting → Action` and then either resolves the
//! landed space at once or opens a timed challenge. Every delay between those
//! steps is a `TimerEvent` on the engine's virtual scheduler, so a caller
//! drives the game with intents (`roll_dice`, `submit_answer`, ...) and
//! `advance`, and nothing ever sleeps.
//!
//! Intents that arrive in the wrong phase are ignored and report so; they are
//! never errors.

use im::Vector;
use thiserror::Error;

use crate::board::{BoardLayout, SpaceKind};
use crate::challenges::{parse_answer, ChallengeBank};
use crate::core::{
    leader_index, ConfigError, GameConfig, Player, PlayerId, RandomSource, Roster, Scheduler,
    SeededSource,
};
use crate::leaderboard::{KeyValueStore, Leaderboard, ScoreEntry};

use super::events::{AnswerOutcome, EventRecord, GameEvent};
use super::state::{ChallengeView, GameSnapshot, GameState, TurnState};

/// The engine could not be built.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The board has challenge spaces but nothing to ask.
    #[error("board has challenge spaces but the challenge bank is empty")]
    EmptyChallengeBank,
}

/// A game could not be started.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    /// Not enough names.
    #[error("need at least {min} players, got {got}")]
    TooFewPlayers { min: usize, got: usize },

    /// Too many names.
    #[error("at most {max} players, got {got}")]
    TooManyPlayers { max: usize, got: usize },

    /// A name is empty or only whitespace.
    #[error("player {seat} has no name")]
    BlankName { seat: usize },

    /// A game is already running.
    #[error("a game is already in progress")]
    GameInProgress,
}

/// Scheduled transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerEvent {
    /// Dice animation finished: move the pawn.
    MovePawn { steps: usize },
    /// Pawn glide finished: show where it landed.
    Land,
    /// Apply the landed space.
    ResolveSpace,
    /// One countdown step of challenge `instance`.
    ChallengeTick { instance: u64 },
    /// Hand over to the next player.
    EndTurn,
}

#[derive(Clone, Debug)]
struct ActiveChallenge {
    instance: u64,
    index: usize,
    time_left: u32,
}

/// Owns all game state and sequences every turn.
#[derive(Clone, Debug)]
pub struct TurnEngine<R = SeededSource> {
    config: GameConfig,
    board: BoardLayout,
    bank: ChallengeBank,
    rng: R,
    scheduler: Scheduler<TimerEvent>,

    game_state: GameState,
    players: Roster,
    current: usize,
    turn: TurnState,
    turn_number: u32,
    dice: Option<u8>,
    active: Option<ActiveChallenge>,
    next_instance: u64,
    message: String,
    winner: Option<PlayerId>,
    highlighted: Option<u64>,

    history: Vector<EventRecord>,
    drained: usize,
}

impl TurnEngine<SeededSource> {
    /// Standard board and challenges, randomness seeded from `config.seed`.
    pub fn new(config: GameConfig) -> Result<Self, EngineError> {
        let rng = SeededSource::new(config.seed);
        Self::with_parts(config, BoardLayout::standard(), ChallengeBank::standard(), rng)
    }
}

impl<R: RandomSource> TurnEngine<R> {
    /// Build an engine from explicit parts.
    pub fn with_parts(
        config: GameConfig,
        board: BoardLayout,
        bank: ChallengeBank,
        rng: R,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        if bank.is_empty() && board.count(SpaceKind::Challenge) > 0 {
            return Err(EngineError::EmptyChallengeBank);
        }

        Ok(Self {
            config,
            board,
            bank,
            rng,
            scheduler: Scheduler::new(),
            game_state: GameState::Start,
            players: Roster::new(),
            current: 0,
            turn: TurnState::RollDice,
            turn_number: 0,
            dice: None,
            active: None,
            next_instance: 0,
            message: String::new(),
            winner: None,
            highlighted: None,
            history: Vector::new(),
            drained: 0,
        })
    }

    // === Accessors ===

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The track.
    #[must_use]
    pub fn board(&self) -> &BoardLayout {
        &self.board
    }

    /// The question set.
    #[must_use]
    pub fn bank(&self) -> &ChallengeBank {
        &self.bank
    }

    /// Active screen.
    #[must_use]
    pub fn game_state(&self) -> GameState {
        self.game_state
    }

    /// Phase of the current turn.
    #[must_use]
    pub fn turn_state(&self) -> TurnState {
        self.turn
    }

    /// Players in seat order. Empty outside a game.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Seat whose turn it is.
    #[must_use]
    pub fn current_player_index(&self) -> usize {
        self.current
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current)
    }

    /// Last roll, until the turn ends.
    #[must_use]
    pub fn dice_result(&self) -> Option<u8> {
        self.dice
    }

    /// Status line.
    #[must_use]
    pub fn turn_message(&self) -> &str {
        &self.message
    }

    /// Winner, once the game is over.
    #[must_use]
    pub fn winner(&self) -> Option<&Player> {
        self.winner.and_then(|id| self.players.get(id.index()))
    }

    /// Whether a challenge is waiting for an answer.
    #[must_use]
    pub fn has_active_challenge(&self) -> bool {
        self.active.is_some()
    }

    /// Virtual time in milliseconds.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    /// Read-only view for the presentation layer.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        let active_challenge = self.active.as_ref().and_then(|active| {
            self.bank.at(active.index).map(|c| ChallengeView {
                id: c.id,
                question: c.question.clone(),
                time_left: active.time_left,
            })
        });

        GameSnapshot {
            game_state: self.game_state,
            players: self.players.to_vec(),
            current_player_index: self.current,
            turn_state: self.turn,
            dice_result: self.dice,
            active_challenge,
            turn_message: self.message.clone(),
            winner: self.winner().cloned(),
            turn_number: self.turn_number,
            now_ms: self.scheduler.now(),
            highlighted_timestamp: self.highlighted,
        }
    }

    /// Every transition since the engine was built.
    #[must_use]
    pub fn history(&self) -> &Vector<EventRecord> {
        &self.history
    }

    /// Transitions recorded since the previous drain.
    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        let fresh: Vec<_> = self.history.iter().skip(self.drained).cloned().collect();
        self.drained = self.history.len();
        fresh
    }

    // === Screens ===

    /// Start screen → setup.
    pub fn open_setup(&mut self) -> bool {
        if self.game_state != GameState::Start {
            log::trace!("open_setup ignored in {:?}", self.game_state);
            return false;
        }
        self.game_state = GameState::Setup;
        self.record(GameEvent::SetupOpened);
        true
    }

    /// Show the leaderboard without a highlighted entry.
    pub fn show_leaderboard(&mut self) -> bool {
        if self.game_state == GameState::Playing {
            log::trace!("show_leaderboard ignored while playing");
            return false;
        }
        self.game_state = GameState::Leaderboard;
        self.highlighted = None;
        self.record(GameEvent::LeaderboardShown);
        true
    }

    /// Back to the start screen.
    pub fn go_home(&mut self) -> bool {
        if self.game_state == GameState::Playing {
            log::trace!("go_home ignored while playing");
            return false;
        }
        self.game_state = GameState::Start;
        self.record(GameEvent::ReturnedHome);
        true
    }

    // === Intents ===

    /// Seat players and begin the first turn.
    pub fn start_game<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), SetupError> {
        if self.game_state == GameState::Playing {
            return Err(SetupError::GameInProgress);
        }

        let got = names.len();
        if got < self.config.min_players {
            return Err(SetupError::TooFewPlayers {
                min: self.config.min_players,
                got,
            });
        }
        if got > self.config.max_players {
            return Err(SetupError::TooManyPlayers {
                max: self.config.max_players,
                got,
            });
        }
        let names: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        if let Some(seat) = names.iter().position(|n| n.trim().is_empty()) {
            return Err(SetupError::BlankName { seat });
        }

        self.scheduler.clear();
        self.players = PlayerId::all(got)
            .zip(names)
            .map(|(id, name)| Player::new(id, name))
            .collect();
        self.current = 0;
        self.turn = TurnState::RollDice;
        self.turn_number = 1;
        self.dice = None;
        self.active = None;
        self.message.clear();
        self.winner = None;
        self.highlighted = None;
        self.game_state = GameState::Playing;

        log::info!("game started with {got} players");
        self.record(GameEvent::GameStarted { players: got });
        self.record(GameEvent::TurnStarted {
            player: PlayerId::new(0),
        });
        Ok(())
    }

    /// Roll for the current player.
    ///
    /// Only accepted while waiting for a roll; returns whether it was.
    pub fn roll_dice(&mut self) -> bool {
        if self.game_state != GameState::Playing || self.turn != TurnState::RollDice {
            log::trace!("roll ignored in {:?}/{:?}", self.game_state, self.turn);
            return false;
        }

        let value = self.rng.roll_die(self.config.die_faces);
        let player = self.current_id();
        self.dice = Some(value);
        self.turn = TurnState::Waiting;
        self.message = format!("{} rolled a {}!", self.players[self.current].name, value);

        log::debug!("{player} rolled {value}");
        self.record(GameEvent::DiceRolled { player, value });
        self.scheduler.schedule(
            self.config.timings.roll_to_move_ms,
            TimerEvent::MovePawn {
                steps: usize::from(value),
            },
        );
        true
    }

    /// Answer the open challenge with raw input text.
    ///
    /// Text without a leading number counts as wrong. Returns `None` when no
    /// challenge is open.
    pub fn submit_answer(&mut self, raw: &str) -> Option<AnswerOutcome> {
        self.answer(parse_answer(raw))
    }

    /// Answer the open challenge with a number.
    pub fn submit_value(&mut self, value: f64) -> Option<AnswerOutcome> {
        self.answer(Some(value))
    }

    /// Abandon the current game or results and go back to setup.
    pub fn restart(&mut self) {
        self.scheduler.clear();
        self.players.clear();
        self.current = 0;
        self.turn = TurnState::RollDice;
        self.turn_number = 0;
        self.dice = None;
        self.active = None;
        self.message.clear();
        self.winner = None;
        self.highlighted = None;
        self.game_state = GameState::Setup;

        log::info!("game restarted");
        self.record(GameEvent::Restarted);
    }

    /// Write every player's final score and show the leaderboard.
    ///
    /// Only accepted once the game is over. Entry timestamps are
    /// `now_ms + seat` so they stay unique. Returns the winner's timestamp,
    /// which the leaderboard screen highlights. Storage failures are logged
    /// and otherwise ignored.
    pub fn save_and_exit<S: KeyValueStore>(
        &mut self,
        leaderboard: &mut Leaderboard<S>,
        now_ms: u64,
    ) -> Option<u64> {
        if self.game_state != GameState::GameOver {
            log::trace!("save_and_exit ignored in {:?}", self.game_state);
            return None;
        }

        let winner_seat = leader_index(&self.players);
        let mut highlighted = None;
        let mut saved = 0;

        for (seat, player) in self.players.iter().enumerate() {
            let timestamp = now_ms.saturating_add(seat as u64);
            if winner_seat == Some(seat) {
                highlighted = Some(timestamp);
            }
            let entry = ScoreEntry::new(player.name.clone(), player.score, timestamp);
            match leaderboard.save_score(entry) {
                Ok(()) => saved += 1,
                Err(e) => log::error!("score for {} not saved: {e}", player.name),
            }
        }

        log::info!("saved {saved} of {} scores", self.players.len());
        self.players.clear();
        self.current = 0;
        self.dice = None;
        self.message.clear();
        self.winner = None;
        self.highlighted = highlighted;
        self.game_state = GameState::Leaderboard;
        self.record(GameEvent::ScoresSaved { entries: saved });
        highlighted
    }

    // === Time ===

    /// Move virtual time forward by `ms`, firing every timer that falls due.
    pub fn advance(&mut self, ms: u64) {
        let until = self.scheduler.now().saturating_add(ms);
        while let Some((_, timer)) = self.scheduler.pop_due(until) {
            self.fire(timer);
        }
        self.scheduler.advance_to(until);
    }

    /// Advance until the engine needs input: no timer pending, or a
    /// challenge waiting for an answer.
    ///
    /// Returns the virtual milliseconds that passed.
    pub fn settle(&mut self) -> u64 {
        let start = self.scheduler.now();
        while self.active.is_none() {
            let Some(due) = self.scheduler.next_due() else {
                break;
            };
            let now = self.scheduler.now();
            self.advance(due.saturating_sub(now));
        }
        self.scheduler.now() - start
    }

    // === Transitions ===

    fn fire(&mut self, timer: TimerEvent) {
        log::trace!("t={} firing {:?}", self.scheduler.now(), timer);
        if self.game_state != GameState::Playing {
            return;
        }
        match timer {
            TimerEvent::MovePawn { steps } => self.move_player(steps),
            TimerEvent::Land => self.land(),
            TimerEvent::ResolveSpace => self.resolve_space(),
            TimerEvent::ChallengeTick { instance } => self.challenge_tick(instance),
            TimerEvent::EndTurn => self.begin_next_turn(),
        }
    }

    fn move_player(&mut self, steps: usize) {
        let last = self.board.last_index();
        let player = &mut self.players[self.current];
        let from = player.position;
        let to = player.advance(steps, last);
        let id = player.id;

        self.record(GameEvent::PlayerMoved { player: id, from, to });
        self.scheduler
            .schedule(self.config.timings.move_to_land_ms, TimerEvent::Land);
    }

    fn land(&mut self) {
        let player = &self.players[self.current];
        let (id, position) = (player.id, player.position);
        let space = self.board.space_at(position);
        let kind = space.kind;

        self.message = format!("Landed on: {}", space.title);
        self.turn = TurnState::Action;
        self.record(GameEvent::Landed {
            player: id,
            position,
            kind,
        });
        self.scheduler.schedule(
            self.config.timings.land_to_resolve_ms,
            TimerEvent::ResolveSpace,
        );
    }

    fn resolve_space(&mut self) {
        let player = self.current_id();
        let kind = self.board.space_at(self.players[self.current].position).kind;
        let scoring = self.config.scoring;

        log::debug!("{player} resolves {kind:?}");
        self.record(GameEvent::SpaceResolved { player, kind });

        match kind {
            SpaceKind::Challenge => self.present_challenge(),
            SpaceKind::Lucky => {
                self.award(scoring.lucky_bonus);
                self.message = format!("Lucky! +{} points!", scoring.lucky_bonus);
                self.end_turn();
            }
            SpaceKind::Unlucky => {
                self.set_back();
                self.message = format!("Unlucky! Go back {} spaces.", scoring.setback_spaces);
                self.end_turn();
            }
            SpaceKind::Finish => {
                self.award(scoring.finish_bonus);
                self.record(GameEvent::FinishReached { player });
                self.finish_game();
            }
            SpaceKind::Safe | SpaceKind::Start => self.end_turn(),
        }
    }

    fn present_challenge(&mut self) {
        let Some((index, challenge)) = self.bank.draw(&mut self.rng) else {
            log::warn!("challenge space reached with an empty bank");
            self.end_turn();
            return;
        };
        let challenge_id = challenge.id;

        let instance = self.next_instance;
        self.next_instance += 1;
        self.active = Some(ActiveChallenge {
            instance,
            index,
            time_left: self.config.challenge_ticks,
        });

        let player = self.current_id();
        self.record(GameEvent::ChallengePresented {
            player,
            challenge: challenge_id,
        });
        self.scheduler.schedule(
            self.config.timings.challenge_tick_ms,
            TimerEvent::ChallengeTick { instance },
        );
    }

    fn challenge_tick(&mut self, instance: u64) {
        let Some(active) = self.active.as_mut().filter(|a| a.instance == instance) else {
            log::trace!("stale tick for challenge {instance}");
            return;
        };
        active.time_left = active.time_left.saturating_sub(1);
        let remaining = active.time_left;

        self.record(GameEvent::ChallengeTick { remaining });
        if remaining == 0 {
            self.challenge_timeout(instance);
        } else {
            self.scheduler.schedule(
                self.config.timings.challenge_tick_ms,
                TimerEvent::ChallengeTick { instance },
            );
        }
    }

    /// Expire challenge `instance`. Does nothing unless it is still open, so
    /// it can fire at most once per challenge.
    fn challenge_timeout(&mut self, instance: u64) -> bool {
        if !self.active.as_ref().is_some_and(|a| a.instance == instance) {
            return false;
        }
        self.resolve_challenge(AnswerOutcome::TimedOut);
        true
    }

    fn answer(&mut self, value: Option<f64>) -> Option<AnswerOutcome> {
        if self.game_state != GameState::Playing {
            return None;
        }
        let Some(active) = self.active.as_ref() else {
            log::trace!("answer ignored: no open challenge");
            return None;
        };
        let challenge = self.bank.at(active.index)?;

        let outcome = if value.is_some_and(|v| challenge.is_solved_by(v)) {
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect
        };
        self.resolve_challenge(outcome);
        Some(outcome)
    }

    fn resolve_challenge(&mut self, outcome: AnswerOutcome) {
        let Some(active) = self.active.take() else {
            return;
        };
        let instance = active.instance;
        self.scheduler.cancel_where(
            |t| matches!(t, TimerEvent::ChallengeTick { instance: i } if *i == instance),
        );

        let player = self.current_id();
        let scoring = self.config.scoring;
        log::debug!("{player} challenge {outcome:?}");
        self.record(GameEvent::ChallengeResolved { player, outcome });

        match outcome {
            AnswerOutcome::Correct => {
                self.award(scoring.correct_answer);
                self.message = format!("Correct! +{} points.", scoring.correct_answer);
            }
            AnswerOutcome::Incorrect => {
                self.set_back();
                self.message = format!("Incorrect! Go back {} spaces.", scoring.setback_spaces);
            }
            AnswerOutcome::TimedOut => {
                self.set_back();
                self.message = format!("Time's up! Go back {} spaces.", scoring.setback_spaces);
            }
        }
        self.end_turn();
    }

    fn award(&mut self, points: u32) {
        let player = &mut self.players[self.current];
        player.award(points);
        let (id, total) = (player.id, player.score);
        self.record(GameEvent::ScoreAwarded {
            player: id,
            points,
            total,
        });
    }

    fn set_back(&mut self) {
        let player = &mut self.players[self.current];
        let from = player.position;
        let to = player.retreat(self.config.scoring.setback_spaces);
        let id = player.id;
        self.record(GameEvent::SetBack { player: id, from, to });
    }

    fn end_turn(&mut self) {
        let last = self.board.last_index();
        if self.players.iter().any(|p| p.position == last) {
            self.finish_game();
            return;
        }
        self.scheduler
            .schedule(self.config.timings.end_turn_ms, TimerEvent::EndTurn);
    }

    fn begin_next_turn(&mut self) {
        self.dice = None;
        self.message.clear();
        self.current = (self.current + 1) % self.players.len();
        self.turn = TurnState::RollDice;
        self.turn_number += 1;

        let player = self.current_id();
        log::debug!("turn {} goes to {player}", self.turn_number);
        self.record(GameEvent::TurnStarted { player });
    }

    fn finish_game(&mut self) {
        self.scheduler.clear();
        self.active = None;

        let Some(seat) = leader_index(&self.players) else {
            return;
        };
        let winner = &self.players[seat];
        let id = winner.id;
        self.message = format!("{} wins!", winner.name);
        log::info!("game over: {} wins with {} points", winner.name, winner.score);

        self.winner = Some(id);
        self.game_state = GameState::GameOver;
        self.record(GameEvent::GameOver { winner: id });
    }

    fn current_id(&self) -> PlayerId {
        self.players
            .get(self.current)
            .map_or(PlayerId::new(0), |p| p.id)
    }

    fn record(&mut self, event: GameEvent) {
        self.history.push_back(EventRecord {
            at_ms: self.scheduler.now(),
            turn: self.turn_number,
            event,
        });
    }
}
