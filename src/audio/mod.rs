//! Sound cues.
//!
//! `SoundBoard` is an explicitly constructed service: it owns the sound and
//! music switches and forwards cues to whatever `AudioBackend` it was given.
//! Playback is fire-and-forget. A backend failure (blocked autoplay, missing
//! device) is logged and dropped; it never reaches game state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::SpaceKind;
use crate::engine::{AnswerOutcome, EventRecord, GameEvent};

/// Background music asset.
pub const MUSIC_ASSET: &str = "sounds/background-music.mp3";

/// Background music volume.
pub const MUSIC_VOLUME: f32 = 0.2;

/// A short sound effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Button press.
    Click,
    /// Die thrown.
    DiceRoll,
    /// Right answer.
    Correct,
    /// Wrong answer or timeout.
    Wrong,
    /// Lucky space.
    Lucky,
    /// Unlucky space.
    Unlucky,
}

impl Cue {
    /// Asset path, relative to the sounds root.
    #[must_use]
    pub const fn asset(self) -> &'static str {
        match self {
            Cue::Click => "sounds/click.mp3",
            Cue::DiceRoll => "sounds/dice-roll.mp3",
            Cue::Correct => "sounds/correct.mp3",
            Cue::Wrong => "sounds/wrong.mp3",
            Cue::Lucky => "sounds/lucky.mp3",
            Cue::Unlucky => "sounds/unlucky.mp3",
        }
    }

    /// Playback volume in `0.0..=1.0`.
    #[must_use]
    pub const fn volume(self) -> f32 {
        match self {
            Cue::Click => 0.5,
            Cue::Lucky | Cue::Unlucky => 0.6,
            Cue::DiceRoll | Cue::Correct | Cue::Wrong => 0.7,
        }
    }

    /// The cue a transition should sound, if any.
    #[must_use]
    pub fn for_event(event: &GameEvent) -> Option<Cue> {
        match event {
            GameEvent::SetupOpened
            | GameEvent::GameStarted { .. }
            | GameEvent::Restarted
            | GameEvent::ScoresSaved { .. }
            | GameEvent::LeaderboardShown
            | GameEvent::ReturnedHome => Some(Cue::Click),
            GameEvent::DiceRolled { .. } => Some(Cue::DiceRoll),
            GameEvent::ChallengeResolved { outcome, .. } => Some(match outcome {
                AnswerOutcome::Correct => Cue::Correct,
                AnswerOutcome::Incorrect | AnswerOutcome::TimedOut => Cue::Wrong,
            }),
            GameEvent::SpaceResolved { kind, .. } => match kind {
                SpaceKind::Lucky => Some(Cue::Lucky),
                SpaceKind::Unlucky => Some(Cue::Unlucky),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Playback failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// The platform refused to play (e.g. autoplay policy).
    #[error("playback blocked: {0}")]
    Blocked(String),

    /// No output device or asset.
    #[error("audio unavailable: {0}")]
    Unavailable(String),
}

/// Something that can actually make noise.
pub trait AudioBackend {
    /// Play a one-shot cue.
    fn play(&mut self, cue: Cue, volume: f32) -> Result<(), AudioError>;

    /// Start looping background music.
    fn start_music(&mut self, asset: &str, volume: f32) -> Result<(), AudioError>;

    /// Stop and rewind background music.
    fn stop_music(&mut self) -> Result<(), AudioError>;
}

/// Backend that plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn play(&mut self, _cue: Cue, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }

    fn start_music(&mut self, _asset: &str, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop_music(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Backend that remembers what it was asked to play.
///
/// Useful headless and in tests. Can be told to fail every call.
#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    /// Cues played, in order.
    pub played: Vec<Cue>,
    /// Whether music is currently looping.
    pub music_playing: bool,
    /// When set, every call fails with this error.
    pub fail_with: Option<AudioError>,
}

impl RecordingBackend {
    /// Create a backend that records successfully.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that rejects every call.
    #[must_use]
    pub fn failing(error: AudioError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), AudioError> {
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

impl AudioBackend for RecordingBackend {
    fn play(&mut self, cue: Cue, _volume: f32) -> Result<(), AudioError> {
        self.check()?;
        self.played.push(cue);
        Ok(())
    }

    fn start_music(&mut self, _asset: &str, _volume: f32) -> Result<(), AudioError> {
        self.check()?;
        self.music_playing = true;
        Ok(())
    }

    fn stop_music(&mut self) -> Result<(), AudioError> {
        self.check()?;
        self.music_playing = false;
        Ok(())
    }
}

/// Sound and music switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Play cues.
    pub sound_on: bool,
    /// Loop background music.
    pub music_on: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sound_on: true,
            music_on: true,
        }
    }
}

/// Cue dispatcher with its own settings.
#[derive(Clone, Debug)]
pub struct SoundBoard<B> {
    backend: B,
    settings: AudioSettings,
}

impl<B: AudioBackend> SoundBoard<B> {
    /// Create the service and apply the initial music setting.
    pub fn new(backend: B, settings: AudioSettings) -> Self {
        let mut board = Self { backend, settings };
        board.toggle_music(settings.music_on);
        board
    }

    /// Current switches.
    #[must_use]
    pub fn settings(&self) -> AudioSettings {
        self.settings
    }

    /// Play a cue unless sound is off.
    pub fn play(&mut self, cue: Cue) {
        if !self.settings.sound_on {
            return;
        }
        if let Err(e) = self.backend.play(cue, cue.volume()) {
            log::debug!("cue {cue:?} not played: {e}");
        }
    }

    /// Sound the cue for one transition, if it has one.
    pub fn on_event(&mut self, event: &GameEvent) {
        if let Some(cue) = Cue::for_event(event) {
            self.play(cue);
        }
    }

    /// Sound the cues for a batch of drained records, in order.
    pub fn on_records<'a>(&mut self, records: impl IntoIterator<Item = &'a EventRecord>) {
        for record in records {
            self.on_event(&record.event);
        }
    }

    /// Turn cues on or off.
    pub fn toggle_sound(&mut self, on: bool) {
        self.settings.sound_on = on;
    }

    /// Turn music on or off, starting or stopping it.
    pub fn toggle_music(&mut self, on: bool) {
        self.settings.music_on = on;
        let result = if on {
            self.backend.start_music(MUSIC_ASSET, MUSIC_VOLUME)
        } else {
            self.backend.stop_music()
        };
        if let Err(e) = result {
            log::debug!("music toggle to {on} failed: {e}");
        }
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Take the backend back.
    pub fn into_backend(self) -> B {
        self.backend
    }
}
