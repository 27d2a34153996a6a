//! Audio routing
//!
//! Turns simulation sound events into concrete playback on a backend: one-shot
//! effects plus a single music channel that carries the background tracks and
//! the occasional surprise track.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::events::SoundEvent;

/// Number of background tracks to pick from
pub const NUM_TRACKS: u8 = 9;
/// Number of surprise tracks to pick from
pub const NUM_SURPRISES: u8 = 4;

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Flap,
    Score,
    /// Death
    Thud,
    HighScore,
}

impl SoundEffect {
    /// Mix volume relative to the master volume
    pub fn volume(self) -> f32 {
        match self {
            SoundEffect::Flap => 1.5,
            SoundEffect::Score => 2.0,
            SoundEffect::Thud => 1.5,
            SoundEffect::HighScore => 1.1,
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            SoundEffect::Flap => "flap",
            SoundEffect::Score => "score",
            SoundEffect::Thud => "thud",
            SoundEffect::HighScore => "highscore",
        }
    }
}

/// What the music channel is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Background(u8),
    Surprise(u8),
}

impl MusicTrack {
    pub fn file_name(self) -> String {
        match self {
            MusicTrack::Background(n) => format!("track{n}"),
            MusicTrack::Surprise(n) => format!("surprise{n}"),
        }
    }
}

/// Whatever actually makes noise
pub trait AudioBackend {
    fn play_effect(&mut self, effect: SoundEffect, volume: f32);
    /// Replace whatever the music channel is playing
    fn play_music(&mut self, track: MusicTrack, volume: f32);
    fn stop_music(&mut self);
}

/// Backend that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play_effect(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("[audio] {} at {volume:.2}", effect.file_name());
    }

    fn play_music(&mut self, track: MusicTrack, volume: f32) {
        log::info!("[audio] music {} at {volume:.2}", track.file_name());
    }

    fn stop_music(&mut self) {
        log::info!("[audio] music stopped");
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    rng: Pcg32,
    master_volume: f32,
    muted: bool,
    music: Option<MusicTrack>,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B, seed: u64) -> Self {
        Self {
            backend,
            rng: Pcg32::seed_from_u64(seed),
            master_volume: 0.8,
            muted: false,
            music: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute sound effects
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Track currently on the music channel
    pub fn music(&self) -> Option<MusicTrack> {
        self.music
    }

    /// Route one simulation sound event
    pub fn handle(&mut self, event: SoundEvent) {
        match event {
            SoundEvent::Flap => self.play(SoundEffect::Flap),
            SoundEvent::Score => self.play(SoundEffect::Score),
            SoundEvent::Death => self.play(SoundEffect::Thud),
            SoundEvent::HighScore => self.play(SoundEffect::HighScore),
            SoundEvent::Surprise => {
                let track = MusicTrack::Surprise(self.rng.random_range(1..=NUM_SURPRISES));
                self.start(track);
            }
            SoundEvent::BackgroundStart => self.play_background(),
            SoundEvent::BackgroundStop => self.stop(),
        }
    }

    /// The backend finished the music track; queue another background track
    pub fn track_finished(&mut self) {
        if self.music.is_some() {
            self.play_background();
        }
    }

    fn play(&mut self, effect: SoundEffect) {
        if self.muted || self.master_volume <= 0.0 {
            return;
        }
        self.backend
            .play_effect(effect, effect.volume() * self.master_volume);
    }

    fn play_background(&mut self) {
        let track = MusicTrack::Background(self.rng.random_range(1..=NUM_TRACKS));
        self.start(track);
    }

    fn start(&mut self, track: MusicTrack) {
        self.music = Some(track);
        self.backend.play_music(track, self.master_volume);
    }

    fn stop(&mut self) {
        if self.music.take().is_some() {
            self.backend.stop_music();
        }
    }
}
