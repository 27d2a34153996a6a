//! Game state and core simulation types
//!
//! Everything here is owned by the simulation thread and mutated only inside a tick.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::CollisionCursor;
use super::events::GameEvent;
use super::kinematics::WorldState;
use super::ring::ObstacleRing;
use crate::config::{ConfigError, WorldConfig};
use crate::consts::DEFAULT_HEAD_OFFSET;
use crate::difficulty::{Difficulty, DifficultyProfile};
use crate::highscores::BestScores;
use crate::persistence::SaveData;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Respawned, waiting for the first flap
    Idle,
    /// Active gameplay
    Playing,
    /// Player died, waiting for a flap to respawn
    RoundOver,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: WorldConfig,
    pub phase: GamePhase,
    pub world: WorldState,
    pub ring: ObstacleRing,
    pub cursor: CollisionCursor,
    /// Obstacles passed this round
    pub score: u32,
    pub best_scores: BestScores,
    pub settings: Settings,
    /// Headset height above the real floor, added to the player height in every check
    pub head_offset: f32,
    /// Host is presenting the game world (music plays only here)
    pub in_session: bool,
    /// Hand tracking authorization was denied; gameplay is suspended
    pub sensor_denied: bool,
    /// Seconds of simulated time, drives the idle hover
    pub time: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session with a freshly randomized ring and the player at the spawn pose.
    /// Fails if the world configuration is unusable (too few slots, bad radii).
    pub fn new(config: WorldConfig, save: SaveData, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut state = Self {
            world: WorldState::new(config.spawn_angle(), config.initial_height),
            ring: ObstacleRing::new(&config),
            cursor: CollisionCursor::new(config.first_slot),
            config,
            phase: GamePhase::Idle,
            score: 0,
            best_scores: save.best_scores,
            settings: save.settings,
            head_offset: DEFAULT_HEAD_OFFSET,
            in_session: false,
            sensor_denied: false,
            time: 0.0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };
        state.reset_ring();
        state.emit_world();
        Ok(state)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.settings.difficulty
    }

    pub fn profile(&self) -> DifficultyProfile {
        self.settings.difficulty.profile()
    }

    /// Best score for the current difficulty
    pub fn best(&self) -> u32 {
        self.best_scores.get(self.settings.difficulty)
    }

    pub fn game_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn round_over(&self) -> bool {
        self.phase == GamePhase::RoundOver
    }

    /// Player's head altitude over the world surface
    pub fn head_height(&self) -> f32 {
        self.world.height + self.head_offset
    }

    /// Snapshot for the persistence side
    pub fn save_data(&self) -> SaveData {
        SaveData {
            settings: self.settings.clone(),
            best_scores: self.best_scores.clone(),
        }
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn emit_world(&mut self) {
        self.emit(GameEvent::WorldMoved {
            angle: self.world.angle,
            height: self.world.height,
        });
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Randomize every slot, halving the draw for the obstacle in front of the spawn
    pub fn reset_ring(&mut self) {
        let gap = self.profile().gap_width;
        let placements = self
            .ring
            .randomize_all(gap, self.config.first_slot, &mut self.rng);
        for placement in placements {
            self.emit(GameEvent::ObstacleMoved(placement));
        }
    }

    /// Put the player back at the spawn pose with a fresh cursor
    pub fn reset_pose(&mut self) {
        self.world = WorldState::new(self.config.spawn_angle(), self.config.initial_height);
        self.cursor = CollisionCursor::new(self.config.first_slot);
        self.emit_world();
    }
}
