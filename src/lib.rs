//! Orbit Flap - an endless runner around a ring world
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (kinematics, obstacle ring, collisions, gestures)
//! - `difficulty`: Difficulty levels and their physics parameters
//! - `config`: World geometry and gesture tuning
//! - `platform`: Sensor sample queue and fixed-step clock
//! - `scene`: Transforms handed to the rendering side
//! - `audio`: Sound event routing and music selection
//! - `persistence`: Settings and best scores on disk

pub mod audio;
pub mod config;
pub mod difficulty;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod scene;
pub mod settings;
pub mod sim;

pub use config::{ConfigError, GestureConfig, WorldConfig};
pub use difficulty::{Difficulty, DifficultyProfile};
pub use highscores::BestScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (90 Hz, the headset refresh rate)
    pub const SIM_DT: f32 = 1.0 / 90.0;
    /// Largest timestep a single tick will integrate (stalled clock guard)
    pub const MAX_DT: f32 = 0.1;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World geometry
    pub const WORLD_RADIUS: f32 = 20.0;
    pub const OBSTACLE_RADIUS: f32 = 1.5 / 2.0;
    pub const NUM_SLOTS: usize = 6;
    /// Slot the player faces after a respawn
    pub const FIRST_SLOT: usize = 2;
    pub const OBSTACLE_MIN_HEIGHT: f32 = 1.0;
    pub const OBSTACLE_HEIGHT_RANGE: f32 = 12.0;

    /// Player motion
    pub const FORWARD_ANGULAR_VELOCITY: f32 = 0.2; // radians per second
    pub const GROUND_DEATH_HEIGHT: f32 = 0.5;
    pub const PLAYER_INITIAL_HEIGHT: f32 = 3.0;
    /// Headset height above the real floor until a reading arrives
    pub const DEFAULT_HEAD_OFFSET: f32 = 1.6;

    /// Every multiple of this score plays a surprise track
    pub const SURPRISE_INTERVAL: u32 = 15;

    /// Flap gesture tuning
    pub const GESTURE_DEADZONE: f32 = 0.005;
    pub const GESTURE_MAX_TIME: f64 = 1.0;
    pub const GESTURE_MIN_DROP: f32 = 0.10;
    pub const GESTURE_MIN_TIME_BETWEEN: f64 = 0.4;
}

/// Wrap an angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Signed angular distance from `from` to `to`, in [-π, π)
#[inline]
pub fn angle_delta(from: f32, to: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (to - from + PI).rem_euclid(TAU) - PI
}
