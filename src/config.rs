//! World geometry and gesture tuning
//!
//! Defaults come from `consts`; hosts may load overrides from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected configuration values
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("ring needs at least 4 slots, got {0}")]
    TooFewSlots(usize),
    #[error("first slot {first} is outside a ring of {slots}")]
    FirstSlotOutOfRange { first: usize, slots: usize },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("obstacle radius {obstacle} does not fit between slots of a ring of {slots}")]
    ObstacleTooWide { obstacle: f32, slots: usize },
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

/// Geometry of the ring world and player motion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub world_radius: f32,
    /// Half the angular footprint of an obstacle, measured along the surface
    pub obstacle_radius: f32,
    pub num_slots: usize,
    /// Slot directly in front of the player after a respawn
    pub first_slot: usize,
    pub obstacle_min_height: f32,
    pub obstacle_height_range: f32,
    pub angular_velocity: f32,
    pub ground_death_height: f32,
    pub initial_height: f32,
    pub surprise_interval: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_radius: WORLD_RADIUS,
            obstacle_radius: OBSTACLE_RADIUS,
            num_slots: NUM_SLOTS,
            first_slot: FIRST_SLOT,
            obstacle_min_height: OBSTACLE_MIN_HEIGHT,
            obstacle_height_range: OBSTACLE_HEIGHT_RANGE,
            angular_velocity: FORWARD_ANGULAR_VELOCITY,
            ground_death_height: GROUND_DEATH_HEIGHT,
            initial_height: PLAYER_INITIAL_HEIGHT,
            surprise_interval: SURPRISE_INTERVAL,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // The slot three ahead is re-randomized on exit, it must never be the active one
        if self.num_slots < 4 {
            return Err(ConfigError::TooFewSlots(self.num_slots));
        }
        if self.first_slot >= self.num_slots {
            return Err(ConfigError::FirstSlotOutOfRange {
                first: self.first_slot,
                slots: self.num_slots,
            });
        }
        positive("world_radius", self.world_radius as f64)?;
        positive("obstacle_radius", self.obstacle_radius as f64)?;
        positive("obstacle_height_range", self.obstacle_height_range as f64)?;
        positive("angular_velocity", self.angular_velocity as f64)?;
        positive("surprise_interval", self.surprise_interval as f64)?;
        // Entry edge must stay ahead of the spawn angle (half a slot before the first slot)
        if self.half_width() * 2.0 >= self.slot_spacing() / 2.0 {
            return Err(ConfigError::ObstacleTooWide {
                obstacle: self.obstacle_radius,
                slots: self.num_slots,
            });
        }
        Ok(())
    }

    /// Angle between neighbouring slots
    pub fn slot_spacing(&self) -> f32 {
        std::f32::consts::TAU / self.num_slots as f32
    }

    /// Angular half-width of an obstacle
    pub fn half_width(&self) -> f32 {
        self.obstacle_radius / self.world_radius
    }

    /// Angle of the player after a respawn, half a slot before `first_slot`
    pub fn spawn_angle(&self) -> f32 {
        crate::wrap_angle((self.first_slot as f32 - 0.5) * self.slot_spacing())
    }
}

/// Flap gesture thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Height changes smaller than this are sensor jitter
    pub deadzone: f32,
    /// Seconds a gesture may take from its peak to completion
    pub max_gesture_time: f64,
    /// Drop from the peak needed to complete a gesture
    pub min_drop_height: f32,
    /// Refractory period shared by both hands
    pub min_time_between_flaps: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            deadzone: GESTURE_DEADZONE,
            max_gesture_time: GESTURE_MAX_TIME,
            min_drop_height: GESTURE_MIN_DROP,
            min_time_between_flaps: GESTURE_MIN_TIME_BETWEEN,
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("deadzone", self.deadzone as f64)?;
        positive("max_gesture_time", self.max_gesture_time)?;
        positive("min_drop_height", self.min_drop_height as f64)?;
        if !(self.min_time_between_flaps >= 0.0) {
            return Err(ConfigError::NotPositive {
                name: "min_time_between_flaps",
                value: self.min_time_between_flaps,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert_eq!(WorldConfig::default().validate(), Ok(()));
        assert_eq!(GestureConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_small_ring_rejected() {
        let config = WorldConfig {
            num_slots: 3,
            first_slot: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TooFewSlots(3)));
    }

    #[test]
    fn test_wide_obstacles_rejected() {
        let config = WorldConfig {
            obstacle_radius: 6.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ObstacleTooWide { .. })
        ));
    }

    #[test]
    fn test_spawn_angle_half_slot_before_first() {
        let config = WorldConfig::default();
        let first = config.first_slot as f32 * config.slot_spacing();
        let gap = crate::angle_delta(config.spawn_angle(), first);
        assert!((gap - config.slot_spacing() / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: WorldConfig = serde_json::from_str(r#"{"num_slots": 8}"#).unwrap();
        assert_eq!(config.num_slots, 8);
        assert_eq!(config.world_radius, WORLD_RADIUS);
    }
}
