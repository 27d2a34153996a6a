//! Player vertical motion and world rotation

use crate::consts::MAX_DT;
use crate::wrap_angle;

/// Pose of the player relative to the ring world
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldState {
    /// World rotation (radians, wrapped to [0, 2π))
    pub angle: f32,
    /// Altitude above the world surface
    pub height: f32,
    /// Vertical velocity (positive = up)
    pub vertical_velocity: f32,
}

/// Clamp a frame timestep to [0, MAX_DT]. Non-finite input integrates nothing.
pub fn clamp_dt(dt: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        0.0
    } else {
        dt.min(MAX_DT)
    }
}

impl WorldState {
    pub fn new(angle: f32, height: f32) -> Self {
        Self {
            angle: wrap_angle(angle),
            height,
            vertical_velocity: 0.0,
        }
    }

    /// Advance by one timestep. Returns the timestep actually used.
    pub fn integrate(&mut self, dt: f32, gravity: f32, angular_velocity: f32) -> f32 {
        let clamped = clamp_dt(dt);
        if clamped != dt {
            log::warn!("Timestep {dt} clamped to {clamped}");
        }
        self.vertical_velocity += gravity * clamped;
        self.height += self.vertical_velocity * clamped;
        self.angle = wrap_angle(self.angle + angular_velocity * clamped);
        clamped
    }

    /// A flap replaces the current vertical velocity
    pub fn apply_flap(&mut self, impulse: f32) {
        self.vertical_velocity = impulse;
    }

    /// Stop vertical motion (on death)
    pub fn halt(&mut self) {
        self.vertical_velocity = 0.0;
    }
}
