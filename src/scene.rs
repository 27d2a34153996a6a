//! Transforms handed to the rendering side
//!
//! The player stays at the origin; the ring world is rotated about the X axis
//! and pushed down so the surface sits `height` below the player. Obstacles are
//! children of the world, placed radially at their slot angle.

use glam::{Mat4, Quat, Vec3};

use crate::config::WorldConfig;
use crate::sim::events::GameEvent;
use crate::sim::ring::ObstaclePlacement;

/// Rigid transform of a scene node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.translation)
    }
}

/// Point at `radius` from the world centre in the direction of `angle`
pub fn radial(angle: f32, radius: f32) -> Vec3 {
    Vec3::new(0.0, radius * angle.cos(), radius * angle.sin())
}

/// World root transform for a player pose
pub fn world_transform(angle: f32, height: f32, world_radius: f32) -> Transform {
    Transform {
        translation: Vec3::new(0.0, -(world_radius + height), 0.0),
        rotation: Quat::from_rotation_x(-angle),
    }
}

/// Both halves of one obstacle, in world-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObstacleTransforms {
    /// Anchored at the top of the lower half
    pub bottom: Transform,
    /// Anchored at the bottom of the upper half
    pub top: Transform,
}

impl From<&ObstaclePlacement> for ObstacleTransforms {
    fn from(p: &ObstaclePlacement) -> Self {
        let rotation = Quat::from_rotation_x(p.angle);
        Self {
            bottom: Transform {
                translation: radial(p.angle, p.bot_radius),
                rotation,
            },
            top: Transform {
                translation: radial(p.angle, p.top_radius),
                rotation,
            },
        }
    }
}

/// Slot-indexed table of render handles owned by the rendering side
#[derive(Debug, Clone)]
pub struct SceneTable<H> {
    world_radius: f32,
    world: Transform,
    slots: Vec<(H, ObstacleTransforms)>,
}

impl<H> SceneTable<H> {
    /// Create one handle per ring slot
    pub fn new(config: &WorldConfig, mut make_handle: impl FnMut(usize) -> H) -> Self {
        let slots = (0..config.num_slots)
            .map(|slot| (make_handle(slot), ObstacleTransforms::default()))
            .collect();
        Self {
            world_radius: config.world_radius,
            world: world_transform(config.spawn_angle(), config.initial_height, config.world_radius),
            slots,
        }
    }

    pub fn world(&self) -> &Transform {
        &self.world
    }

    pub fn obstacle(&self, slot: usize) -> Option<(&H, &ObstacleTransforms)> {
        self.slots.get(slot).map(|(h, t)| (h, t))
    }

    /// Apply a simulation event. Returns the handle that moved, if any.
    pub fn apply(&mut self, event: &GameEvent) -> Option<&H> {
        match event {
            GameEvent::WorldMoved { angle, height } => {
                self.world = world_transform(*angle, *height, self.world_radius);
                None
            }
            GameEvent::ObstacleMoved(placement) => {
                let Some(entry) = self.slots.get_mut(placement.slot) else {
                    log::warn!("Placement for unknown slot {}", placement.slot);
                    return None;
                };
                entry.1 = ObstacleTransforms::from(placement);
                Some(&entry.0)
            }
            _ => None,
        }
    }
}
