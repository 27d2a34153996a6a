//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Obstacles checked in angular order, one edge at a time
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod events;
pub mod gesture;
pub mod kinematics;
pub mod ring;
pub mod state;
pub mod tick;

pub use collision::{CollisionCursor, EdgeCrossing, EdgePhase};
pub use events::{GameEvent, SoundEvent};
pub use gesture::{GestureOutcome, GestureRecognizer, Hand, HandSample};
pub use kinematics::WorldState;
pub use ring::{Obstacle, ObstaclePlacement, ObstacleRing};
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, tick};
