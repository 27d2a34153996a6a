//! Edge-triggered obstacle checks
//!
//! Instead of testing the player against an obstacle over its whole angular
//! extent, each obstacle is checked at exactly two angles: the entry edge
//! (`θ - w`) and the exit edge (`θ + w`). The cursor walks the ring one
//! obstacle at a time and never considers both edges passed at once.

use crate::angle_delta;
use crate::config::WorldConfig;

/// Which edge of the current obstacle is armed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePhase {
    AwaitingEntry,
    AwaitingExit,
}

/// An edge the player just crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeCrossing {
    Entry {
        slot: usize,
    },
    /// Leaving an obstacle; `refresh_slot` is the slot three ahead, now safe to move
    Exit {
        slot: usize,
        refresh_slot: usize,
    },
}

impl EdgeCrossing {
    pub fn slot(&self) -> usize {
        match *self {
            EdgeCrossing::Entry { slot } | EdgeCrossing::Exit { slot, .. } => slot,
        }
    }
}

/// Position of the player along the obstacle sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionCursor {
    /// Obstacles met so far, offset by the first slot. Never decreases.
    pub next_pipe_index: u64,
    pub phase: EdgePhase,
}

/// How far ahead of the current obstacle the exit edge re-randomizes
pub const REFRESH_AHEAD: u64 = 3;

impl CollisionCursor {
    pub fn new(first_slot: usize) -> Self {
        Self {
            next_pipe_index: first_slot as u64,
            phase: EdgePhase::AwaitingEntry,
        }
    }

    pub fn passed_first_edge(&self) -> bool {
        self.phase == EdgePhase::AwaitingExit
    }

    /// Ring slot of the obstacle the cursor points at
    pub fn slot(&self, num_slots: usize) -> usize {
        (self.next_pipe_index % num_slots as u64) as usize
    }

    /// Angle of the armed edge
    pub fn active_threshold(&self, config: &WorldConfig) -> f32 {
        let centre = self.slot(config.num_slots) as f32 * config.slot_spacing();
        match self.phase {
            EdgePhase::AwaitingEntry => centre - config.half_width(),
            EdgePhase::AwaitingExit => centre + config.half_width(),
        }
    }

    /// Whether `angle` is past the armed edge. Uses the signed wrapped distance,
    /// so the same two offsets recur every lap.
    pub fn crossed(&self, angle: f32, config: &WorldConfig) -> bool {
        angle_delta(self.active_threshold(config), angle) > 0.0
    }

    /// Transition if the armed edge has been crossed
    pub fn poll(&mut self, angle: f32, config: &WorldConfig) -> Option<EdgeCrossing> {
        if !self.crossed(angle, config) {
            return None;
        }
        let num_slots = config.num_slots;
        let slot = self.slot(num_slots);
        match self.phase {
            EdgePhase::AwaitingEntry => {
                self.phase = EdgePhase::AwaitingExit;
                Some(EdgeCrossing::Entry { slot })
            }
            EdgePhase::AwaitingExit => {
                let refresh_slot =
                    ((self.next_pipe_index + REFRESH_AHEAD) % num_slots as u64) as usize;
                self.phase = EdgePhase::AwaitingEntry;
                self.next_pipe_index += 1;
                Some(EdgeCrossing::Exit { slot, refresh_slot })
            }
        }
    }
}
