//! Frame time to fixed simulation ticks

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::sim::kinematics::clamp_dt;

/// Accumulates variable frame time and hands out whole fixed steps
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step: f32,
    accumulator: f32,
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::new(SIM_DT)
    }
}

impl FixedStepClock {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add a frame's elapsed time and return how many ticks to run now.
    /// Never more than `MAX_SUBSTEPS`; time beyond that is dropped.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += clamp_dt(frame_dt);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < MAX_SUBSTEPS {
            self.accumulator -= self.step;
            substeps += 1;
        }
        if self.accumulator >= self.step {
            log::debug!(
                "Simulation behind, dropping {:.3}s",
                self.accumulator - self.accumulator % self.step
            );
            self.accumulator %= self.step;
        }
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = FixedStepClock::new(0.01);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 1);
        // 0.002 carried over
        assert_eq!(clock.advance(0.007), 0);
        assert_eq!(clock.advance(0.002), 1);
    }

    #[test]
    fn test_multiple_steps_per_frame() {
        let mut clock = FixedStepClock::new(0.01);
        assert_eq!(clock.advance(0.035), 3);
    }

    #[test]
    fn test_stall_is_capped() {
        let mut clock = FixedStepClock::default();
        assert_eq!(clock.advance(5.0), MAX_SUBSTEPS);
        // Nothing left over to burst through on the next frame
        assert!(clock.advance(0.0) <= 1);
    }

    #[test]
    fn test_bad_frame_time_ignored() {
        let mut clock = FixedStepClock::default();
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(0.0), 0);
    }
}
