//! Flap gesture recognition from wrist height samples
//!
//! Each hand runs its own lane: a rise arms the lane at its peak, a drop of at
//! least `min_drop_height` within `max_gesture_time` completes the gesture.
//! Both lanes share one refractory timer so two hands moving together flap once.

use crate::config::GestureConfig;

/// Which hand a sample came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const BOTH: [Hand; 2] = [Hand::Left, Hand::Right];

    fn index(self) -> usize {
        match self {
            Hand::Left => 0,
            Hand::Right => 1,
        }
    }
}

/// One wrist height reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandSample {
    pub hand: Hand,
    pub height: f32,
    /// Seconds on the sensor clock
    pub timestamp: f64,
}

/// Direction of a sample relative to the lane's last recorded height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// What a sample did to its lane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Inside the deadzone, or a drop with nothing armed
    Ignored,
    /// Rising; lane armed at this sample
    Armed,
    /// Dropping, but not far enough yet
    Pending,
    /// Took longer than `max_gesture_time`
    Expired,
    /// Gesture completed inside the refractory window
    Suppressed,
    /// Gesture completed, emit a flap
    Flap,
}

impl GestureOutcome {
    pub fn is_flap(&self) -> bool {
        *self == GestureOutcome::Flap
    }
}

/// Per-hand gesture state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureLane {
    pub armed: bool,
    pub start_time: f64,
    pub start_height: f32,
    /// Last height that moved beyond the deadzone
    pub last_height: f32,
}

impl GestureLane {
    fn disarm(&mut self) {
        self.armed = false;
        self.start_time = 0.0;
        self.start_height = 0.0;
    }
}

/// Two-lane flap recognizer
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    config: GestureConfig,
    lanes: [GestureLane; 2],
    /// Time of the last emitted flap, shared by both hands
    last_flap_time: Option<f64>,
}

impl GestureRecognizer {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            lanes: [GestureLane::default(); 2],
            last_flap_time: None,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn lane(&self, hand: Hand) -> &GestureLane {
        &self.lanes[hand.index()]
    }

    /// Forget all lane state and the refractory timer
    pub fn reset(&mut self) {
        self.lanes = [GestureLane::default(); 2];
        self.last_flap_time = None;
    }

    /// Feed one sample
    pub fn process(&mut self, sample: HandSample) -> GestureOutcome {
        let config = &self.config;
        let lane = &mut self.lanes[sample.hand.index()];
        let Some(direction) = classify(lane.last_height, sample.height, config.deadzone) else {
            return GestureOutcome::Ignored;
        };
        lane.last_height = sample.height;

        match direction {
            // Still rising while armed moves the latch up to the new peak
            Direction::Up => {
                lane.armed = true;
                lane.start_time = sample.timestamp;
                lane.start_height = sample.height;
                return GestureOutcome::Armed;
            }
            Direction::Down if !lane.armed => return GestureOutcome::Ignored,
            Direction::Down => {
                if sample.timestamp - lane.start_time > config.max_gesture_time {
                    lane.disarm();
                    return GestureOutcome::Expired;
                }
                if lane.start_height - sample.height <= config.min_drop_height {
                    return GestureOutcome::Pending;
                }
                lane.disarm();
            }
        }

        let min_gap = config.min_time_between_flaps;
        let ready = self
            .last_flap_time
            .is_none_or(|last| sample.timestamp - last > min_gap);
        if !ready {
            log::debug!("Flap gesture suppressed ({:?} hand, refractory)", sample.hand);
            return GestureOutcome::Suppressed;
        }
        self.last_flap_time = Some(sample.timestamp);
        log::debug!("Flap gesture completed ({:?} hand)", sample.hand);
        GestureOutcome::Flap
    }
}

/// Classify a height against the lane's last recorded height
fn classify(last_height: f32, height: f32, deadzone: f32) -> Option<Direction> {
    if height - last_height > deadzone {
        Some(Direction::Up)
    } else if last_height - height > deadzone {
        Some(Direction::Down)
    } else {
        None
    }
}
