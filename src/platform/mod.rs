//! Platform abstraction layer
//!
//! Handles the boundary between the sensor side and the simulation:
//! - Input events (hand samples, headset height, authorization, menu actions)
//! - Frame time to fixed ticks

pub mod input;
pub mod time;

pub use input::{InputEvent, InputQueue, InputSender, input_channel};
pub use time::FixedStepClock;
