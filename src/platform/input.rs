//! Sample queue between the sensor side and the simulation tick
//!
//! Producers push events from any thread; the simulation drains the queue once
//! per tick, so gesture state is only ever touched on the simulation side.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::config::GestureConfig;
use crate::difficulty::Difficulty;
use crate::sim::gesture::{GestureRecognizer, Hand, HandSample};
use crate::sim::tick::TickInput;

/// Anything the outside world can tell the simulation
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Wrist height reading for one hand
    Hand(HandSample),
    /// Headset height above the real floor
    HeadHeight(f32),
    /// Hand tracking authorization granted or revoked
    Authorization(bool),
    /// Direct flap trigger (menu button, keyboard)
    Flap,
    Difficulty(Difficulty),
    Music(bool),
    /// Entering or leaving the game world
    Session(bool),
    Interrupt,
}

/// Producer handle, cheap to clone into sensor threads
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<InputEvent>,
}

impl InputSender {
    /// Queue an event. Returns false once the simulation side is gone.
    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn hand(&self, hand: Hand, height: f32, timestamp: f64) -> bool {
        self.send(InputEvent::Hand(HandSample {
            hand,
            height,
            timestamp,
        }))
    }
}

/// Consumer side, owned by the simulation loop
#[derive(Debug)]
pub struct InputQueue {
    rx: Receiver<InputEvent>,
    recognizer: GestureRecognizer,
}

/// Create a connected sender/queue pair
pub fn input_channel(gesture: GestureConfig) -> (InputSender, InputQueue) {
    let (tx, rx) = mpsc::channel();
    (
        InputSender { tx },
        InputQueue {
            rx,
            recognizer: GestureRecognizer::new(gesture),
        },
    )
}

impl InputQueue {
    pub fn recognizer(&self) -> &GestureRecognizer {
        &self.recognizer
    }

    /// Drain everything queued since the last tick into one tick's input.
    /// For repeated settings the last value wins.
    pub fn poll(&mut self) -> TickInput {
        let mut input = TickInput::default();
        while let Ok(event) = self.rx.try_recv() {
            match event {
                InputEvent::Hand(sample) => {
                    if self.recognizer.process(sample).is_flap() {
                        input.flap = true;
                    }
                }
                InputEvent::HeadHeight(height) => input.head_height = Some(height),
                InputEvent::Authorization(authorized) => {
                    if !authorized {
                        self.recognizer.reset();
                        cancel(&mut input);
                    }
                    input.sensor_authorized = Some(authorized);
                }
                InputEvent::Flap => input.flap = true,
                InputEvent::Difficulty(difficulty) => input.difficulty = Some(difficulty),
                InputEvent::Music(enabled) => input.music = Some(enabled),
                InputEvent::Session(active) => {
                    if !active {
                        cancel(&mut input);
                    }
                    input.session = Some(active);
                }
                InputEvent::Interrupt => cancel(&mut input),
            }
        }
        input
    }
}

/// A cancellation ends the round and drops any flap queued before it. The tick
/// applies the interrupt ahead of the flap, so only later flaps survive.
fn cancel(input: &mut TickInput) {
    input.interrupt = true;
    input.flap = false;
}
