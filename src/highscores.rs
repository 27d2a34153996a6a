//! Best score per difficulty
//!
//! Only the round-over transition writes here.

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;

/// All-time best score for each difficulty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BestScores {
    pub very_easy: u32,
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
}

impl BestScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best score for a difficulty
    pub fn get(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::VeryEasy => self.very_easy,
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    fn slot_mut(&mut self, difficulty: Difficulty) -> &mut u32 {
        match difficulty {
            Difficulty::VeryEasy => &mut self.very_easy,
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    /// Check if a score beats the stored best
    pub fn qualifies(&self, difficulty: Difficulty, score: u32) -> bool {
        score > self.get(difficulty)
    }

    /// Record a finished round. Returns true if it set a new best.
    pub fn record(&mut self, difficulty: Difficulty, score: u32) -> bool {
        if !self.qualifies(difficulty, score) {
            return false;
        }
        *self.slot_mut(difficulty) = score;
        true
    }
}
