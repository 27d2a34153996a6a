//! Player preferences
//!
//! Persisted alongside best scores by the `persistence` module.

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Selected difficulty
    pub difficulty: Difficulty,
    /// Background music while in session
    pub music_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            music_enabled: true,
        }
    }
}
