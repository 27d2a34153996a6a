//! Difficulty levels and their physics parameters

use serde::{Deserialize, Serialize};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    VeryEasy,
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Physics parameters for one difficulty level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Vertical acceleration (always negative, pulls toward the ground)
    pub gravity: f32,
    /// Vertical opening between the lower and upper half of an obstacle
    pub gap_width: f32,
    /// Upward velocity a flap sets (overwrites, never adds)
    pub flap_impulse: f32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::VeryEasy,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "Very Easy",
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "veryeasy" => Some(Difficulty::VeryEasy),
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::VeryEasy => DifficultyProfile {
                gravity: -5.0,
                gap_width: 6.0,
                flap_impulse: 4.0,
            },
            Difficulty::Easy => DifficultyProfile {
                gravity: -7.0,
                gap_width: 4.5,
                flap_impulse: 6.0,
            },
            Difficulty::Medium => DifficultyProfile {
                gravity: -9.81,
                gap_width: 3.0,
                flap_impulse: 8.0,
            },
            Difficulty::Hard => DifficultyProfile {
                gravity: -9.81,
                gap_width: 2.5,
                flap_impulse: 9.0,
            },
        }
    }
}
