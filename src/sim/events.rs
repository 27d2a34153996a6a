//! Events raised by the simulation for the host's collaborators

use super::ring::ObstaclePlacement;
use crate::difficulty::Difficulty;

/// Named audio cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEvent {
    Flap,
    Score,
    Death,
    HighScore,
    Surprise,
    BackgroundStart,
    BackgroundStop,
}

/// Everything the simulation tells the outside world
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundEvent),
    /// Player pose changed; the world transform needs recomputing
    WorldMoved { angle: f32, height: f32 },
    /// An obstacle got a new gap height
    ObstacleMoved(ObstaclePlacement),
    RoundStarted { difficulty: Difficulty },
    Scored { score: u32 },
    /// Terminal transition of a round; best scores should be persisted
    RoundOver {
        difficulty: Difficulty,
        score: u32,
        best: u32,
        new_high_score: bool,
    },
    Respawned,
    /// The round was abandoned without a result (sensor loss, session exit)
    Interrupted,
    /// Settings changed and should be persisted
    SettingsChanged,
    SensorStatus { denied: bool },
}
