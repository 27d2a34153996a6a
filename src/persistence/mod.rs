//! Settings and best-score storage
//!
//! Features:
//! - JSON document holding settings and best scores
//! - Atomic writes (tmp file, then rename over the save)
//! - Unreadable data falls back to defaults with a warning

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::highscores::BestScores;
use crate::settings::Settings;

/// Storage failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),
    #[error("storage format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Everything that survives between sessions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    pub settings: Settings,
    pub best_scores: BestScores,
}

/// Backend that reads and writes `SaveData`
pub trait Storage {
    /// Load stored data. A missing store is not an error and yields defaults.
    fn load(&self) -> Result<SaveData, StorageError>;
    fn save(&mut self, data: &SaveData) -> Result<(), StorageError>;
}

/// Load from storage, falling back to defaults on any failure
pub fn load_or_default(storage: &dyn Storage) -> SaveData {
    match storage.load() {
        Ok(data) => data,
        Err(err) => {
            log::warn!("Could not load save data ({err}), using defaults");
            SaveData::default()
        }
    }
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<SaveData, StorageError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("No save file at {}, starting fresh", self.path.display());
                return Ok(SaveData::default());
            }
            Err(err) => return Err(err.into()),
        };
        let data = serde_json::from_str(&json)?;
        log::info!("Loaded save data from {}", self.path.display());
        Ok(data)
    }

    fn save(&mut self, data: &SaveData) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(data)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::info!("Save data written to {}", self.path.display());
        Ok(())
    }
}

/// In-memory store, counts writes
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    pub data: Option<SaveData>,
    pub writes: usize,
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<SaveData, StorageError> {
        Ok(self.data.clone().unwrap_or_default())
    }

    fn save(&mut self, data: &SaveData) -> Result<(), StorageError> {
        self.data = Some(data.clone());
        self.writes += 1;
        Ok(())
    }
}
