//! Native high score file
//!
//! One JSON record per variant. The record is written to a temp file first and
//! renamed over the old one so a crash mid-write never truncates it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::HighScoreStore;
use crate::error::PersistenceError;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u64,
    /// Unix timestamp (s) of the last save
    #[serde(default)]
    saved_at: u64,
}

/// High score stored as JSON at `path`
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<HighScoreRecord, PersistenceError> {
        let json = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl HighScoreStore for FileStore {
    fn load_high_score(&mut self) -> u64 {
        if !self.path.exists() {
            log::info!("No high score file at {}, starting fresh", self.path.display());
            return 0;
        }
        match self.read() {
            Ok(record) => {
                log::info!("Loaded high score {} from {}", record.high_score, self.path.display());
                record.high_score
            }
            Err(e) => {
                log::warn!("Unreadable high score file {}: {}", self.path.display(), e);
                0
            }
        }
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), PersistenceError> {
        let saved_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let json = serde_json::to_string_pretty(&HighScoreRecord {
            high_score: score,
            saved_at,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::info!("High score {} saved to {}", score, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("crazy_roll_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_loads_zero() {
        let mut store = FileStore::new(temp_path("missing"));
        assert_eq!(store.load_high_score(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let mut store = FileStore::new(&path);
        store.save_high_score(250).unwrap();

        let mut reopened = FileStore::new(&path);
        assert_eq!(reopened.load_high_score(), 250);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_loads_zero() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ not json").unwrap();
        let mut store = FileStore::new(&path);
        assert_eq!(store.load_high_score(), 0);
        let _ = fs::remove_file(&path);
    }
}
