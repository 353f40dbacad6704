//! High score persistence
//!
//! The session only needs two operations: load the stored best at startup and
//! save a new best when a run ends above it. Backends:
//! - `MemoryStore`: tests and headless runs
//! - `FileStore`: native, a small JSON record on disk
//! - `LocalStorageStore`: wasm32, the browser's LocalStorage
//!
//! Missing or malformed data always loads as 0.

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use crate::error::PersistenceError;

/// Load/save contract for the best score of one variant
pub trait HighScoreStore {
    /// Stored best, or 0 when absent or unreadable
    fn load_high_score(&mut self) -> u64;

    fn save_high_score(&mut self, score: u64) -> Result<(), PersistenceError>;
}

/// In-memory store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub high_score: u64,
    /// Number of successful saves
    pub saves: u32,
}

impl MemoryStore {
    pub fn with_high_score(high_score: u64) -> Self {
        Self {
            high_score,
            saves: 0,
        }
    }
}

impl HighScoreStore for MemoryStore {
    fn load_high_score(&mut self) -> u64 {
        self.high_score
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), PersistenceError> {
        self.high_score = score;
        self.saves += 1;
        Ok(())
    }
}

/// Parse a stored plain-integer score. Anything unparseable is 0.
pub fn parse_high_score(raw: &str) -> u64 {
    match raw.trim().parse::<u64>() {
        Ok(score) => score,
        Err(e) => {
            log::warn!("Ignoring malformed high score {:?}: {}", raw, e);
            0
        }
    }
}
