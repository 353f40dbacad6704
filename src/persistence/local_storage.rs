//! Browser LocalStorage backend
//!
//! Stores the score as a plain integer string under a per-variant key, the
//! format the browser games have always used.

use web_sys::Storage;

use super::{HighScoreStore, parse_high_score};
use crate::error::PersistenceError;
use crate::sim::Variant;

pub struct LocalStorageStore {
    key: &'static str,
}

impl LocalStorageStore {
    pub fn new(variant: Variant) -> Self {
        Self {
            key: Self::key_for(variant),
        }
    }

    pub fn key_for(variant: Variant) -> &'static str {
        match variant {
            Variant::Flat => "crazyRollHighScore",
            Variant::Perspective => "crazyRoll3DHighScore",
        }
    }

    fn storage() -> Option<Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

impl HighScoreStore for LocalStorageStore {
    fn load_high_score(&mut self) -> u64 {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, high score starts at 0");
            return 0;
        };
        match storage.get_item(self.key) {
            Ok(Some(raw)) => parse_high_score(&raw),
            _ => 0,
        }
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), PersistenceError> {
        let storage = Self::storage().ok_or(PersistenceError::Unavailable)?;
        storage
            .set_item(self.key, &score.to_string())
            .map_err(|e| PersistenceError::Backend(format!("{:?}", e)))?;
        log::info!("High score {} saved", score);
        Ok(())
    }
}
