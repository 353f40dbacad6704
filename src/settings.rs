//! Game settings and preferences
//!
//! Persisted separately from the high score in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::sim::{Tuning, Variant};

/// Player preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Game picked on the title screen
    pub variant: Variant,

    // === Visual Effects ===
    /// Ball trails
    pub trails: bool,
    /// Crash particle bursts
    pub particles: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::Flat,
            trails: true,
            particles: true,
            master_volume: 0.7,
            muted: false,
        }
    }
}

impl Settings {
    /// Switch off cosmetic effects the player disabled
    pub fn apply_to(&self, tuning: &mut Tuning) {
        if !self.trails {
            tuning.ball.trail_length = 0;
        }
        if !self.particles {
            tuning.particles.crash_burst = 0;
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "crazy_roll_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_effects_strip_tuning() {
        let settings = Settings {
            trails: false,
            particles: false,
            ..Default::default()
        };
        let mut tuning = Tuning::flat();
        settings.apply_to(&mut tuning);
        assert_eq!(tuning.ball.trail_length, 0);
        assert_eq!(tuning.particles.crash_burst, 0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"muted": true}"#).unwrap();
        assert!(settings.muted);
        assert!(settings.trails);
        assert_eq!(settings.variant, Variant::Flat);
    }
}
