//! Crazy Roll - endless-runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, entity pools, collisions, session)
//! - `runner`: Fixed-step scheduler that drives the simulation and its collaborators
//! - `audio`: Audio cue sink (Web Audio on wasm32, no-op natively)
//! - `persistence`: High score load/save contract and storage backends
//! - `platform`: Browser/native platform helpers
//! - `settings`: Player preferences
//! - `web`: wasm-bindgen surface for the browser page (wasm32 only)

pub mod audio;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod runner;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{ConfigError, PersistenceError};
pub use runner::GameRunner;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted by the scheduler (tab switches, debugger pauses)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default viewport, used until the resize collaborator reports one
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 800.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 600.0;
}
