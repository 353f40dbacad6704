//! Browser bindings
//!
//! The page owns the canvas, input listeners and `requestAnimationFrame`; it
//! drives a `WebGame` and renders from the JSON snapshot.

use wasm_bindgen::prelude::*;

use crate::audio::WebAudio;
use crate::persistence::LocalStorageStore;
use crate::platform::{init_logging, time_seed};
use crate::runner::GameRunner;
use crate::settings::Settings;
use crate::sim::{TickInput, Variant};

#[wasm_bindgen(start)]
pub fn start() {
    init_logging();
    log::info!("Crazy Roll v{} loaded", env!("CARGO_PKG_VERSION"));
}

#[wasm_bindgen]
pub struct WebGame {
    runner: GameRunner<LocalStorageStore, WebAudio>,
}

#[wasm_bindgen]
impl WebGame {
    /// `variant` is "flat" or "perspective"; anything else falls back to the
    /// saved preference
    #[wasm_bindgen(constructor)]
    pub fn new(variant: &str) -> WebGame {
        let mut settings = Settings::load();
        if let Some(v) = Variant::from_str(variant) {
            settings.variant = v;
        }
        let variant = settings.variant;
        let runner = GameRunner::new(
            variant.tuning(),
            time_seed(),
            LocalStorageStore::new(variant),
            WebAudio::new(),
            settings,
        );
        WebGame { runner }
    }

    /// Advance by the measured frame time in milliseconds
    pub fn frame(&mut self, elapsed_ms: f64, up: bool, down: bool, left: bool, right: bool) -> u32 {
        let input = TickInput {
            up,
            down,
            left,
            right,
        };
        self.runner.frame((elapsed_ms / 1000.0) as f32, &input)
    }

    #[wasm_bindgen(js_name = startRun)]
    pub fn start_run(&mut self) -> bool {
        self.runner.start()
    }

    pub fn restart(&mut self) -> bool {
        self.runner.restart()
    }

    #[wasm_bindgen(js_name = returnToMenu)]
    pub fn return_to_menu(&mut self) -> bool {
        self.runner.return_to_menu()
    }

    pub fn stop(&mut self) {
        self.runner.stop();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.runner.resize(width, height);
    }

    /// Call from a user gesture; browsers start the audio context suspended
    #[wasm_bindgen(js_name = resumeAudio)]
    pub fn resume_audio(&self) {
        self.runner.audio().resume();
    }

    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, volume: f32) {
        self.runner.set_volume(volume);
        self.runner.settings().save();
    }

    #[wasm_bindgen(js_name = setMuted)]
    pub fn set_muted(&mut self, muted: bool) {
        self.runner.set_muted(muted);
        self.runner.settings().save();
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.runner.state().phase())
    }

    pub fn score(&self) -> f64 {
        self.runner.state().session.score() as f64
    }

    #[wasm_bindgen(js_name = highScore)]
    pub fn high_score(&self) -> f64 {
        self.runner.state().session.high_score() as f64
    }

    /// Ball scale for the beat pulse (1.0 outside a pulse)
    #[wasm_bindgen(js_name = pulseScale)]
    pub fn pulse_scale(&self) -> f32 {
        self.runner.state().beat.pulse_scale()
    }

    /// Full state plus particles, for the renderer
    pub fn snapshot(&self) -> Result<String, JsValue> {
        let state = self.runner.state();
        let snapshot = serde_json::json!({
            "state": state,
            "particles": state.particles,
            "events": self.runner.events(),
        });
        serde_json::to_string(&snapshot).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
