//! Fixed-step scheduler
//!
//! Owns the simulation context and its collaborators. The host calls
//! `frame` once per display frame with the measured elapsed time; the runner
//! turns that into whole `SIM_DT` ticks and forwards the resulting events to
//! audio and persistence. The loop is explicitly armed by start/restart and
//! disarms itself as soon as the run leaves `Playing`.

use crate::audio::{AudioSink, cue_for};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::persistence::HighScoreStore;
use crate::settings::Settings;
use crate::sim::{Command, GameEvent, GamePhase, GameState, TickInput, Tuning, tick};

pub struct GameRunner<S: HighScoreStore, A: AudioSink> {
    state: GameState,
    store: S,
    audio: A,
    settings: Settings,
    accumulator: f32,
    running: bool,
    /// Events dispatched since the last frame or command
    events: Vec<GameEvent>,
}

impl<S: HighScoreStore, A: AudioSink> GameRunner<S, A> {
    /// Build a runner on the menu. The stored best score is loaded here.
    pub fn new(mut tuning: Tuning, seed: u64, mut store: S, mut audio: A, settings: Settings) -> Self {
        settings.apply_to(&mut tuning);
        audio.set_volume(settings.master_volume);
        audio.set_muted(settings.muted);

        let high_score = store.load_high_score();
        log::info!(
            "Runner ready: {} (seed {}, high score {})",
            tuning.variant.as_str(),
            seed,
            high_score
        );

        Self {
            state: GameState::new(tuning, seed, high_score),
            store,
            audio,
            settings,
            accumulator: 0.0,
            running: false,
            events: Vec::new(),
        }
    }

    /// Apply a session command and arm/disarm the loop to match.
    /// Returns false when the command does not apply in the current phase.
    pub fn command(&mut self, command: Command) -> bool {
        self.events.clear();
        if !self.state.apply_command(command) {
            return false;
        }
        self.accumulator = 0.0;
        self.running = self.state.phase() == GamePhase::Playing;
        self.dispatch();
        true
    }

    pub fn start(&mut self) -> bool {
        self.command(Command::Start)
    }

    pub fn restart(&mut self) -> bool {
        self.command(Command::Restart)
    }

    pub fn return_to_menu(&mut self) -> bool {
        self.command(Command::ReturnToMenu)
    }

    /// Disarm the loop. Calling it again is a no-op.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.accumulator = 0.0;
        log::debug!("Loop stopped at tick {}", self.state.time_ticks);
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by the measured frame time. Returns the number of ticks run.
    pub fn frame(&mut self, elapsed: f32, input: &TickInput) -> u32 {
        self.events.clear();
        if !self.running {
            return 0;
        }

        // Bad host timestamps would poison the accumulator for good
        if !elapsed.is_finite() {
            log::warn!("Ignoring non-finite frame time {}", elapsed);
            return 0;
        }

        // Clamp long stalls (tab switch, debugger) instead of fast-forwarding
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
            self.dispatch();

            if self.state.phase() != GamePhase::Playing {
                self.stop();
                break;
            }
        }
        substeps
    }

    /// Drain the context outbox into audio, persistence and `events`
    fn dispatch(&mut self) {
        for event in self.state.take_events() {
            if let Some(cue) = cue_for(&event) {
                self.audio.play(cue);
            }
            if let GameEvent::NewHighScore(score) = event {
                if let Err(e) = self.store.save_high_score(score) {
                    log::warn!("Failed to save high score {}: {}", score, e);
                }
            }
            self.events.push(event);
        }
    }

    /// Viewport change from the host. Only spawn distance depends on it.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.set_viewport(width, height);
        log::debug!(
            "Viewport {}x{} (aspect {:.2})",
            self.state.viewport.width,
            self.state.viewport.height,
            self.state.viewport.aspect()
        );
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.settings.master_volume = volume.clamp(0.0, 1.0);
        self.audio.set_volume(self.settings.master_volume);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.audio.set_muted(muted);
    }

    /// Events produced by the last `frame` or command
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
