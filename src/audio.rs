//! Audio cues
//!
//! The simulation only emits events; this module maps them to cues and hands
//! them to an `AudioSink`. On wasm32 `WebAudio` synthesizes every cue with
//! oscillators, so no sound files are needed. Natively `NullAudio` drops them.

use crate::sim::{GameEvent, beat::STEPS_PER_BAR};

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Grounded jump launched
    Jump,
    /// Gem picked up
    Collect,
    /// Fatal collision
    Crash,
    /// Background beat; `step` picks kick/hat/snare/hat
    Beat { step: u8 },
}

/// Cue for a simulation event, if it makes a sound
pub fn cue_for(event: &GameEvent) -> Option<Cue> {
    match *event {
        GameEvent::Jump => Some(Cue::Jump),
        GameEvent::Collect { .. } => Some(Cue::Collect),
        GameEvent::Crash { .. } => Some(Cue::Crash),
        GameEvent::Beat { step } => Some(Cue::Beat { step: step % STEPS_PER_BAR }),
        _ => None,
    }
}

/// Oscillator settings for one cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Hz
    pub frequency: f32,
    /// Peak gain before master volume
    pub gain: f32,
    /// Seconds
    pub duration: f64,
}

/// Beat hits sit well under the effects
const BEAT_GAIN: f32 = 0.1;

impl Cue {
    pub fn tone(&self) -> Tone {
        let (frequency, gain, duration) = match *self {
            Cue::Jump => (400.0, 0.2, 0.15),
            Cue::Collect => (800.0, 0.3, 0.1),
            Cue::Crash => (150.0, 0.4, 0.3),
            Cue::Beat { step } => {
                let drum = Drum::for_step(step);
                (drum.frequency(), BEAT_GAIN, drum.duration())
            }
        };
        Tone {
            frequency,
            gain,
            duration,
        }
    }
}

/// Beat drum for a bar step: kick, hat, snare, hat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drum {
    Kick,
    HiHat,
    Snare,
}

impl Drum {
    pub fn for_step(step: u8) -> Self {
        match step % STEPS_PER_BAR {
            0 => Drum::Kick,
            2 => Drum::Snare,
            _ => Drum::HiHat,
        }
    }

    /// Oscillator frequency in Hz
    pub fn frequency(&self) -> f32 {
        match self {
            Drum::Kick => 80.0,
            Drum::HiHat => 200.0,
            Drum::Snare => 120.0,
        }
    }

    /// Hit length in seconds
    pub fn duration(&self) -> f64 {
        match self {
            Drum::HiHat => 0.05,
            Drum::Kick | Drum::Snare => 0.1,
        }
    }
}

/// Anything that can play cues. Failures stay inside the sink.
pub trait AudioSink {
    fn play(&mut self, cue: Cue);

    /// Master volume (0.0 - 1.0)
    fn set_volume(&mut self, volume: f32);

    fn set_muted(&mut self, muted: bool);
}

/// Silent sink for headless runs
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: Cue) {}

    fn set_volume(&mut self, _volume: f32) {}

    fn set_muted(&mut self, _muted: bool) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, Cue};

    /// Web Audio backend
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 0.7,
                muted: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn effective_volume(&self) -> f32 {
            if self.muted { 0.0 } else { self.volume }
        }

        fn create_osc(&self, ctx: &AudioContext, freq: f32) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(OscillatorType::Square);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Short square beep with an exponential fade
        fn beep(&self, ctx: &AudioContext, freq: f32, level: f32, duration: f64) {
            let Some((osc, gain)) = self.create_osc(ctx, freq) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(level, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + duration)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + duration).ok();
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, cue: Cue) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let tone = cue.tone();
            self.beep(ctx, tone.frequency, vol * tone.gain, tone.duration);
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }
    }
}
