//! Beat clock for cosmetic and audio sync
//!
//! Accumulates measured elapsed time rather than assuming a frame duration.
//! Drum steps run at `step_interval` starting with the first tick; the ball
//! scale pulse rides on every `pulse_every`-th step and is an in-state timed
//! effect that expires inside `advance`.

use serde::{Deserialize, Serialize};

use super::tuning::BeatTuning;

/// Drum steps per bar: kick, hat, snare, hat
pub const STEPS_PER_BAR: u8 = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeatClock {
    /// Seconds since the clock started
    pub now: f64,
    next_step_at: f64,
    step_interval: f64,
    pulse_every: u64,
    pulse_duration: f64,
    pulse_scale: f32,
    /// Scale pulse active until this time
    pulse_expires_at: Option<f64>,
    beats: u64,
}

impl BeatClock {
    pub fn new(tuning: &BeatTuning) -> Self {
        Self {
            now: 0.0,
            next_step_at: 0.0,
            step_interval: f64::from(tuning.step_interval),
            pulse_every: u64::from(tuning.pulse_every.max(1)),
            pulse_duration: f64::from(tuning.pulse_duration),
            pulse_scale: tuning.pulse_scale,
            pulse_expires_at: None,
            beats: 0,
        }
    }

    /// Advance by `dt` seconds. Returns the bar step when one fires.
    ///
    /// At most one step fires per call; a long stall drops the missed steps
    /// instead of firing them in a burst.
    pub fn advance(&mut self, dt: f32) -> Option<u8> {
        if dt.is_finite() {
            self.now += f64::from(dt.max(0.0));
        }

        if let Some(expires) = self.pulse_expires_at {
            if self.now >= expires {
                self.pulse_expires_at = None;
            }
        }

        if self.now < self.next_step_at {
            return None;
        }

        self.next_step_at += self.step_interval;
        if self.next_step_at <= self.now {
            self.next_step_at = self.now + self.step_interval;
        }
        if self.beats % self.pulse_every == 0 {
            self.pulse_expires_at = Some(self.now + self.pulse_duration);
        }

        let step = (self.beats % u64::from(STEPS_PER_BAR)) as u8;
        self.beats += 1;
        Some(step)
    }

    #[inline]
    pub fn is_pulsing(&self) -> bool {
        self.pulse_expires_at.is_some()
    }

    /// Render scale for the ball (1.0 outside a pulse)
    pub fn pulse_scale(&self) -> f32 {
        if self.is_pulsing() { self.pulse_scale } else { 1.0 }
    }

    pub fn beats(&self) -> u64 {
        self.beats
    }
}
