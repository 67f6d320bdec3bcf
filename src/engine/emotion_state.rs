// ── Emotion: Decaying Scalar State ──────────────────────────────────────────
//
// One named emotion's intensity for one user. Decay is lazy: nothing ticks in
// the background, every read resolves `intensity - decay_rate × whole_hours`
// from `last_updated`. Elapsed time truncates to whole hours, so anything
// under sixty minutes decays by exactly zero.
//
// Clock policy: a `now` earlier than `last_updated` is clamped up to
// `last_updated`. Reads then see zero elapsed time and writes never move
// `last_updated` backwards.

use crate::atoms::types::{EmotionKind, Timestamp};
use log::debug;
use serde::{Deserialize, Serialize};

/// A single emotion kind's intensity, decay rate and last-update time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmotionState {
    pub kind: EmotionKind,
    intensity: f64,
    last_updated: Timestamp,
    /// Intensity lost per whole elapsed hour. Fixed at creation.
    decay_rate: f64,
}

impl EmotionState {
    /// Create a state from its first delta. Negative deltas floor at zero.
    pub fn new(kind: EmotionKind, initial_delta: f64, decay_rate: f64, now: Timestamp) -> Self {
        let decay_rate = if decay_rate.is_nan() {
            kind.default_decay_rate()
        } else {
            decay_rate.max(0.0)
        };
        Self {
            kind,
            intensity: finite_or_zero(initial_delta).max(0.0),
            last_updated: now,
            decay_rate,
        }
    }

    /// Create a state using the kind's default decay rate.
    pub fn with_default_rate(kind: EmotionKind, initial_delta: f64, now: Timestamp) -> Self {
        Self::new(kind, initial_delta, kind.default_decay_rate(), now)
    }

    /// Intensity stored at the last update, before any pending decay.
    pub fn raw_intensity(&self) -> f64 {
        self.intensity
    }

    pub fn last_updated(&self) -> Timestamp {
        self.last_updated
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    /// Decayed intensity at `now`, never below zero.
    pub fn current_intensity(&self, now: Timestamp) -> f64 {
        let hours = elapsed_hours(self.last_updated, now);
        (self.intensity - self.decay_rate * hours as f64).max(0.0)
    }

    /// Resolve decay up to `now`, add `delta`, floor at zero and stamp `now`.
    pub fn apply_delta(&mut self, delta: f64, now: Timestamp) {
        let now = if now < self.last_updated {
            debug!(
                "[emotion] {} update at {} precedes last update {}, clamping",
                self.kind, now, self.last_updated
            );
            self.last_updated
        } else {
            now
        };
        let current = self.current_intensity(now);
        self.intensity = (current + finite_or_zero(delta)).max(0.0);
        self.last_updated = now;
    }

    /// Decay-only pass: materialise the decayed value at `now`.
    pub fn apply_decay(&mut self, now: Timestamp) {
        self.apply_delta(0.0, now);
    }
}

/// Whole hours between `from` and `to`; zero when `to` is not after `from`.
pub fn elapsed_hours(from: Timestamp, to: Timestamp) -> i64 {
    if to <= from {
        0
    } else {
        (to - from).num_hours()
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
