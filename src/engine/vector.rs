// ── Emotion: Per-User Emotion Vector ────────────────────────────────────────
//
// A user's map of emotion kind → EmotionState. Kinds are independent: no
// normalisation across kinds, so a user can be very happy and very angry at
// the same time.
//
// Thread-safety: NOT internally synchronized. Each vector has exactly one
// owner; concurrent requests for the same user go through EmotionRegistry.

use crate::atoms::types::{EmotionKind, Timestamp};
use crate::engine::emotion_state::EmotionState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserEmotionVector {
    pub user_id: String,
    /// Keyed by kind; BTreeMap keeps iteration in `EmotionKind` declaration order.
    emotions: BTreeMap<EmotionKind, EmotionState>,
}

impl UserEmotionVector {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            emotions: BTreeMap::new(),
        }
    }

    /// Kind with the greatest decayed intensity at `now`.
    ///
    /// States that have decayed to zero are ignored, so `None` means nothing
    /// is currently felt. Ties resolve to the kind declared first in
    /// `EmotionKind`.
    pub fn dominant(&self, now: Timestamp) -> Option<EmotionKind> {
        let mut best: Option<(EmotionKind, f64)> = None;
        for (kind, state) in &self.emotions {
            let value = state.current_intensity(now);
            if value <= 0.0 {
                continue;
            }
            match best {
                Some((_, top)) if value <= top => {}
                _ => best = Some((*kind, value)),
            }
        }
        best.map(|(kind, _)| kind)
    }

    /// Decayed intensity of `kind`, or 0 when the kind is untracked.
    pub fn intensity_of(&self, kind: EmotionKind, now: Timestamp) -> f64 {
        self.emotions
            .get(&kind)
            .map(|s| s.current_intensity(now))
            .unwrap_or(0.0)
    }

    /// Apply `delta` to `kind` using the kind's default decay rate on creation.
    pub fn update(&mut self, kind: EmotionKind, delta: f64, now: Timestamp) {
        self.update_with_rate(kind, delta, now, None);
    }

    /// Apply `delta` to `kind`. `decay_rate` only matters when the state is
    /// created here; an existing state keeps the rate it was created with.
    pub fn update_with_rate(
        &mut self,
        kind: EmotionKind,
        delta: f64,
        now: Timestamp,
        decay_rate: Option<f64>,
    ) {
        match self.emotions.get_mut(&kind) {
            Some(state) => state.apply_delta(delta, now),
            None => {
                let rate = decay_rate.unwrap_or_else(|| kind.default_decay_rate());
                self.emotions
                    .insert(kind, EmotionState::new(kind, delta, rate, now));
            }
        }
    }

    /// Materialise decay on every tracked kind.
    pub fn apply_decay(&mut self, now: Timestamp) {
        for state in self.emotions.values_mut() {
            state.apply_decay(now);
        }
    }

    pub fn state(&self, kind: EmotionKind) -> Option<&EmotionState> {
        self.emotions.get(&kind)
    }

    pub fn states(&self) -> impl Iterator<Item = &EmotionState> {
        self.emotions.values()
    }

    /// Decayed intensities of every kind currently above zero.
    pub fn active(&self, now: Timestamp) -> BTreeMap<EmotionKind, f64> {
        self.emotions
            .iter()
            .map(|(k, s)| (*k, s.current_intensity(now)))
            .filter(|(_, v)| *v > 0.0)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.emotions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emotions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 11, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_vector_has_no_dominant() {
        let v = UserEmotionVector::new("u1");
        assert!(v.is_empty());
        assert_eq!(v.dominant(t0()), None);
        assert_eq!(v.intensity_of(EmotionKind::Happy, t0()), 0.0);
    }

    #[test]
    fn dominant_follows_decayed_intensity() {
        let mut v = UserEmotionVector::new("u1");
        v.update(EmotionKind::Happy, 0.7, t0());
        v.update(EmotionKind::Sad, 0.6, t0());
        assert_eq!(v.dominant(t0()), Some(EmotionKind::Happy));
        // SAD decays 0.1/h vs HAPPY 0.05/h, so HAPPY stays on top
        assert_eq!(v.dominant(t0() + Duration::hours(3)), Some(EmotionKind::Happy));

        v.update(EmotionKind::Angry, 1.0, t0());
        assert_eq!(v.dominant(t0()), Some(EmotionKind::Angry));
    }

    #[test]
    fn ties_resolve_in_declaration_order() {
        let mut v = UserEmotionVector::new("u1");
        v.update(EmotionKind::Happy, 0.5, t0());
        v.update(EmotionKind::Sad, 0.5, t0());
        assert_eq!(v.dominant(t0()), Some(EmotionKind::Sad));
    }

    #[test]
    fn zero_states_persist_but_do_not_rank() {
        let mut v = UserEmotionVector::new("u1");
        v.update(EmotionKind::Neutral, 0.0, t0());
        assert_eq!(v.len(), 1);
        assert_eq!(v.dominant(t0()), None);
        assert!(v.active(t0()).is_empty());
    }

    #[test]
    fn kinds_are_independent() {
        let mut v = UserEmotionVector::new("u1");
        v.update(EmotionKind::Happy, 0.9, t0());
        v.update(EmotionKind::Angry, 0.9, t0());
        assert_eq!(v.intensity_of(EmotionKind::Happy, t0()), 0.9);
        assert_eq!(v.intensity_of(EmotionKind::Angry, t0()), 0.9);
    }

    #[test]
    fn decay_rate_is_fixed_at_creation() {
        let mut v = UserEmotionVector::new("u1");
        v.update_with_rate(EmotionKind::Happy, 1.0, t0(), Some(0.2));
        v.update_with_rate(EmotionKind::Happy, 0.0, t0(), Some(0.9));
        assert_eq!(v.state(EmotionKind::Happy).unwrap().decay_rate(), 0.2);

        v.update(EmotionKind::Sad, 0.3, t0());
        assert_eq!(
            v.state(EmotionKind::Sad).unwrap().decay_rate(),
            EmotionKind::Sad.default_decay_rate()
        );
    }

    #[test]
    fn negative_first_delta_creates_zero_state() {
        let mut v = UserEmotionVector::new("u1");
        v.update(EmotionKind::Angry, -0.2, t0());
        assert_eq!(v.intensity_of(EmotionKind::Angry, t0()), 0.0);
        assert!(v.state(EmotionKind::Angry).is_some());
    }

    #[test]
    fn vector_serializes_with_kind_keys() {
        let mut v = UserEmotionVector::new("u1");
        v.update(EmotionKind::Happy, 0.4, t0());
        let json = serde_json::to_string(&v).unwrap();
        assert!(json.contains("\"HAPPY\""));
        let back: UserEmotionVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
