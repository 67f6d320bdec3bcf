// ── Emotion: Display Summary ────────────────────────────────────────────────
//
// Turns a vector into something a reply generator or UI can consume directly:
// the primary emotion, its strength, a tone hint and one line of prose.

use crate::atoms::constants::{TONE_MILD_THRESHOLD, TONE_MODERATE_THRESHOLD, TONE_STRONG_THRESHOLD};
use crate::atoms::types::{EmotionKind, Timestamp};
use crate::engine::vector::UserEmotionVector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How replies should sound given the current primary emotion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Excited,
    Friendly,
    ColdDirect,
    Direct,
    SoftEmpathic,
    Neutral,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Excited => "excited",
            Tone::Friendly => "friendly",
            Tone::ColdDirect => "cold_direct",
            Tone::Direct => "direct",
            Tone::SoftEmpathic => "soft_empathic",
            Tone::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmotionSnapshot {
    pub user_id: String,
    pub primary: EmotionKind,
    pub intensity: f64,
    /// Every kind with a positive decayed intensity.
    pub all: BTreeMap<EmotionKind, f64>,
    pub tone: Tone,
    pub summary: String,
    pub at: Timestamp,
}

/// Render the vector as seen at `now`. An empty or fully decayed vector
/// renders as NEUTRAL at 0.
pub fn render(vector: &UserEmotionVector, now: Timestamp) -> EmotionSnapshot {
    let primary = vector.dominant(now).unwrap_or(EmotionKind::Neutral);
    let intensity = vector.intensity_of(primary, now);
    EmotionSnapshot {
        user_id: vector.user_id.clone(),
        primary,
        intensity,
        all: vector.active(now),
        tone: tone_for(primary, intensity),
        summary: summary_for(primary, intensity).to_string(),
        at: now,
    }
}

pub fn tone_for(primary: EmotionKind, intensity: f64) -> Tone {
    match primary {
        EmotionKind::Happy if intensity > TONE_STRONG_THRESHOLD => Tone::Excited,
        EmotionKind::Happy if intensity > TONE_MODERATE_THRESHOLD => Tone::Friendly,
        EmotionKind::Angry if intensity > TONE_STRONG_THRESHOLD => Tone::ColdDirect,
        EmotionKind::Angry if intensity > TONE_MODERATE_THRESHOLD => Tone::Direct,
        EmotionKind::Sad if intensity > TONE_MODERATE_THRESHOLD => Tone::SoftEmpathic,
        _ => Tone::Neutral,
    }
}

fn summary_for(primary: EmotionKind, intensity: f64) -> &'static str {
    match primary {
        EmotionKind::Emergency => "Attention: emergency emotion detected, handle with priority.",
        EmotionKind::Happy => match intensity {
            i if i > TONE_STRONG_THRESHOLD => "Very happy right now; replies will be excited and playful.",
            i if i > TONE_MODERATE_THRESHOLD => "In a good mood; replies will be relaxed and friendly.",
            i if i > TONE_MILD_THRESHOLD => "A little happy, though it barely shows.",
            _ => "Mood is neutral or only faintly happy.",
        },
        EmotionKind::Angry => match intensity {
            i if i > TONE_STRONG_THRESHOLD => {
                "Rather angry; replies will be cold and direct but still helpful."
            }
            i if i > TONE_MODERATE_THRESHOLD => "Somewhat annoyed; replies will be direct.",
            i if i > TONE_MILD_THRESHOLD => "Slightly displeased, with little effect.",
            _ => "Mood is neutral or only faintly displeased.",
        },
        EmotionKind::Sad => match intensity {
            i if i > TONE_MODERATE_THRESHOLD => "Feeling sad; replies will be gentle and empathetic.",
            i if i > TONE_MILD_THRESHOLD => "Slightly low.",
            _ => "Mood is neutral.",
        },
        EmotionKind::Neutral => "Mood is currently neutral.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 11, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_vector_renders_neutral() {
        let snap = render(&UserEmotionVector::new("u"), t0());
        assert_eq!(snap.primary, EmotionKind::Neutral);
        assert_eq!(snap.intensity, 0.0);
        assert_eq!(snap.tone, Tone::Neutral);
        assert!(snap.all.is_empty());
    }

    #[test]
    fn happy_vector_renders_primary_and_tone() {
        let mut v = UserEmotionVector::new("u");
        v.update(EmotionKind::Happy, 0.7, t0());
        let snap = render(&v, t0());
        assert_eq!(snap.primary, EmotionKind::Happy);
        assert_eq!(snap.intensity, 0.7);
        assert_eq!(snap.tone, Tone::Friendly);
        assert_eq!(snap.all.len(), 1);
    }

    #[test]
    fn tone_thresholds_are_strict() {
        assert_eq!(tone_for(EmotionKind::Happy, 0.9), Tone::Excited);
        assert_eq!(tone_for(EmotionKind::Happy, 0.5), Tone::Neutral);
        assert_eq!(tone_for(EmotionKind::Angry, 0.81), Tone::ColdDirect);
        assert_eq!(tone_for(EmotionKind::Angry, 0.6), Tone::Direct);
        assert_eq!(tone_for(EmotionKind::Sad, 0.9), Tone::SoftEmpathic);
        assert_eq!(tone_for(EmotionKind::Emergency, 1.0), Tone::Neutral);
    }

    #[test]
    fn emergency_gets_urgent_summary() {
        let mut v = UserEmotionVector::new("u");
        v.update(EmotionKind::Emergency, 0.1, t0());
        let snap = render(&v, t0());
        assert!(snap.summary.starts_with("Attention"));
    }

    #[test]
    fn snapshot_serializes_with_wire_names() {
        let mut v = UserEmotionVector::new("u");
        v.update(EmotionKind::Angry, 0.9, t0());
        let json = serde_json::to_value(render(&v, t0())).unwrap();
        assert_eq!(json["primary"], "ANGRY");
        assert_eq!(json["tone"], "cold_direct");
    }
}
