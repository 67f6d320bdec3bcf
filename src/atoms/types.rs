// ── Emotion Atoms: Core Types ──────────────────────────────────────────────
//
// Pure data types shared by every layer (no DB access, no I/O).
// Follows the project pattern: structs in atoms/, behaviour in engine/.

use crate::atoms::constants::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every timestamp in the engine is UTC wall-clock time.
pub type Timestamp = DateTime<Utc>;

/// Per-kind signed deltas actually applied by one engine call.
pub type IntensityChanges = BTreeMap<EmotionKind, f64>;

// ═══════════════════════════════════════════════════════════════════════════
// Emotion kinds
// ═══════════════════════════════════════════════════════════════════════════

/// The fixed set of affect categories tracked per user.
///
/// Declaration order is significant: it is the iteration order of a
/// `UserEmotionVector`, so when two kinds share the greatest intensity the
/// one declared first is reported as dominant (more urgent kinds first).
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmotionKind {
    /// Extreme negative content that needs immediate handling.
    Emergency,
    Angry,
    Sad,
    Happy,
    Neutral,
}

impl EmotionKind {
    pub const ALL: [EmotionKind; 5] = [
        EmotionKind::Emergency,
        EmotionKind::Angry,
        EmotionKind::Sad,
        EmotionKind::Happy,
        EmotionKind::Neutral,
    ];

    /// Decay rate assigned when a state for this kind is first created.
    pub fn default_decay_rate(self) -> f64 {
        match self {
            EmotionKind::Happy => DECAY_RATE_HAPPY,
            EmotionKind::Angry => DECAY_RATE_ANGRY,
            EmotionKind::Sad => DECAY_RATE_SAD,
            EmotionKind::Neutral => DECAY_RATE_NEUTRAL,
            EmotionKind::Emergency => DECAY_RATE_EMERGENCY,
        }
    }

    /// Base magnitude used when an event falls outside every known category.
    pub fn fallback_base_intensity(self) -> f64 {
        match self {
            EmotionKind::Happy => BASE_OTHER_HAPPY,
            EmotionKind::Angry => BASE_OTHER_ANGRY,
            EmotionKind::Sad => BASE_OTHER_SAD,
            EmotionKind::Neutral | EmotionKind::Emergency => BASE_OTHER_DEFAULT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EmotionKind::Emergency => "EMERGENCY",
            EmotionKind::Angry => "ANGRY",
            EmotionKind::Sad => "SAD",
            EmotionKind::Happy => "HAPPY",
            EmotionKind::Neutral => "NEUTRAL",
        }
    }
}

impl std::fmt::Display for EmotionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EmotionKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "happy" | "joy" => Ok(EmotionKind::Happy),
            "angry" | "anger" => Ok(EmotionKind::Angry),
            "sad" | "sorrow" => Ok(EmotionKind::Sad),
            "emergency" | "crisis" => Ok(EmotionKind::Emergency),
            "neutral" => Ok(EmotionKind::Neutral),
            _ => Ok(EmotionKind::Neutral), // graceful fallback
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Event categories
// ═══════════════════════════════════════════════════════════════════════════

/// Classification of an incoming textual event.
///
/// `Repeated` and `LongAbsent` are never produced by the keyword classifier;
/// they exist so that stored rows written by other producers round-trip, and
/// they are applied like `Other`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Praise,
    Apology,
    Criticism,
    Ignore,
    Need,
    Repeated,
    LongAbsent,
    Other,
}

impl EventCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            EventCategory::Praise => "praise",
            EventCategory::Apology => "apology",
            EventCategory::Criticism => "criticism",
            EventCategory::Ignore => "ignore",
            EventCategory::Need => "need",
            EventCategory::Repeated => "repeated",
            EventCategory::LongAbsent => "long_absent",
            EventCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for EventCategory {
    fn default() -> Self {
        EventCategory::Praise
    }
}

impl std::str::FromStr for EventCategory {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "praise" => Ok(EventCategory::Praise),
            "apology" => Ok(EventCategory::Apology),
            "criticism" => Ok(EventCategory::Criticism),
            "ignore" => Ok(EventCategory::Ignore),
            "need" => Ok(EventCategory::Need),
            "repeated" => Ok(EventCategory::Repeated),
            "long_absent" | "longabsent" | "long-absent" => Ok(EventCategory::LongAbsent),
            _ => Ok(EventCategory::Other), // graceful fallback
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Event memory
// ═══════════════════════════════════════════════════════════════════════════

/// One row of a user's append-only event log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventMemoryEntry {
    /// Raw event text exactly as supplied by the caller.
    pub event: String,
    /// Emotion kind recorded with the event (the detected kind).
    pub kind: EmotionKind,
    /// Post-modulation magnitude at record time.
    pub intensity: f64,
    pub category: EventCategory,
    pub timestamp: Timestamp,
}

impl EventMemoryEntry {
    pub fn new(
        event: impl Into<String>,
        kind: EmotionKind,
        intensity: f64,
        category: EventCategory,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            event: event.into(),
            kind,
            intensity,
            category,
            timestamp,
        }
    }
}
