// ── Emotion: Event Engine ───────────────────────────────────────────────────
//
// One call per incoming event, no state of its own beyond config:
//
//   Classify → Score → Modulate (fatigue, surprise) → Apply → Record
//
// Classify:  keyword rules, configured fallback when nothing matches
// Score:     fixed per-category base (per-detected-kind for uncategorized)
// Fatigue:   step function of how often this exact text was seen before
// Surprise:  multiplier when the text was absent for the threshold window
// Apply:     category-specific rules onto the caller's vector
// Record:    always appended to event memory with the final magnitude
//
// The engine never fails on business input. The only errors it returns are
// event-store errors, passed through unchanged.

use crate::atoms::constants::*;
use crate::atoms::error::EngineResult;
use crate::atoms::types::{EmotionKind, EventCategory, EventMemoryEntry, IntensityChanges, Timestamp};
use crate::engine::classifier::{classify_event, replay_keyword};
use crate::engine::config::EngineConfig;
use crate::engine::memory::EventMemory;
use crate::engine::vector::UserEmotionVector;
use log::{debug, info, warn};
use serde::Serialize;

/// Full trace of one processed event.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProcessedEvent {
    pub category: EventCategory,
    pub base_intensity: f64,
    pub repeat_count: u64,
    pub fatigue_factor: f64,
    pub surprise_factor: f64,
    pub final_intensity: f64,
    /// Signed deltas actually applied, per kind.
    pub changes: IntensityChanges,
}

pub struct EmotionEngine {
    memory: EventMemory,
    config: EngineConfig,
}

impl EmotionEngine {
    pub fn new(memory: EventMemory) -> Self {
        Self::with_config(memory, EngineConfig::default())
    }

    /// The store's own cap wins over `config.memory_cap`; a mismatch is
    /// logged. Use `in_memory` or build the store from the config to keep
    /// them aligned.
    pub fn with_config(memory: EventMemory, config: EngineConfig) -> Self {
        let config = config.validate();
        let store_cap = memory.store().capacity();
        if store_cap != config.memory_cap {
            warn!(
                "[emotion] {} store keeps {} entries per user, config asks for {}",
                memory.store().backend_name(),
                store_cap,
                config.memory_cap
            );
        }
        Self { memory, config }
    }

    /// Engine over an in-process store built from `config`.
    pub fn in_memory(config: EngineConfig) -> Self {
        let config = config.validate();
        Self::with_config(EventMemory::in_memory(&config), config)
    }

    pub fn memory(&self) -> &EventMemory {
        &self.memory
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process one event and return the per-kind deltas applied to `vector`.
    pub fn process_event(
        &self,
        user_id: &str,
        vector: &mut UserEmotionVector,
        event: &str,
        detected: EmotionKind,
        now: Timestamp,
    ) -> EngineResult<IntensityChanges> {
        Ok(self
            .process_event_detailed(user_id, vector, event, detected, now)?
            .changes)
    }

    /// Same as `process_event`, returning every intermediate factor.
    pub fn process_event_detailed(
        &self,
        user_id: &str,
        vector: &mut UserEmotionVector,
        event: &str,
        detected: EmotionKind,
        now: Timestamp,
    ) -> EngineResult<ProcessedEvent> {
        // ── Classify ─────────────────────────────────────────────────
        let category = classify_event(event).unwrap_or(self.config.unmatched_category);

        // ── Score ────────────────────────────────────────────────────
        let base_intensity = base_intensity(category, detected);

        // ── Modulate ─────────────────────────────────────────────────
        let repeat_count = self.memory.repeat_count(user_id, event)?;
        let fatigue = fatigue_factor(repeat_count);

        let long_absent = self.memory.is_long_absent(
            user_id,
            event,
            now,
            self.config.absence_threshold_days,
        )?;
        let first_time = repeat_count == 0;
        let surprise = if long_absent && (!first_time || self.config.first_occurrence_surprise) {
            self.config.surprise_factor
        } else {
            1.0
        };

        let final_intensity = base_intensity * fatigue * surprise;

        // ── Apply ────────────────────────────────────────────────────
        let changes = apply_category(vector, category, detected, final_intensity, now);

        // ── Record ───────────────────────────────────────────────────
        self.memory
            .record(user_id, event, detected, final_intensity, category, now)?;

        debug!(
            "[emotion] {} {} base={:.3} repeat={} fatigue={} surprise={} final={:.3}",
            user_id, category, base_intensity, repeat_count, fatigue, surprise, final_intensity
        );

        Ok(ProcessedEvent {
            category,
            base_intensity,
            repeat_count,
            fatigue_factor: fatigue,
            surprise_factor: surprise,
            final_intensity,
            changes,
        })
    }

    /// Decay-only pass over every tracked kind, independent of any event.
    pub fn apply_time_decay(&self, vector: &mut UserEmotionVector, now: Timestamp) {
        vector.apply_decay(now);
    }

    /// Re-apply the most recent remembered reaction matching `keyword` as a
    /// fresh update. Nothing new is written to event memory.
    pub fn replay(
        &self,
        user_id: &str,
        vector: &mut UserEmotionVector,
        keyword: &str,
        now: Timestamp,
    ) -> EngineResult<Option<EventMemoryEntry>> {
        let Some(entry) = self.memory.replay(user_id, keyword)? else {
            debug!("[emotion] No memory for {} matching {:?}", user_id, keyword);
            return Ok(None);
        };
        vector.update(entry.kind, entry.intensity, now);
        info!(
            "[emotion] Replayed {:?} for {} ({} +{:.3})",
            entry.event, user_id, entry.kind, entry.intensity
        );
        Ok(Some(entry))
    }

    /// Replay triggered by the message itself: a "last time" reference with a
    /// quoted phrase replays the latest memory matching that phrase.
    pub fn replay_from_text(
        &self,
        user_id: &str,
        vector: &mut UserEmotionVector,
        text: &str,
        now: Timestamp,
    ) -> EngineResult<Option<EventMemoryEntry>> {
        match replay_keyword(text) {
            Some(keyword) => self.replay(user_id, vector, keyword, now),
            None => Ok(None),
        }
    }

    /// Scheduled boost for anniversaries falling today. Returns the amount
    /// added to HAPPY (0 when `count` is 0, in which case nothing changes).
    pub fn apply_anniversary_boost(
        &self,
        vector: &mut UserEmotionVector,
        count: usize,
        now: Timestamp,
    ) -> f64 {
        if count == 0 {
            return 0.0;
        }
        let boost = count as f64 * ANNIVERSARY_BOOST_PER_EVENT;
        vector.update(EmotionKind::Happy, boost, now);
        boost
    }
}

/// Fixed base magnitude for a category; uncategorized events use the
/// detected kind's fallback.
pub fn base_intensity(category: EventCategory, detected: EmotionKind) -> f64 {
    match category {
        EventCategory::Praise => BASE_PRAISE,
        EventCategory::Apology => BASE_APOLOGY,
        EventCategory::Criticism => BASE_CRITICISM,
        EventCategory::Ignore => BASE_IGNORE,
        EventCategory::Need => BASE_NEED,
        EventCategory::Repeated | EventCategory::LongAbsent | EventCategory::Other => {
            detected.fallback_base_intensity()
        }
    }
}

/// Repetition dampening by prior occurrence count.
pub fn fatigue_factor(repeat_count: u64) -> f64 {
    match repeat_count {
        0 => 1.0,
        1 => 0.8,
        2 => 0.6,
        3..=5 => 0.4,
        _ => 0.2,
    }
}

fn apply_category(
    vector: &mut UserEmotionVector,
    category: EventCategory,
    detected: EmotionKind,
    intensity: f64,
    now: Timestamp,
) -> IntensityChanges {
    let mut changes = IntensityChanges::new();
    let mut apply = |kind: EmotionKind, delta: f64| {
        vector.update(kind, delta, now);
        changes.insert(kind, delta);
    };

    match category {
        EventCategory::Praise | EventCategory::Need => apply(EmotionKind::Happy, intensity),
        EventCategory::Apology => {
            apply(EmotionKind::Angry, -intensity);
            apply(EmotionKind::Happy, intensity * APOLOGY_HAPPY_SHARE);
        }
        EventCategory::Criticism => apply(EmotionKind::Angry, intensity),
        EventCategory::Ignore => apply(EmotionKind::Sad, intensity * IGNORE_SAD_SHARE),
        EventCategory::Repeated | EventCategory::LongAbsent | EventCategory::Other => {
            apply(detected, intensity)
        }
    }
    changes
}
