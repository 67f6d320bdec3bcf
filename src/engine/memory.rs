// ── Emotion: Event Memory ───────────────────────────────────────────────────
//
// Append-only, capped, per-user event log plus the per-text running indices
// (occurrence count, last-seen time) that drive fatigue and surprise.
// All persistence is delegated to an injected `EmotionMemoryStore`; any store
// failure is returned unchanged.

use crate::atoms::constants::{REPAIR_APOLOGY, REPAIR_NEED, REPAIR_PRAISE};
use crate::atoms::error::EngineResult;
use crate::atoms::types::{EmotionKind, EventCategory, EventMemoryEntry, Timestamp};
use crate::engine::config::EngineConfig;
use crate::engine::store::{EmotionMemoryStore, InMemoryEmotionStore};
use log::debug;
use std::sync::Arc;

#[derive(Clone)]
pub struct EventMemory {
    store: Arc<dyn EmotionMemoryStore>,
}

impl EventMemory {
    pub fn new(store: Arc<dyn EmotionMemoryStore>) -> Self {
        Self { store }
    }

    /// Memory over a fresh in-process store capped at `config.memory_cap`.
    pub fn in_memory(config: &EngineConfig) -> Self {
        Self::new(Arc::new(InMemoryEmotionStore::with_capacity(config.memory_cap)))
    }

    pub fn store(&self) -> &Arc<dyn EmotionMemoryStore> {
        &self.store
    }

    /// Append an entry and update the text's count and last-seen time as one
    /// unit.
    pub fn record(
        &self,
        user_id: &str,
        event: &str,
        kind: EmotionKind,
        intensity: f64,
        category: EventCategory,
        timestamp: Timestamp,
    ) -> EngineResult<()> {
        let entry = EventMemoryEntry::new(event, kind, intensity, category, timestamp);
        self.store.record(user_id, &entry)?;
        debug!(
            "[memory] Recorded {} event for {} via {} (kind={} intensity={:.3})",
            category,
            user_id,
            self.store.backend_name(),
            kind,
            intensity
        );
        Ok(())
    }

    /// Retained entries, oldest first.
    pub fn entries(&self, user_id: &str) -> EngineResult<Vec<EventMemoryEntry>> {
        self.store.list_entries(user_id)
    }

    /// How many times this exact text has been recorded, including entries
    /// that have since aged out of the capped log.
    pub fn repeat_count(&self, user_id: &str, event: &str) -> EngineResult<u64> {
        self.store.event_count(user_id, event)
    }

    pub fn last_seen(&self, user_id: &str, event: &str) -> EngineResult<Option<Timestamp>> {
        self.store.last_event_time(user_id, event)
    }

    /// True when the text was never seen, or last seen at least
    /// `threshold_days` whole days before `now`.
    pub fn is_long_absent(
        &self,
        user_id: &str,
        event: &str,
        now: Timestamp,
        threshold_days: i64,
    ) -> EngineResult<bool> {
        Ok(match self.last_seen(user_id, event)? {
            None => true,
            Some(last) => (now - last).num_days() >= threshold_days,
        })
    }

    /// Most recent entry whose text contains `keyword`, ignoring case.
    /// On equal timestamps the earliest-inserted entry wins.
    pub fn replay(&self, user_id: &str, keyword: &str) -> EngineResult<Option<EventMemoryEntry>> {
        let needle = keyword.to_lowercase();
        let mut best: Option<EventMemoryEntry> = None;
        for entry in self.entries(user_id)? {
            if !entry.event.to_lowercase().contains(&needle) {
                continue;
            }
            match &best {
                Some(b) if entry.timestamp <= b.timestamp => {}
                _ => best = Some(entry),
            }
        }
        Ok(best)
    }

    /// Signed magnitude a repair-type event is worth. Apologies carry a
    /// negative value (they reduce a negative emotion).
    pub fn repair_intensity(category: EventCategory) -> f64 {
        match category {
            EventCategory::Apology => REPAIR_APOLOGY,
            EventCategory::Praise => REPAIR_PRAISE,
            EventCategory::Need => REPAIR_NEED,
            EventCategory::Criticism
            | EventCategory::Ignore
            | EventCategory::Repeated
            | EventCategory::LongAbsent
            | EventCategory::Other => 0.0,
        }
    }
}
