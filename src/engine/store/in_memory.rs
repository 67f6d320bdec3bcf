// ── Store: In-Memory Backend ────────────────────────────────────────────────
//
// Volatile event memory. Each user owns one slot (entry ring + counters)
// behind its own parking_lot Mutex, so unrelated users never contend; the
// outer RwLock is only written when a user's slot is first created.
// The log is a bounded VecDeque: push to the back, evict from the front.

use super::EmotionMemoryStore;
use crate::atoms::constants::DEFAULT_MEMORY_CAP;
use crate::atoms::error::EngineResult;
use crate::atoms::types::{EventMemoryEntry, Timestamp};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

#[derive(Default)]
struct UserSlot {
    entries: VecDeque<EventMemoryEntry>,
    counts: HashMap<String, u64>,
    last_seen: HashMap<String, Timestamp>,
}

impl UserSlot {
    fn push(&mut self, entry: EventMemoryEntry, cap: usize) {
        self.entries.push_back(entry);
        while self.entries.len() > cap {
            self.entries.pop_front();
        }
    }
}

pub struct InMemoryEmotionStore {
    users: RwLock<HashMap<String, Arc<Mutex<UserSlot>>>>,
    /// Maximum retained entries per user.
    capacity: usize,
}

impl Default for InMemoryEmotionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEmotionStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CAP)
    }

    /// Create a store retaining at most `capacity` entries per user (min 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    fn existing(&self, user_id: &str) -> Option<Arc<Mutex<UserSlot>>> {
        self.users.read().get(user_id).cloned()
    }

    fn slot(&self, user_id: &str) -> Arc<Mutex<UserSlot>> {
        if let Some(slot) = self.existing(user_id) {
            return slot;
        }
        self.users
            .write()
            .entry(user_id.to_string())
            .or_default()
            .clone()
    }
}

impl EmotionMemoryStore for InMemoryEmotionStore {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn add_entry(&self, user_id: &str, entry: &EventMemoryEntry) -> EngineResult<()> {
        self.slot(user_id).lock().push(entry.clone(), self.capacity);
        Ok(())
    }

    fn list_entries(&self, user_id: &str) -> EngineResult<Vec<EventMemoryEntry>> {
        let Some(slot) = self.existing(user_id) else {
            return Ok(Vec::new());
        };
        let guard = slot.lock();
        Ok(guard.entries.iter().cloned().collect())
    }

    fn increment_event_count(&self, user_id: &str, event: &str) -> EngineResult<()> {
        let slot = self.slot(user_id);
        *slot.lock().counts.entry(event.to_string()).or_insert(0) += 1;
        Ok(())
    }

    fn event_count(&self, user_id: &str, event: &str) -> EngineResult<u64> {
        let Some(slot) = self.existing(user_id) else {
            return Ok(0);
        };
        let guard = slot.lock();
        Ok(guard.counts.get(event).copied().unwrap_or(0))
    }

    fn set_last_event_time(&self, user_id: &str, event: &str, at: Timestamp) -> EngineResult<()> {
        self.slot(user_id)
            .lock()
            .last_seen
            .insert(event.to_string(), at);
        Ok(())
    }

    fn last_event_time(&self, user_id: &str, event: &str) -> EngineResult<Option<Timestamp>> {
        let Some(slot) = self.existing(user_id) else {
            return Ok(None);
        };
        let guard = slot.lock();
        Ok(guard.last_seen.get(event).copied())
    }

    fn record(&self, user_id: &str, entry: &EventMemoryEntry) -> EngineResult<()> {
        let slot = self.slot(user_id);
        let mut guard = slot.lock();
        *guard.counts.entry(entry.event.clone()).or_insert(0) += 1;
        guard.last_seen.insert(entry.event.clone(), entry.timestamp);
        guard.push(entry.clone(), self.capacity);
        Ok(())
    }
}
