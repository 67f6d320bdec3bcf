// Emotion Engine — Event Memory Storage
// The storage contract behind EventMemory, plus the two shipped backends.
//
// Module layout:
//   in_memory — per-user slots behind parking_lot locks, FIFO VecDeque log
//   sqlite    — rusqlite-backed durable store (entries, stats, vectors)
//   schema    — idempotent migrations for the SQLite backend
//
// Contract notes:
//   • Entries come back oldest first.
//   • Occurrence counts are running totals; evicting a log row never
//     decrements them.
//   • `record` must be observed atomically per user: a reader never sees the
//     counter bumped without the entry appended, or vice versa.
//   • Every method may fail with a storage error; callers propagate it.

use crate::atoms::error::EngineResult;
use crate::atoms::types::{EventMemoryEntry, Timestamp};

mod in_memory;
mod schema;
mod sqlite;

pub use in_memory::InMemoryEmotionStore;
pub use sqlite::SqliteEmotionStore;

/// Storage backend for per-user event memory.
pub trait EmotionMemoryStore: Send + Sync {
    /// Short backend name for logs and error messages.
    fn backend_name(&self) -> &'static str;

    /// Maximum retained log entries per user.
    fn capacity(&self) -> usize;

    /// Append an entry to the user's log, evicting the oldest past the cap.
    fn add_entry(&self, user_id: &str, entry: &EventMemoryEntry) -> EngineResult<()>;

    /// The user's retained entries, oldest first.
    fn list_entries(&self, user_id: &str) -> EngineResult<Vec<EventMemoryEntry>>;

    fn increment_event_count(&self, user_id: &str, event: &str) -> EngineResult<()>;

    /// Number of times `event` was recorded for the user (0 if never).
    fn event_count(&self, user_id: &str, event: &str) -> EngineResult<u64>;

    fn set_last_event_time(&self, user_id: &str, event: &str, at: Timestamp) -> EngineResult<()>;

    fn last_event_time(&self, user_id: &str, event: &str) -> EngineResult<Option<Timestamp>>;

    /// Append + count + last-seen as one unit.
    ///
    /// The default runs the three calls in order and is only atomic if the
    /// backend serialises them some other way; shipped backends override it.
    fn record(&self, user_id: &str, entry: &EventMemoryEntry) -> EngineResult<()> {
        self.add_entry(user_id, entry)?;
        self.increment_event_count(user_id, &entry.event)?;
        self.set_last_event_time(user_id, &entry.event, entry.timestamp)
    }
}
