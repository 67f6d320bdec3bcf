// ── Store: SQLite Backend ───────────────────────────────────────────────────
//
// Durable event memory over rusqlite. One connection behind a parking_lot
// Mutex; every trait call holds the lock for its whole duration, and
// `record` additionally runs inside a transaction so the append, the count
// bump and the last-seen update commit together.
//
// Also persists whole `UserEmotionVector`s as JSON so a process that only
// lives for one request (the CLI) can carry affect across invocations.

use super::{schema, EmotionMemoryStore};
use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::types::{EmotionKind, EventCategory, EventMemoryEntry, Timestamp};
use crate::engine::config::EngineConfig;
use crate::engine::vector::UserEmotionVector;
use chrono::{DateTime, Utc};
use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const BACKEND: &str = "sqlite";

/// Thread-safe SQLite event store.
pub struct SqliteEmotionStore {
    /// `pub` for integration tests that need to inspect raw rows.
    pub conn: Mutex<Connection>,
    capacity: usize,
}

impl SqliteEmotionStore {
    /// Open (or create) the database at `path` and run migrations.
    pub fn open(path: impl AsRef<Path>, capacity: usize) -> EngineResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        info!("[store] Opening emotion store at {:?}", path);

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;").ok();
        Self::from_connection(conn, capacity)
    }

    /// Fresh private in-memory database, used by tests and the bench.
    pub fn open_in_memory(capacity: usize) -> EngineResult<Self> {
        Self::from_connection(Connection::open_in_memory()?, capacity)
    }

    fn from_connection(conn: Connection, capacity: usize) -> EngineResult<Self> {
        schema::run_migrations(&conn)?;
        Ok(SqliteEmotionStore {
            conn: Mutex::new(conn),
            capacity: capacity.max(1),
        })
    }

    /// Open the database the config points at, capped at `memory_cap`.
    pub fn from_config(config: &EngineConfig) -> EngineResult<Self> {
        Self::open(config.resolved_db_path(), config.memory_cap)
    }

    // ── Vector persistence ─────────────────────────────────────────────

    pub fn save_vector(&self, vector: &UserEmotionVector) -> EngineResult<()> {
        let data = serde_json::to_string(vector)?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO emotion_vectors (user_id, data, updated_at)
             VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(user_id) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
            params![vector.user_id, data],
        )?;
        debug!("[store] Saved vector for {} ({} kinds)", vector.user_id, vector.len());
        Ok(())
    }

    pub fn load_vector(&self, user_id: &str) -> EngineResult<Option<UserEmotionVector>> {
        let conn = self.conn.lock();
        let data: Option<String> = conn
            .query_row(
                "SELECT data FROM emotion_vectors WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        match data {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

// ── Statement helpers (shared by the plain calls and the transaction) ──────

fn insert_entry(conn: &Connection, user_id: &str, entry: &EventMemoryEntry, cap: usize) -> EngineResult<()> {
    conn.execute(
        "INSERT INTO emotion_memories (user_id, event, emotion_kind, intensity, category, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user_id,
            entry.event,
            entry.kind.as_str(),
            entry.intensity,
            entry.category.as_str(),
            entry.timestamp.to_rfc3339(),
        ],
    )?;
    let evicted = conn.execute(
        "DELETE FROM emotion_memories
         WHERE user_id = ?1 AND seq NOT IN (
             SELECT seq FROM emotion_memories WHERE user_id = ?1 ORDER BY seq DESC LIMIT ?2
         )",
        params![user_id, cap as i64],
    )?;
    if evicted > 0 {
        debug!("[store] Evicted {} oldest entries for {}", evicted, user_id);
    }
    Ok(())
}

fn bump_count(conn: &Connection, user_id: &str, event: &str) -> EngineResult<()> {
    conn.execute(
        "INSERT INTO emotion_event_stats (user_id, event, occurrences) VALUES (?1, ?2, 1)
         ON CONFLICT(user_id, event) DO UPDATE SET occurrences = occurrences + 1",
        params![user_id, event],
    )?;
    Ok(())
}

fn stamp_last_seen(conn: &Connection, user_id: &str, event: &str, at: Timestamp) -> EngineResult<()> {
    conn.execute(
        "INSERT INTO emotion_event_stats (user_id, event, occurrences, last_seen) VALUES (?1, ?2, 0, ?3)
         ON CONFLICT(user_id, event) DO UPDATE SET last_seen = excluded.last_seen",
        params![user_id, event, at.to_rfc3339()],
    )?;
    Ok(())
}

fn parse_timestamp(raw: &str) -> EngineResult<Timestamp> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| EngineError::storage(BACKEND, format!("bad timestamp {:?}: {}", raw, e)))
}

impl EmotionMemoryStore for SqliteEmotionStore {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    fn add_entry(&self, user_id: &str, entry: &EventMemoryEntry) -> EngineResult<()> {
        let conn = self.conn.lock();
        insert_entry(&conn, user_id, entry, self.capacity)
    }

    fn list_entries(&self, user_id: &str) -> EngineResult<Vec<EventMemoryEntry>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT event, emotion_kind, intensity, category, timestamp FROM emotion_memories
             WHERE user_id = ?1 ORDER BY seq ASC",
        )?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(event, kind, intensity, category, ts)| -> EngineResult<EventMemoryEntry> {
                Ok(EventMemoryEntry {
                    event,
                    kind: kind.parse::<EmotionKind>().unwrap_or(EmotionKind::Neutral),
                    intensity,
                    category: category.parse::<EventCategory>().unwrap_or(EventCategory::Other),
                    timestamp: parse_timestamp(&ts)?,
                })
            })
            .collect()
    }

    fn increment_event_count(&self, user_id: &str, event: &str) -> EngineResult<()> {
        let conn = self.conn.lock();
        bump_count(&conn, user_id, event)
    }

    fn event_count(&self, user_id: &str, event: &str) -> EngineResult<u64> {
        let conn = self.conn.lock();
        let count: Option<i64> = conn
            .query_row(
                "SELECT occurrences FROM emotion_event_stats WHERE user_id = ?1 AND event = ?2",
                params![user_id, event],
                |row| row.get(0),
            )
            .optional()?;
        Ok(count.unwrap_or(0).max(0) as u64)
    }

    fn set_last_event_time(&self, user_id: &str, event: &str, at: Timestamp) -> EngineResult<()> {
        let conn = self.conn.lock();
        stamp_last_seen(&conn, user_id, event, at)
    }

    fn last_event_time(&self, user_id: &str, event: &str) -> EngineResult<Option<Timestamp>> {
        let conn = self.conn.lock();
        let raw: Option<Option<String>> = conn
            .query_row(
                "SELECT last_seen FROM emotion_event_stats WHERE user_id = ?1 AND event = ?2",
                params![user_id, event],
                |row| row.get(0),
            )
            .optional()?;
        raw.flatten().map(|s| parse_timestamp(&s)).transpose()
    }

    fn record(&self, user_id: &str, entry: &EventMemoryEntry) -> EngineResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        insert_entry(&tx, user_id, entry, self.capacity)?;
        bump_count(&tx, user_id, &entry.event)?;
        stamp_last_seen(&tx, user_id, &entry.event, entry.timestamp)?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 11, 10, 12, 0, 0).unwrap()
    }

    fn entry(text: &str, minutes: i64) -> EventMemoryEntry {
        EventMemoryEntry::new(
            text,
            EmotionKind::Sad,
            0.25,
            EventCategory::Ignore,
            t0() + Duration::minutes(minutes),
        )
    }

    #[test]
    fn record_round_trips_entries() {
        let store = SqliteEmotionStore::open_in_memory(10).unwrap();
        store.record("u", &entry("nobody answered", 0)).unwrap();

        let rows = store.list_entries("u").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], entry("nobody answered", 0));
        assert_eq!(store.event_count("u", "nobody answered").unwrap(), 1);
        assert_eq!(store.last_event_time("u", "nobody answered").unwrap(), Some(t0()));
    }

    #[test]
    fn cap_evicts_oldest_rows_but_not_counts() {
        let store = SqliteEmotionStore::open_in_memory(2).unwrap();
        store.record("u", &entry("a", 0)).unwrap();
        store.record("u", &entry("b", 1)).unwrap();
        store.record("u", &entry("c", 2)).unwrap();

        let texts: Vec<String> = store.list_entries("u").unwrap().into_iter().map(|e| e.event).collect();
        assert_eq!(texts, vec!["b", "c"]);
        assert_eq!(store.event_count("u", "a").unwrap(), 1);
    }

    #[test]
    fn cap_is_per_user() {
        let store = SqliteEmotionStore::open_in_memory(1).unwrap();
        store.record("u1", &entry("a", 0)).unwrap();
        store.record("u2", &entry("b", 0)).unwrap();
        assert_eq!(store.list_entries("u1").unwrap().len(), 1);
        assert_eq!(store.list_entries("u2").unwrap().len(), 1);
    }

    #[test]
    fn unknown_event_has_no_stats() {
        let store = SqliteEmotionStore::open_in_memory(5).unwrap();
        assert_eq!(store.event_count("u", "x").unwrap(), 0);
        assert_eq!(store.last_event_time("u", "x").unwrap(), None);
    }

    #[test]
    fn separate_calls_match_record() {
        let store = SqliteEmotionStore::open_in_memory(5).unwrap();
        let e = entry("help me", 3);
        store.add_entry("u", &e).unwrap();
        store.increment_event_count("u", &e.event).unwrap();
        store.set_last_event_time("u", &e.event, e.timestamp).unwrap();
        store.increment_event_count("u", &e.event).unwrap();

        assert_eq!(store.event_count("u", "help me").unwrap(), 2);
        assert_eq!(store.last_event_time("u", "help me").unwrap(), Some(e.timestamp));
    }

    #[test]
    fn corrupt_timestamp_surfaces_storage_error() {
        let store = SqliteEmotionStore::open_in_memory(5).unwrap();
        store
            .conn
            .lock()
            .execute(
                "INSERT INTO emotion_memories (user_id, event, emotion_kind, intensity, category, timestamp)
                 VALUES ('u', 'x', 'HAPPY', 0.1, 'praise', 'yesterday-ish')",
                [],
            )
            .unwrap();
        let err = store.list_entries("u").unwrap_err();
        assert!(matches!(err, EngineError::Storage { .. }), "got {err}");
    }

    #[test]
    fn vectors_persist() {
        let store = SqliteEmotionStore::open_in_memory(5).unwrap();
        assert!(store.load_vector("u").unwrap().is_none());

        let mut v = UserEmotionVector::new("u");
        v.update(EmotionKind::Happy, 0.6, t0());
        store.save_vector(&v).unwrap();
        v.update(EmotionKind::Angry, 0.2, t0());
        store.save_vector(&v).unwrap();

        assert_eq!(store.load_vector("u").unwrap(), Some(v));
    }

    #[test]
    fn failed_record_rolls_back_the_append() {
        let store = SqliteEmotionStore::open_in_memory(5).unwrap();
        store.record("u", &entry("hello", 0)).unwrap();

        // make the count bump (second statement) fail
        store
            .conn
            .lock()
            .execute_batch("ALTER TABLE emotion_event_stats RENAME TO emotion_event_stats_off")
            .unwrap();
        let err = store.record("u", &entry("hello", 1)).unwrap_err();
        assert!(matches!(err, EngineError::Database(_)), "got {err}");
        store
            .conn
            .lock()
            .execute_batch("ALTER TABLE emotion_event_stats_off RENAME TO emotion_event_stats")
            .unwrap();

        assert_eq!(store.list_entries("u").unwrap(), vec![entry("hello", 0)]);
        assert_eq!(store.event_count("u", "hello").unwrap(), 1);
        assert_eq!(store.last_event_time("u", "hello").unwrap(), Some(t0()));
    }
}
