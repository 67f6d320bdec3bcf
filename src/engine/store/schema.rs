// Database schema for the SQLite event store.
// Called once by SqliteEmotionStore::open*(). Every statement is
// CREATE … IF NOT EXISTS, so reopening an existing database is a no-op.

use crate::atoms::error::EngineResult;
use rusqlite::Connection;

pub(crate) fn run_migrations(conn: &Connection) -> EngineResult<()> {
    // ── Event log ────────────────────────────────────────────────────
    // `seq` is the insertion order; FIFO eviction deletes the lowest seq.
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS emotion_memories (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            event TEXT NOT NULL,
            emotion_kind TEXT NOT NULL,
            intensity REAL NOT NULL DEFAULT 0,
            category TEXT NOT NULL,
            timestamp TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_emotion_memories_user
            ON emotion_memories(user_id, seq);
        ",
    )?;

    // ── Per-event running stats ──────────────────────────────────────
    // Kept apart from the log so eviction never lowers a count.
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS emotion_event_stats (
            user_id TEXT NOT NULL,
            event TEXT NOT NULL,
            occurrences INTEGER NOT NULL DEFAULT 0,
            last_seen TEXT,
            PRIMARY KEY (user_id, event)
        );
        ",
    )?;

    // ── Persisted emotion vectors ────────────────────────────────────
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS emotion_vectors (
            user_id TEXT PRIMARY KEY,
            data TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;

    Ok(())
}
