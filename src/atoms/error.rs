// ── Emotion Atoms: Error Types ─────────────────────────────────────────────
// Single canonical error enum for the engine, built with `thiserror`.
//
// Design rules:
//   • Variants are coarse-grained by domain (I/O, DB, Config, Storage…).
//   • The `#[from]` attribute wires std/external error conversions automatically.
//   • Business logic never constructs an error: malformed numbers are clamped
//     and unknown names fall back to defaults. Only the storage layer and
//     configuration loading can fail.
//   • Store failures reach the caller unchanged; nothing here retries.

use thiserror::Error;

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EngineError {
    /// Filesystem or OS-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// SQLite / rusqlite database failure.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Engine configuration is invalid or unreadable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure inside an injected event store that is not a database error
    /// (remote backend, corrupted row, etc.).
    #[error("Storage error: {backend}: {message}")]
    Storage { backend: String, message: String },
}

// ── Convenience constructors ───────────────────────────────────────────────

impl EngineError {
    /// Create a storage error with backend name and message.
    pub fn storage(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage { backend: backend.into(), message: message.into() }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(e: toml::de::Error) -> Self {
        EngineError::Config(e.to_string())
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

/// All fallible engine operations return this type.
pub type EngineResult<T> = Result<T, EngineError>;
