// engine/paths.rs — Default on-disk locations.
// Everything lives under one per-user data directory so the CLI and any
// embedding service share the same database unless told otherwise.

use std::path::PathBuf;

const APP_DIR: &str = "emotion-engine";

/// Per-user data directory, falling back to the working directory when the
/// platform reports none.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Path to the engine's SQLite database.
pub fn engine_db_path() -> PathBuf {
    data_dir().join("emotions.db")
}

/// Path to the optional TOML configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}
