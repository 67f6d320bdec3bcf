// ── Emotion: Engine Configuration ──────────────────────────────────────────
//
// Tunables read from an optional TOML file. Every field has a default, so an
// empty or missing file yields the stock behaviour. Out-of-range values are
// clamped by `validate()` rather than rejected.

use crate::atoms::constants::{
    DEFAULT_ABSENCE_THRESHOLD_DAYS, DEFAULT_MEMORY_CAP, DEFAULT_SURPRISE_FACTOR,
};
use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::types::EventCategory;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum retained event-log entries per user.
    pub memory_cap: usize,
    /// Whole days without an occurrence before an event counts as long-absent.
    pub absence_threshold_days: i64,
    /// Multiplier applied to long-absent events.
    pub surprise_factor: f64,
    /// Whether a never-seen event gets the surprise multiplier.
    pub first_occurrence_surprise: bool,
    /// Category used when no keyword rule matches the event text.
    pub unmatched_category: EventCategory,
    /// Database location override for the durable store.
    pub db_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            memory_cap: DEFAULT_MEMORY_CAP,
            absence_threshold_days: DEFAULT_ABSENCE_THRESHOLD_DAYS,
            surprise_factor: DEFAULT_SURPRISE_FACTOR,
            first_occurrence_surprise: true,
            unmatched_category: EventCategory::Praise,
            db_path: None,
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document and clamp the result.
    pub fn from_toml_str(content: &str) -> EngineResult<Self> {
        let parsed: EngineConfig = toml::from_str(content)?;
        Ok(parsed.validate())
    }

    /// Load from `path`. A missing file yields defaults; an unreadable or
    /// malformed file is an error.
    pub fn load(path: &Path) -> EngineResult<Self> {
        if !path.exists() {
            info!("[config] No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            EngineError::Config(msg) => EngineError::config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Clamp every field into its usable range.
    pub fn validate(mut self) -> Self {
        let defaults = Self::default();
        if self.memory_cap == 0 {
            warn!("[config] memory_cap = 0 is unusable, raising to 1");
            self.memory_cap = 1;
        }
        if self.absence_threshold_days < 0 {
            warn!(
                "[config] negative absence_threshold_days ({}), using {}",
                self.absence_threshold_days, defaults.absence_threshold_days
            );
            self.absence_threshold_days = defaults.absence_threshold_days;
        }
        if !self.surprise_factor.is_finite() || self.surprise_factor < 0.0 {
            warn!(
                "[config] invalid surprise_factor ({}), using {}",
                self.surprise_factor, defaults.surprise_factor
            );
            self.surprise_factor = defaults.surprise_factor;
        }
        self
    }

    /// Effective database path: the override, else the platform default.
    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(crate::engine::paths::engine_db_path)
    }
}
