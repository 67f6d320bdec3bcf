// ── Emotion Atoms: Constants ───────────────────────────────────────────────
// All named tuning constants for the crate live here.
// Changing any value here changes observable intensities, so the unit tests
// in engine/ pin most of them.

// ── Event memory retention ─────────────────────────────────────────────────
// Per-user entry log is capped; the oldest entry is evicted first.
// Occurrence counters are NOT bounded by this cap.
pub const DEFAULT_MEMORY_CAP: usize = 100;

// ── Surprise (long-absence amplification) ──────────────────────────────────
pub const DEFAULT_ABSENCE_THRESHOLD_DAYS: i64 = 7;
pub const DEFAULT_SURPRISE_FACTOR: f64 = 2.0;

// ── Per-kind default decay rates (intensity lost per whole hour) ──────────
pub const DECAY_RATE_HAPPY: f64 = 0.05; // fades over days
pub const DECAY_RATE_ANGRY: f64 = 0.03; // lingers for a week or more
pub const DECAY_RATE_SAD: f64 = 0.1;
pub const DECAY_RATE_NEUTRAL: f64 = 1.0;
pub const DECAY_RATE_EMERGENCY: f64 = 0.5;

// ── Per-category base magnitudes ───────────────────────────────────────────
pub const BASE_PRAISE: f64 = 0.3;
pub const BASE_APOLOGY: f64 = 0.2;
pub const BASE_CRITICISM: f64 = 0.4;
pub const BASE_IGNORE: f64 = 0.2;
pub const BASE_NEED: f64 = 0.25;

// Fallback magnitudes for uncategorized events, keyed by detected kind.
pub const BASE_OTHER_HAPPY: f64 = 0.2;
pub const BASE_OTHER_ANGRY: f64 = 0.3;
pub const BASE_OTHER_SAD: f64 = 0.25;
pub const BASE_OTHER_DEFAULT: f64 = 0.1;

// ── Category application ratios ────────────────────────────────────────────
/// Share of an apology's magnitude that also lands on HAPPY.
pub const APOLOGY_HAPPY_SHARE: f64 = 0.5;
/// Share of an ignore event's magnitude that lands on SAD.
pub const IGNORE_SAD_SHARE: f64 = 0.5;

// ── Repair lookup ──────────────────────────────────────────────────────────
pub const REPAIR_APOLOGY: f64 = -0.3;
pub const REPAIR_PRAISE: f64 = 0.2;
pub const REPAIR_NEED: f64 = 0.15;

// ── Scheduled boosts ───────────────────────────────────────────────────────
/// HAPPY added per anniversary falling on the current day.
pub const ANNIVERSARY_BOOST_PER_EVENT: f64 = 0.3;

// ── Display thresholds ─────────────────────────────────────────────────────
pub const TONE_STRONG_THRESHOLD: f64 = 0.8;
pub const TONE_MODERATE_THRESHOLD: f64 = 0.5;
pub const TONE_MILD_THRESHOLD: f64 = 0.2;
