// Emotion Engine — library root.
//
// Layering:
//   atoms   — pure data: constants, error type, shared enums and records
//   engine  — decaying state, event memory and its stores, the event pipeline,
//             per-user registry, display rendering
//
// Typical use:
//
//   let store = Arc::new(SqliteEmotionStore::open(&path, cap)?);
//   let engine = EmotionEngine::with_config(EventMemory::new(store), config);
//   registry.with_user(user, |v| engine.process_event(user, v, text, kind, now))?;

pub mod atoms;
pub mod engine;

pub use atoms::error::{EngineError, EngineResult};
pub use atoms::types::{EmotionKind, EventCategory, EventMemoryEntry, IntensityChanges, Timestamp};
pub use engine::classifier::{analyze_emotion, classify_event};
pub use engine::config::EngineConfig;
pub use engine::display::{render, EmotionSnapshot, Tone};
pub use engine::emotion_engine::{base_intensity, fatigue_factor, EmotionEngine, ProcessedEvent};
pub use engine::emotion_state::EmotionState;
pub use engine::memory::EventMemory;
pub use engine::registry::EmotionRegistry;
pub use engine::store::{EmotionMemoryStore, InMemoryEmotionStore, SqliteEmotionStore};
pub use engine::vector::UserEmotionVector;
