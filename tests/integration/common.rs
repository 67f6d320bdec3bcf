use chrono::{TimeZone, Utc};
use emotion_engine::{
    EmotionEngine, EmotionMemoryStore, EngineConfig, EventMemory, InMemoryEmotionStore,
    SqliteEmotionStore, Timestamp,
};
use std::sync::Arc;

pub fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 11, 10, 12, 0, 0).unwrap()
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

pub fn in_memory_engine() -> EmotionEngine {
    engine_over(Arc::new(InMemoryEmotionStore::new()))
}

pub fn sqlite_engine() -> EmotionEngine {
    engine_over(Arc::new(SqliteEmotionStore::open_in_memory(100).unwrap()))
}

pub fn engine_over(store: Arc<dyn EmotionMemoryStore>) -> EmotionEngine {
    EmotionEngine::with_config(EventMemory::new(store), EngineConfig::default())
}
