use super::common::{in_memory_engine, sqlite_engine, t0};
use chrono::Duration;
use emotion_engine::{EmotionEngine, EmotionKind, UserEmotionVector};

fn flood(engine: &EmotionEngine) {
    let mut v = UserEmotionVector::new("u");
    for i in 0..150 {
        let text = if i % 2 == 0 {
            "great".to_string()
        } else {
            format!("event {i}")
        };
        engine
            .process_event("u", &mut v, &text, EmotionKind::Happy, t0() + Duration::seconds(i))
            .unwrap();
    }
}

fn assert_capped(engine: &EmotionEngine) {
    let entries = engine.memory().entries("u").unwrap();
    assert_eq!(entries.len(), 100);
    // the 50 oldest were evicted, order preserved
    assert_eq!(entries[0].timestamp, t0() + Duration::seconds(50));
    assert_eq!(entries[99].timestamp, t0() + Duration::seconds(149));
    // running counts survive eviction
    assert_eq!(engine.memory().repeat_count("u", "great").unwrap(), 75);
    assert_eq!(engine.memory().repeat_count("u", "event 1").unwrap(), 1);
}

#[test]
fn in_memory_log_is_capped_fifo() {
    let engine = in_memory_engine();
    flood(&engine);
    assert_capped(&engine);
}

#[test]
fn sqlite_log_is_capped_fifo() {
    let engine = sqlite_engine();
    flood(&engine);
    assert_capped(&engine);
}
