use super::common::{approx, in_memory_engine, t0};
use chrono::Duration;
use emotion_engine::{
    render, EmotionKind, EmotionMemoryStore, EngineError, EngineResult, EventCategory,
    EventMemoryEntry, EmotionEngine, EventMemory, Timestamp, Tone, UserEmotionVector,
};
use std::sync::Arc;

#[test]
fn praise_repeat_and_decay_scenario() {
    let engine = in_memory_engine();
    let mut v = UserEmotionVector::new("u1");

    engine
        .process_event("u1", &mut v, "great!", EmotionKind::Happy, t0())
        .unwrap();
    assert!(approx(v.intensity_of(EmotionKind::Happy, t0()), 0.6));

    let later = t0() + Duration::hours(1);
    engine
        .process_event("u1", &mut v, "great!", EmotionKind::Happy, later)
        .unwrap();
    assert!(approx(v.intensity_of(EmotionKind::Happy, later), 0.79));
    assert_eq!(v.dominant(later), Some(EmotionKind::Happy));

    let snap = render(&v, later);
    assert_eq!(snap.primary, EmotionKind::Happy);
    assert_eq!(snap.tone, Tone::Friendly);
}

#[test]
fn anger_builds_then_apology_repairs() {
    let engine = in_memory_engine();
    let mut v = UserEmotionVector::new("u1");

    engine
        .process_event("u1", &mut v, "this is wrong", EmotionKind::Angry, t0())
        .unwrap();
    assert_eq!(v.dominant(t0()), Some(EmotionKind::Angry));

    let later = t0() + Duration::minutes(5);
    engine
        .process_event("u1", &mut v, "sorry about that", EmotionKind::Neutral, later)
        .unwrap();
    // 0.8 anger − 0.4 apology; happy +0.2
    assert!(approx(v.intensity_of(EmotionKind::Angry, later), 0.4));
    assert!(approx(v.intensity_of(EmotionKind::Happy, later), 0.2));
}

#[test]
fn replay_after_a_day() {
    let engine = in_memory_engine();
    engine
        .memory()
        .record(
            "u3",
            "用户说你好棒",
            EmotionKind::Happy,
            0.6,
            EventCategory::Praise,
            t0() - Duration::days(1),
        )
        .unwrap();

    let mut v = UserEmotionVector::new("u3");
    let hit = engine.replay("u3", &mut v, "你好棒", t0()).unwrap();
    assert!(hit.is_some());

    let snap = render(&v, t0());
    assert_eq!(snap.primary, EmotionKind::Happy);
    assert_eq!(snap.intensity, 0.6);
}

#[test]
fn decay_to_zero_leaves_no_dominant() {
    let engine = in_memory_engine();
    let mut v = UserEmotionVector::new("u1");
    engine
        .process_event("u1", &mut v, "need a hand", EmotionKind::Neutral, t0())
        .unwrap();
    let much_later = t0() + Duration::days(30);
    engine.apply_time_decay(&mut v, much_later);
    assert_eq!(v.dominant(much_later), None);
    assert_eq!(render(&v, much_later).primary, EmotionKind::Neutral);
}

struct BrokenStore;

impl EmotionMemoryStore for BrokenStore {
    fn backend_name(&self) -> &'static str {
        "broken"
    }
    fn capacity(&self) -> usize {
        1
    }
    fn add_entry(&self, _: &str, _: &EventMemoryEntry) -> EngineResult<()> {
        Err(EngineError::storage("broken", "disk full"))
    }
    fn list_entries(&self, _: &str) -> EngineResult<Vec<EventMemoryEntry>> {
        Ok(Vec::new())
    }
    fn increment_event_count(&self, _: &str, _: &str) -> EngineResult<()> {
        Ok(())
    }
    fn event_count(&self, _: &str, _: &str) -> EngineResult<u64> {
        Ok(0)
    }
    fn set_last_event_time(&self, _: &str, _: &str, _: Timestamp) -> EngineResult<()> {
        Ok(())
    }
    fn last_event_time(&self, _: &str, _: &str) -> EngineResult<Option<Timestamp>> {
        Ok(None)
    }
}

#[test]
fn store_failures_propagate_unchanged() {
    let engine = EmotionEngine::new(EventMemory::new(Arc::new(BrokenStore)));
    let mut v = UserEmotionVector::new("u1");
    let err = engine
        .process_event("u1", &mut v, "great", EmotionKind::Happy, t0())
        .unwrap_err();
    match err {
        EngineError::Storage { backend, message } => {
            assert_eq!(backend, "broken");
            assert_eq!(message, "disk full");
        }
        other => panic!("unexpected error: {other}"),
    }
}
