use super::common::{in_memory_engine, sqlite_engine, t0};
use chrono::Duration;
use emotion_engine::{EmotionKind, SqliteEmotionStore, UserEmotionVector};

const SCRIPT: &[(&str, EmotionKind, i64)] = &[
    ("great job", EmotionKind::Happy, 0),
    ("that was bad", EmotionKind::Angry, 1),
    ("sorry", EmotionKind::Sad, 2),
    ("great job", EmotionKind::Happy, 3),
    ("just ignore me", EmotionKind::Sad, 30),
    ("great job", EmotionKind::Happy, 24 * 9),
    ("what a day", EmotionKind::Sad, 24 * 9 + 1),
];

#[test]
fn backends_produce_identical_state() {
    let a = in_memory_engine();
    let b = sqlite_engine();
    let mut va = UserEmotionVector::new("u");
    let mut vb = UserEmotionVector::new("u");

    for (text, kind, hours) in SCRIPT {
        let at = t0() + Duration::hours(*hours);
        let da = a.process_event("u", &mut va, text, *kind, at).unwrap();
        let db = b.process_event("u", &mut vb, text, *kind, at).unwrap();
        assert_eq!(da, db, "diverged on {text:?}");
    }
    assert_eq!(va, vb);
    assert_eq!(a.memory().entries("u").unwrap(), b.memory().entries("u").unwrap());
}

#[test]
fn vectors_survive_reopening_the_database() {
    let dir = std::env::temp_dir().join(format!("emotion-engine-it-{}", std::process::id()));
    let path = dir.join("emotions.db");
    let _ = std::fs::remove_dir_all(&dir);

    let mut v = UserEmotionVector::new("u");
    v.update(EmotionKind::Sad, 0.4, t0());
    {
        let store = SqliteEmotionStore::open(&path, 100).unwrap();
        store.save_vector(&v).unwrap();
    }
    let store = SqliteEmotionStore::open(&path, 100).unwrap();
    assert_eq!(store.load_vector("u").unwrap(), Some(v));
    assert_eq!(store.load_vector("nobody").unwrap(), None);

    drop(store);
    let _ = std::fs::remove_dir_all(&dir);
}
