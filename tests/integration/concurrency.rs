use super::common::{in_memory_engine, sqlite_engine, t0};
use emotion_engine::{EmotionEngine, EmotionKind, EmotionRegistry};
use std::sync::Arc;
use std::thread;

fn hammer(engine: EmotionEngine) {
    let engine = Arc::new(engine);
    let registry = Arc::new(EmotionRegistry::new());

    let workers: Vec<_> = (0..8)
        .map(|n| {
            let engine = Arc::clone(&engine);
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let user = format!("user-{}", n % 4);
                for _ in 0..25 {
                    registry
                        .with_user(&user, |v| {
                            engine.process_event(&user, v, "good job", EmotionKind::Happy, t0())
                        })
                        .unwrap();
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }

    assert_eq!(registry.len(), 4);
    for n in 0..4 {
        let user = format!("user-{n}");
        // two threads per user, 25 events each
        assert_eq!(engine.memory().repeat_count(&user, "good job").unwrap(), 50);
        assert_eq!(engine.memory().entries(&user).unwrap().len(), 50);
        assert_eq!(registry.dominant(&user, t0()), Some(EmotionKind::Happy));
    }
}

#[test]
fn concurrent_users_with_in_memory_store() {
    hammer(in_memory_engine());
}

#[test]
fn concurrent_users_with_sqlite_store() {
    hammer(sqlite_engine());
}
