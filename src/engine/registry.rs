// ── Emotion: Per-User Registry ──────────────────────────────────────────────
//
// Owns one `UserEmotionVector` per user for hosts that serve many users
// concurrently. The map itself sits behind an RwLock and is only written when
// a user is first seen; each vector has its own Mutex, so updates for
// different users never contend and updates for one user are serialized.

use crate::atoms::types::{EmotionKind, Timestamp};
use crate::engine::vector::UserEmotionVector;
use log::info;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct EmotionRegistry {
    users: RwLock<HashMap<String, Arc<Mutex<UserEmotionVector>>>>,
}

impl EmotionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the user's vector, creating an empty one on first use.
    pub fn get_or_create(&self, user_id: &str) -> Arc<Mutex<UserEmotionVector>> {
        if let Some(existing) = self.users.read().get(user_id) {
            return Arc::clone(existing);
        }
        let mut users = self.users.write();
        Arc::clone(users.entry(user_id.to_string()).or_insert_with(|| {
            info!("[registry] Tracking new user {}", user_id);
            Arc::new(Mutex::new(UserEmotionVector::new(user_id)))
        }))
    }

    /// Run `f` with exclusive access to the user's vector.
    pub fn with_user<R>(&self, user_id: &str, f: impl FnOnce(&mut UserEmotionVector) -> R) -> R {
        let handle = self.get_or_create(user_id);
        let mut vector = handle.lock();
        f(&mut vector)
    }

    /// Replace (or seed) a user's vector, e.g. after loading it from storage.
    pub fn insert(&self, vector: UserEmotionVector) {
        let user_id = vector.user_id.clone();
        let mut users = self.users.write();
        match users.get(&user_id) {
            Some(existing) => *existing.lock() = vector,
            None => {
                users.insert(user_id, Arc::new(Mutex::new(vector)));
            }
        }
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.users.read().contains_key(user_id)
    }

    pub fn user_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.users.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }

    /// Dominant emotion for a known user; `None` for unknown users.
    pub fn dominant(&self, user_id: &str, now: Timestamp) -> Option<EmotionKind> {
        let handle = self.existing(user_id)?;
        let vector = handle.lock();
        vector.dominant(now)
    }

    /// Current intensity for a known user; 0 for unknown users or kinds.
    pub fn intensity(&self, user_id: &str, kind: EmotionKind, now: Timestamp) -> f64 {
        let Some(handle) = self.existing(user_id) else {
            return 0.0;
        };
        let vector = handle.lock();
        vector.intensity_of(kind, now)
    }

    /// Copy of a known user's vector.
    pub fn snapshot(&self, user_id: &str) -> Option<UserEmotionVector> {
        let handle = self.existing(user_id)?;
        let vector = handle.lock();
        Some(vector.clone())
    }

    /// Decay every tracked user's vector to `now`. Returns the user count.
    pub fn apply_time_decay_to_all(&self, now: Timestamp) -> usize {
        let handles: Vec<_> = self.users.read().values().cloned().collect();
        for handle in &handles {
            handle.lock().apply_decay(now);
        }
        handles.len()
    }

    fn existing(&self, user_id: &str) -> Option<Arc<Mutex<UserEmotionVector>>> {
        self.users.read().get(user_id).cloned()
    }
}
