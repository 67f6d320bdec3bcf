// Emotion Engine — per-user affective state driven by conversational events.
// Events are classified, scored, modulated by repetition and absence, applied
// to a decaying emotion vector and remembered in a pluggable event store.

pub mod classifier;
pub mod config;
pub mod display;
pub mod emotion_engine;
pub mod emotion_state;
pub mod memory;
pub mod paths;
pub mod registry;
pub mod store;
pub mod vector;
