//! Runtime keyword learning and its persistence

pub mod persistence;
pub mod store;

pub use persistence::{JsonFileStore, KeyValueStore, MemoryStore};
pub use store::{FlushPolicy, LearnedKeywordStore};
