//! Durable storage module
//!
//! A small key/value port standing in for browser local storage, plus the
//! helpers that encode the countdown and readout entries.

pub mod durable;
pub mod file_store;
pub mod persisted;

// Re-export main types
pub use durable::{DurableStore, MemoryStore};
pub use file_store::FileStore;
pub use persisted::{PersistedTimer, TimerEntry};
