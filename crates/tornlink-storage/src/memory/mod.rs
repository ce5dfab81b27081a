//! In-memory TTL store

mod store;

pub use store::{MemoryConfig, MemoryStore};
