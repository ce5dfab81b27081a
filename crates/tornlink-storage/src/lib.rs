//! tornlink-storage: In-memory state shared by every orchestrator invocation
//!
//! - [`MemoryStore`]: TTL cache keyed by resource
//! - [`RateTracker`]: rolling one-minute outbound request counter

pub mod memory;
pub mod rate;

pub use memory::{MemoryConfig, MemoryStore};
pub use rate::{RateTracker, RateWindow};
