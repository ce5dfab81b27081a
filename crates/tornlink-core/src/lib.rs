//! tornlink-core: Core traits and types for the tornlink API client
//!
//! This crate provides the foundational types shared by the storage, HTTP
//! and orchestration crates: the error taxonomy, the injectable clock,
//! resource keys and the canonical snapshot records.

mod clock;
mod error;
mod traits;
mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ApiError, FailureKind, Result};
pub use traits::*;
pub use types::*;
