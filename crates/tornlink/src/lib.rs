//! tornlink: caching, coalescing client for the Torn game API
//!
//! # Features
//!
//! - **Per-resource TTL cache** with an injectable clock
//! - **Request coalescing**: missing resources served by the same endpoint
//!   share one request
//! - **Bounded concurrent fetching** with per-request timeouts and partial
//!   results instead of errors
//! - **v1/v2 schema normalization** into one canonical record per resource
//! - **Requests-per-minute tracking** for diagnostics
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tornlink::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::connect(StaticCredential::new("your-key"), ClientConfig::default())?;
//!
//!     let snapshot = client.profile_overview().await;
//!     match snapshot.user() {
//!         Some(user) => println!("{} has {} energy", user.name, user.energy.current),
//!         None => println!("profile unavailable"),
//!     }
//!     println!("{} requests this minute", client.current_request_rate_count());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod merge;
pub mod normalize;
pub mod routing;
mod snapshot;

// Re-export core
pub use tornlink_core::*;

// Re-export storage and transport
pub use tornlink_http::{ApiVersion, Endpoint, Entity, HttpConfig, ReqwestTransport, Transport};
pub use tornlink_storage::{MemoryConfig, MemoryStore, RateTracker};

pub use client::{ApiClient, screens};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use merge::{MergeCanonical, merge_canonical, patch_bank};
pub use snapshot::Snapshot;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ApiClient, ApiError, ClientConfig, CredentialSource, Resource, ResourceKey, Result,
        SharedCredential, Snapshot, StaticCredential, Transport,
    };

    #[cfg(feature = "tracing")]
    pub use crate::TracingMetrics;
}
