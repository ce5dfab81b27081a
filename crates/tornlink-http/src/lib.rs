//! tornlink-http: Talking to the upstream game API
//!
//! Endpoints are described by [`Endpoint`] (API family, entity, selections,
//! timeout) and fetched through a [`Transport`]. [`Fetcher::fetch_all`] runs
//! any number of them concurrently, each under its own timeout, and reports
//! success or failure per endpoint.

pub mod endpoint;
pub mod envelope;
pub mod fetch;
pub mod inflight;
pub mod transport;

pub use endpoint::{ApiVersion, Endpoint, Entity};
pub use envelope::check_envelope;
pub use fetch::{FetchObserver, Fetcher, RawResponse};
pub use inflight::InflightRequests;
pub use transport::{HttpConfig, ReqwestTransport, Transport};
