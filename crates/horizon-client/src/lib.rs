//! HorizonOps Client Library
//!
//! Typed HTTP access to the HorizonOps API plus the two request patterns
//! the console views are built on:
//!
//! - [`RequestExecutor`]: one logical request with a per-attempt timeout,
//!   retry with backoff for transient failures, and an observable
//!   {data, loading, error} state. A 401 logs the session out.
//! - [`fetch_once`]: a single attempt with no retry, returning
//!   `{data?, error?}`.
//! - [`PollingView`]: initial fetch plus interval polling into a bounded
//!   window, with at most one poller per view slot.
//!
//! # Example
//!
//! ```rust,no_run
//! use horizon_client::HorizonClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = HorizonClient::new("http://localhost:8000")?;
//!
//!     let fleet = client.fleet_health().await?;
//!     println!("{} machines", fleet.summary.total_machines);
//!
//!     let history = client.telemetry_history("CNC-ALPHA-921", 50).await?;
//!     println!("{} readings", history.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod executor;
mod fetch;
pub mod polling;
mod request;
pub mod testing;

pub use client::{HorizonClient, DEFAULT_HISTORY_LIMIT};
pub use error::{ApiError, Result};
pub use executor::{
    RequestExecutor, RequestPhase, RequestState, RetryPolicy, DEFAULT_ATTEMPT_TIMEOUT,
    DEFAULT_BACKOFF_UNIT, DEFAULT_MAX_RETRIES,
};
pub use fetch::{fetch_once, FetchOutcome, UNEXPECTED_ERROR_MESSAGE};
pub use polling::{
    PollSource, PollUpdate, PollerStats, PollingConfig, PollingView, ViewState,
    POLL_TIMEOUT_INTERVALS,
};
pub use request::{extract_error_message, ApiRequest};
