//! horizon-mock - Simulated HorizonOps backend
//!
//! Serves the four endpoints the console talks to, with synthetic data for
//! the eight known machines. Unknown machines get a 404 with
//! `{"detail": "Machine not found"}`; an unusable predict body gets a 422.
//!
//! # Usage
//!
//! ```ignore
//! use horizon_mock::{create_router, MockState};
//!
//! let router = create_router(MockState::seeded(7));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod error;
pub mod handlers;
pub mod scoring;
pub mod state;

pub use error::MockError;
pub use state::MockState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the mock API router with the given state
pub fn create_router(state: MockState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/predict", post(handlers::predict))
        .route("/health/fleet", get(handlers::fleet_health))
        .route("/telemetry/{machine_id}", get(handlers::telemetry_history))
        .route(
            "/telemetry/{machine_id}/latest",
            get(handlers::telemetry_latest),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
