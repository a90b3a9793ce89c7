//! Integration tests for the request executor and one-shot fetch
//!
//! Each test serves a small axum router on an ephemeral port and drives
//! the client against it with millisecond retry timings.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use horizon_client::testing::{fast_policy, unreachable_base_url, TestServer};
use horizon_client::{fetch_once, ApiError, ApiRequest, HorizonClient, RequestPhase};
use horizon_core::{MemorySessionStorage, SessionMode, SessionStore};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use url::Url;

const ATTEMPT_TIMEOUT: Duration = Duration::from_millis(100);

// =============================================================================
// Helpers
// =============================================================================

#[derive(Clone, Default)]
struct Hits(Arc<AtomicUsize>);

impl Hits {
    fn next(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Sleeps past the attempt timeout for the first two calls
async fn slow_twice(State(hits): State<Hits>) -> Json<Value> {
    if hits.next() <= 2 {
        tokio::time::sleep(ATTEMPT_TIMEOUT * 5).await;
    }
    Json(json!({"ok": true}))
}

async fn always_slow(State(hits): State<Hits>) -> Json<Value> {
    hits.next();
    tokio::time::sleep(ATTEMPT_TIMEOUT * 5).await;
    Json(json!({"ok": true}))
}

async fn status_route(
    State(hits): State<Hits>,
    axum::extract::Path(code): axum::extract::Path<u16>,
) -> (StatusCode, Json<Value>) {
    hits.next();
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({"detail": format!("status {}", code)})))
}

async fn not_json(State(hits): State<Hits>) -> (StatusCode, &'static str) {
    hits.next();
    (StatusCode::OK, "definitely not json")
}

async fn prediction_without_level() -> Json<Value> {
    Json(json!({"risk_score": 40.0, "recommended_action": "Inspect"}))
}

fn test_router(hits: Hits) -> Router {
    Router::new()
        .route("/slow-twice", get(slow_twice))
        .route("/always-slow", get(always_slow))
        .route("/status/{code}", get(status_route))
        .route("/not-json", get(not_json))
        .route("/predict", post(prediction_without_level))
        .with_state(hits)
}

async fn start(hits: Hits) -> TestServer {
    TestServer::start_with_policy(test_router(hits), fast_policy(ATTEMPT_TIMEOUT))
        .await
        .expect("test server")
}

fn get_request(server: &TestServer, path: &str) -> ApiRequest {
    ApiRequest::get(Url::parse(&format!("{}{}", server.base_url(), path)).unwrap())
}

async fn logged_in_session() -> Arc<SessionStore> {
    let session = Arc::new(SessionStore::with_stub_auth(Arc::new(
        MemorySessionStorage::new(),
    )));
    assert!(session.login("ops@horizonops.io", "pw").await);
    session
}

// =============================================================================
// Executor
// =============================================================================

#[tokio::test]
async fn timeout_twice_then_success_returns_payload() {
    let hits = Hits::default();
    let server = start(hits.clone()).await;
    let executor = server.client.executor::<Value>();

    let data = assert_ok!(executor.execute(&get_request(&server, "/slow-twice")).await);
    assert_eq!(data, json!({"ok": true}));

    let state = executor.state();
    assert_eq!(state.attempts, 3);
    assert_eq!(state.phase(), RequestPhase::Success);
    assert_eq!(hits.count(), 3);
}

#[tokio::test]
async fn always_timing_out_fails_after_three_attempts() {
    let hits = Hits::default();
    let server = start(hits.clone()).await;
    let executor = server.client.executor::<Value>();

    let err = assert_err!(executor.execute(&get_request(&server, "/always-slow")).await);
    assert_eq!(err, ApiError::Timeout);

    let state = executor.state();
    assert_eq!(state.attempts, 3);
    assert!(!state.is_loading);
    assert!(state.data.is_none());
    assert_eq!(state.error, Some(ApiError::Timeout));
    assert_eq!(hits.count(), 3);
}

#[tokio::test]
async fn unauthorized_logs_out_and_is_not_retried() {
    let hits = Hits::default();
    let server = start(hits.clone()).await;
    let session = logged_in_session().await;
    let client = server.client.clone().with_session(session.clone());

    let err = assert_err!(
        client
            .executor::<Value>()
            .execute(&get_request(&server, "/status/401"))
            .await
    );

    assert_eq!(err, ApiError::AuthExpired);
    assert_eq!(session.mode(), SessionMode::Guest);
    assert!(session.identity().is_none());
    assert_eq!(hits.count(), 1);
}

#[tokio::test]
async fn status_classes_are_not_retried() {
    let hits = Hits::default();
    let server = start(hits.clone()).await;
    let executor = server.client.executor::<Value>();

    let cases = [
        ("/status/403", ApiError::Forbidden),
        ("/status/404", ApiError::NotFound),
        ("/status/500", ApiError::ServerError { status: 500 }),
        ("/status/503", ApiError::ServerError { status: 503 }),
        (
            "/status/422",
            ApiError::ClientError {
                status: 422,
                message: "status 422".into(),
            },
        ),
    ];

    for (i, (path, expected)) in cases.into_iter().enumerate() {
        let err = assert_err!(executor.execute(&get_request(&server, path)).await);
        assert_eq!(err, expected, "{}", path);
        assert_eq!(executor.state().attempts, 1);
        assert_eq!(hits.count(), i + 1);
    }
}

#[tokio::test]
async fn network_failure_retries_with_backoff() {
    let client =
        HorizonClient::with_policy(&unreachable_base_url(), fast_policy(ATTEMPT_TIMEOUT)).unwrap();
    let executor = client.executor::<Value>();
    let request = client.fleet_health_request().unwrap();

    let started = Instant::now();
    let err = assert_err!(executor.execute(&request).await);

    assert!(matches!(err, ApiError::NetworkFailure(_)), "{:?}", err);
    assert_eq!(executor.state().attempts, 3);
    // 10ms before the first retry, 20ms before the second
    assert!(started.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn malformed_success_body_is_validation_error() {
    let hits = Hits::default();
    let server = start(hits.clone()).await;
    let executor = server.client.executor::<Value>();

    let err = assert_err!(executor.execute(&get_request(&server, "/not-json")).await);
    assert!(matches!(err, ApiError::Validation(_)), "{:?}", err);
    assert_eq!(hits.count(), 1);
}

#[tokio::test]
async fn prediction_without_risk_level_is_rejected() {
    let server = start(Hits::default()).await;
    let request = horizon_core::PredictionRequest {
        machine_id: "CNC-ALPHA-921".into(),
        features: horizon_core::ConsolePoint {
            time: "t".into(),
            vibration: 21.0,
            temp: 43.0,
            power: 12.2,
            anomaly: false,
        }
        .feature_snapshot(horizon_core::SystemStatus::Nominal),
    };

    let err = assert_err!(server.client.predict(&request).await);
    assert_eq!(err.to_string(), "Invalid response from AI module");
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let hits = Hits::default();
    let server = start(hits.clone()).await;
    let executor = server.client.executor::<Value>();

    let a = get_request(&server, "/status/404");
    let b = get_request(&server, "/status/403");
    let (ra, rb) = tokio::join!(executor.execute(&a), executor.execute(&b));

    assert_eq!(ra, Err(ApiError::NotFound));
    assert_eq!(rb, Err(ApiError::Forbidden));
    assert_eq!(hits.count(), 2);
}

// =============================================================================
// fetch_once
// =============================================================================

#[tokio::test]
async fn fetch_once_surfaces_body_message_without_logout() {
    let hits = Hits::default();
    let server = start(hits.clone()).await;
    let session = logged_in_session().await;
    let client = server.client.clone().with_session(session.clone());

    let outcome = fetch_once::<Value>(client.http_client(), &get_request(&server, "/status/401")).await;

    assert!(outcome.data.is_none());
    assert_eq!(outcome.error.as_deref(), Some("status 401"));
    assert_eq!(session.mode(), SessionMode::Authenticated);
    assert_eq!(hits.count(), 1);
}

#[tokio::test]
async fn fetch_once_does_not_retry_or_time_out() {
    let hits = Hits::default();
    let server = start(hits.clone()).await;

    let outcome =
        fetch_once::<Value>(server.client.http_client(), &get_request(&server, "/slow-twice")).await;

    // The slow first call completes because fetch_once has no ceiling
    assert_eq!(outcome.data, Some(json!({"ok": true})));
    assert_eq!(hits.count(), 1);
}

#[tokio::test]
async fn fetch_once_reports_transport_failure() {
    let client = HorizonClient::new(&unreachable_base_url()).unwrap();
    let outcome = client.telemetry_latest("CNC-ALPHA-921").await;
    assert!(outcome.data.is_none());
    assert!(!outcome.error.unwrap_or_default().is_empty());
}
