//! Integration tests for the mock backend
//!
//! These tests serve the mock router and talk to it through the real
//! client, so client and mock stay in sync.

use horizon_client::testing::TestServer;
use horizon_client::{fetch_once, ApiError, ApiRequest};
use horizon_core::{
    ConsolePoint, HealthTier, PredictionRequest, RiskLevel, SystemStatus, MACHINES,
};
use horizon_mock::{create_router, MockState};
use pretty_assertions::assert_eq;
use serde_json::Value;
use tokio_test::{assert_err, assert_ok};

async fn server() -> TestServer {
    TestServer::start(create_router(MockState::seeded(42)))
        .await
        .expect("mock server")
}

fn prediction_request(machine_id: &str, vibration: f64, status: SystemStatus) -> PredictionRequest {
    PredictionRequest {
        machine_id: machine_id.to_string(),
        features: ConsolePoint {
            time: "12:00:00".into(),
            vibration,
            temp: 43.0,
            power: 12.3,
            anomaly: false,
        }
        .feature_snapshot(status),
    }
}

#[tokio::test]
async fn fleet_covers_every_machine() {
    let server = server().await;
    let fleet = assert_ok!(server.client.fleet_health().await);

    assert_eq!(fleet.machines.len(), MACHINES.len());
    assert_eq!(fleet.summary.total_machines as usize, MACHINES.len());
    let tier_total: u32 = HealthTier::ALL.iter().map(|t| fleet.summary.count(*t)).sum();
    assert_eq!(tier_total, fleet.summary.total_machines);
    for machine in &fleet.machines {
        assert_eq!(machine.status, HealthTier::from_score(machine.health_score));
    }
}

#[tokio::test]
async fn history_honours_limit() {
    let server = server().await;
    let history = assert_ok!(server.client.telemetry_history("CNC-ALPHA-921", 50).await);
    assert_eq!(history.len(), 50);

    let short = assert_ok!(server.client.telemetry_history("LATHE-DELTA-402", 5).await);
    assert_eq!(short.len(), 5);
}

#[tokio::test]
async fn latest_returns_one_reading() {
    let server = server().await;
    let outcome = server.client.telemetry_latest("MILL-GAMMA-302").await;
    assert!(outcome.error.is_none());
    assert!(outcome.data.and_then(|latest| latest.reading).is_some());
}

#[tokio::test]
async fn unknown_machine_is_not_found() {
    let server = server().await;

    let err = assert_err!(server.client.telemetry_history("CNC-OMEGA-000", 50).await);
    assert_eq!(err, ApiError::NotFound);

    let outcome = server.client.telemetry_latest("CNC-OMEGA-000").await;
    assert_eq!(outcome.error.as_deref(), Some("Machine not found"));
}

#[tokio::test]
async fn prediction_is_scored() {
    let server = server().await;

    let calm = assert_ok!(
        server
            .client
            .predict(&prediction_request("CNC-ALPHA-921", 21.0, SystemStatus::Nominal))
            .await
    );
    assert_eq!(calm.risk_level, RiskLevel::Low);
    assert!(calm.insight().starts_with("Risk Level: LOW ("));

    let rough = assert_ok!(
        server
            .client
            .predict(&prediction_request("CNC-ALPHA-921", 72.0, SystemStatus::Degraded))
            .await
    );
    assert!(rough.risk_level >= RiskLevel::High);
}

#[tokio::test]
async fn invalid_prediction_body_is_unprocessable() {
    let server = server().await;
    let url = server.client.base_url().join("/predict").unwrap();
    let request = ApiRequest::post_json(url, &serde_json::json!({"machine_id": 7})).unwrap();

    let err = assert_err!(server.client.executor::<Value>().execute(&request).await);
    match err {
        ApiError::ClientError { status, message } => {
            assert_eq!(status, 422);
            assert!(!message.is_empty());
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let outcome = fetch_once::<Value>(server.client.http_client(), &request).await;
    assert!(outcome.error.is_some());
}
