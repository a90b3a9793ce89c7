//! Endpoint handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use horizon_core::synthetic::{self, machine_profile};
use horizon_core::{
    FleetHealth, FleetSummary, LatestReading, PredictionRequest, PredictionResponse,
    TelemetryHistory, MACHINES,
};
use serde::Deserialize;
use tracing::debug;

use crate::error::MockError;
use crate::scoring;
use crate::state::{MockState, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// `POST /predict`
pub async fn predict(
    body: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, MockError> {
    let Json(request) = body?;
    if machine_profile(&request.machine_id).is_none() {
        return Err(MockError::machine_not_found());
    }
    let response = scoring::predict(&request.machine_id, &request.features);
    debug!(
        machine_id = %request.machine_id,
        score = response.risk_score,
        "Prediction served"
    );
    Ok(Json(response))
}

/// `GET /health/fleet`
pub async fn fleet_health(State(state): State<MockState>) -> Json<FleetHealth> {
    let machines: Vec<_> = state.with_rng(|rng| {
        MACHINES
            .iter()
            .filter_map(|id| {
                machine_profile(id).map(|profile| synthetic::machine_status(rng, id, &profile))
            })
            .collect()
    });
    let summary = FleetSummary::from_machines(&machines);
    Json(FleetHealth { machines, summary })
}

/// `GET /telemetry/{machine_id}?limit=N`
pub async fn telemetry_history(
    State(state): State<MockState>,
    Path(machine_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<TelemetryHistory>, MockError> {
    let profile = machine_profile(&machine_id).ok_or_else(MockError::machine_not_found)?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    let data = state.with_rng(|rng| synthetic::telemetry_history(rng, &profile, limit, Utc::now()));
    Ok(Json(TelemetryHistory { data }))
}

/// `GET /telemetry/{machine_id}/latest`
pub async fn telemetry_latest(
    State(state): State<MockState>,
    Path(machine_id): Path<String>,
) -> Result<Json<LatestReading>, MockError> {
    let profile = machine_profile(&machine_id).ok_or_else(MockError::machine_not_found)?;
    let reading = state.with_rng(|rng| synthetic::telemetry_reading(rng, &profile, Utc::now()));
    Ok(Json(LatestReading {
        reading: Some(reading),
    }))
}
