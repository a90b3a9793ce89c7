//! One-off risk prediction for a machine's newest reading

use std::sync::Arc;

use anyhow::{Context, Result};
use horizon_core::PredictionRequest;
use serde_json::json;

use crate::app::App;
use crate::live::spin;
use crate::output::paint;

pub async fn predict(app: Arc<App>, machine: String) -> Result<()> {
    let latest = spin(
        &app.ctx,
        &format!("Fetching latest reading for {}...", machine),
        app.client.telemetry_latest(&machine),
    )
    .await
    .into_api_result()?;
    let reading = latest
        .reading
        .with_context(|| format!("No telemetry recorded for {}", machine))?;

    let request = PredictionRequest {
        machine_id: machine.clone(),
        features: reading.feature_snapshot(),
    };
    let prediction = spin(&app.ctx, "Running AI analysis...", app.client.predict(&request)).await?;

    if app.ctx.is_json() {
        app.ctx.print_json(&json!({
            "machine_id": machine,
            "reading": reading,
            "prediction": prediction,
            "insight": prediction.insight(),
        }));
        return Ok(());
    }

    app.ctx.heading(&format!("Risk Prediction - {}", machine), &app.banner());
    app.ctx.print_kv(&[
        (
            "Risk Level",
            paint(
                &prediction.risk_level.as_str().to_uppercase(),
                prediction.risk_level.tone(),
            )
            .to_string(),
        ),
        ("Risk Score", format!("{}%", prediction.risk_score)),
        ("Action", prediction.recommended_action.clone()),
        (
            "Explanation",
            prediction.explanation.clone().unwrap_or_else(|| "-".to_string()),
        ),
    ]);
    app.ctx.info(&prediction.insight());
    Ok(())
}
