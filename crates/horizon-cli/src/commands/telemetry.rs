//! Live Telemetry page

use std::sync::Arc;

use anyhow::Result;
use horizon_core::{TelemetryReading, Trend};
use horizon_views::{TelemetryView, TELEMETRY_POLL_INTERVAL};
use serde_json::json;

use crate::app::App;
use crate::live::{until_loaded, watch};
use crate::output::{MetricRow, ReadingRow};

#[derive(Debug, Clone)]
pub struct TelemetryArgs {
    pub machine: String,
    pub rows: usize,
    pub watch: bool,
}

pub async fn telemetry(app: Arc<App>, args: TelemetryArgs) -> Result<()> {
    let view = TelemetryView::new(app.client.clone());
    view.open(args.machine.clone());

    until_loaded(
        &app.ctx,
        &format!("Loading telemetry for {}...", args.machine),
        || !view.state().is_loading,
    )
    .await;

    let result = show(&app, &view, &args).await;
    view.close();
    result
}

async fn show(app: &App, view: &TelemetryView, args: &TelemetryArgs) -> Result<()> {
    if let Some(e) = view.state().error {
        return Err(e.into());
    }
    render(app, view, args);

    if args.watch {
        watch(&app.ctx, TELEMETRY_POLL_INTERVAL, || {
            if let Some(e) = view.state().error {
                return Err(e.into());
            }
            render(app, view, args);
            Ok(())
        })
        .await?;
    }
    Ok(())
}

fn trend_arrow(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "↑",
        Trend::Down => "↓",
        Trend::Stable => "→",
    }
}

fn reading_row(reading: &TelemetryReading) -> ReadingRow {
    ReadingRow {
        timestamp: reading.timestamp.clone(),
        vibration_rms: format!("{:.2}", reading.vibration_rms),
        kurtosis: format!("{:.2}", reading.vibration_kurtosis),
        temperature: format!("{:.1}", reading.temperature),
        power: format!("{:.2}", reading.power_consumption),
        anomaly: if reading.anomaly_flag { "YES" } else { "-" }.to_string(),
    }
}

fn render(app: &App, view: &TelemetryView, args: &TelemetryArgs) {
    let state = view.state();
    let metrics = view.metrics();

    if app.ctx.is_json() {
        app.ctx.print_json(&json!({
            "machine_id": args.machine,
            "latest": view.latest(),
            "metrics": metrics,
            "readings": state.items,
        }));
        return;
    }

    app.ctx
        .heading(&format!("Live Telemetry - {}", args.machine), &app.banner());

    let metric_rows: Vec<MetricRow> = metrics
        .iter()
        .map(|card| MetricRow {
            label: card.label.to_string(),
            value: format!("{:.2} {}", card.value, card.unit),
            trend: trend_arrow(card.trend).to_string(),
            note: card.note.unwrap_or("").to_string(),
        })
        .collect();
    app.ctx.print(&metric_rows);

    let rows: Vec<ReadingRow> = state
        .items
        .iter_newest_first()
        .take(args.rows)
        .map(reading_row)
        .collect();
    app.ctx.print(&rows);
    app.ctx.info(&format!(
        "{} readings held, {} live updates",
        state.items.len(),
        state.updates
    ));
}
