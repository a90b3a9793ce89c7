//! Command Console page

use std::sync::Arc;

use anyhow::Result;
use horizon_core::ConsolePoint;
use horizon_views::{ConsoleView, CONSOLE_POLL_INTERVAL};
use serde_json::json;

use crate::app::App;
use crate::live::{spin, until_loaded, watch};
use crate::output::{paint, LogRow};

/// Points shown in the telemetry strip
const STRIP_POINTS: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct ConsoleArgs {
    /// Run an AI analysis on the newest point
    pub analyze: bool,
    pub watch: bool,
}

pub async fn console(app: Arc<App>, args: ConsoleArgs) -> Result<()> {
    let view = ConsoleView::new(app.client.clone());
    view.open();

    until_loaded(&app.ctx, "Starting console feed...", || {
        !view.polling().state().is_loading
    })
    .await;

    let result = show(&app, &view, &args).await;
    view.close();
    result
}

async fn show(app: &App, view: &ConsoleView, args: &ConsoleArgs) -> Result<()> {
    if args.analyze {
        let outcome = spin(&app.ctx, "Running AI analysis...", view.analyze()).await;
        match outcome {
            Err(e) if e.is_auth_expired() => return Err(e.into()),
            Ok(None) => app.ctx.warn("No telemetry to analyse yet"),
            _ => {}
        }
    }

    render(app, view);
    if args.watch {
        watch(&app.ctx, CONSOLE_POLL_INTERVAL, || {
            render(app, view);
            Ok(())
        })
        .await?;
    }
    Ok(())
}

fn render(app: &App, view: &ConsoleView) {
    let points = view.points();
    let status = view.system_status();
    let log = view.log();
    let analysis = view.analysis();

    if app.ctx.is_json() {
        app.ctx.print_json(&json!({
            "machine_id": view.machine_id(),
            "system_status": status,
            "points": points,
            "log": log,
            "insight": analysis.insight,
            "error": analysis.error,
        }));
        return;
    }

    app.ctx.heading("Command Console", &app.banner());
    app.ctx.print_kv(&[
        ("Machine", view.machine_id().to_string()),
        (
            "System",
            paint(&status.as_str().to_uppercase(), status.tone()).to_string(),
        ),
    ]);

    let strip: Vec<String> = points
        .iter()
        .rev()
        .take(STRIP_POINTS)
        .map(describe_point)
        .collect();
    for line in strip.iter().rev() {
        app.ctx.info(line);
    }

    if let Some(insight) = &analysis.insight {
        app.ctx.success(insight);
    }
    if let Some(error) = &analysis.error {
        app.ctx.error(&format!("Analysis failed: {}", error));
    }

    if !log.is_empty() {
        let rows: Vec<LogRow> = log
            .iter()
            .map(|entry| LogRow {
                timestamp: entry.timestamp.clone(),
                level: entry.level.as_str().to_uppercase(),
                source: "CONSOLE".to_string(),
                message: entry.message.clone(),
            })
            .collect();
        app.ctx.print(&rows);
    }
}

fn describe_point(point: &ConsolePoint) -> String {
    format!(
        "{}  vib {:>6.2}  temp {:>6.2}  power {:>6.2}{}",
        point.time,
        point.vibration,
        point.temp,
        point.power,
        if point.anomaly { "  ANOMALY" } else { "" }
    )
}
