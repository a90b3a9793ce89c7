//! Security Core page

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use horizon_core::{SecurityEvent, SecurityEventKind};
use horizon_views::SecurityView;
use serde_json::json;

use crate::app::App;
use crate::output::{paint, SecurityEventRow};

pub async fn security(app: Arc<App>, kind: Option<SecurityEventKind>) -> Result<()> {
    let view = SecurityView::load(Utc::now());
    let events: Vec<&SecurityEvent> = match kind {
        Some(kind) => view.events_of_kind(kind),
        None => view.events().iter().collect(),
    };
    let posture = view.posture();

    if app.ctx.is_json() {
        app.ctx.print_json(&json!({
            "posture": posture,
            "status": posture.label(),
            "events": events,
        }));
        return Ok(());
    }

    app.ctx.heading("Security Core", &app.banner());
    app.ctx.print_kv(&[
        ("Security Score", format!("{}/100", posture.score)),
        ("Status", paint(&posture.label(), posture.tone()).to_string()),
    ]);

    let rows: Vec<SecurityEventRow> = events
        .into_iter()
        .map(|event| SecurityEventRow {
            timestamp: event.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            kind: format!("{} {}", event.kind.glyph(), event.kind.as_str()),
            severity: event.severity.as_str().to_uppercase(),
            message: event.message.clone(),
            user: event.user.clone().unwrap_or_else(|| "-".to_string()),
            resolved: if event.resolved { "Yes" } else { "No" }.to_string(),
        })
        .collect();
    app.ctx.print(&rows);
    Ok(())
}
