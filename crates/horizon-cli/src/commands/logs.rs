//! Kernel Logs page

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use horizon_core::{LogEntry, LogLevel};
use horizon_views::{KernelLogView, LOG_POLL_INTERVAL};
use serde_json::json;

use crate::app::App;
use crate::live::{until_loaded, watch};
use crate::output::LogRow;

#[derive(Debug, Clone)]
pub struct LogsArgs {
    pub level: Option<LogLevel>,
    pub search: Option<String>,
    /// Directory to write an export into
    pub export: Option<PathBuf>,
    pub clear: bool,
    pub watch: bool,
}

pub async fn logs(app: Arc<App>, args: LogsArgs) -> Result<()> {
    let view = KernelLogView::new();
    view.open();
    view.set_level(args.level);
    if let Some(search) = &args.search {
        view.set_search(search.clone());
    }

    until_loaded(&app.ctx, "Attaching to kernel log...", || {
        !view.polling().state().is_loading
    })
    .await;

    if args.clear {
        view.clear();
        app.ctx.success("Log buffer cleared");
    }

    let result = show(&app, &view, &args).await;
    view.close();
    result
}

async fn show(app: &App, view: &KernelLogView, args: &LogsArgs) -> Result<()> {
    if let Some(dir) = &args.export {
        let export = view.export(Utc::now());
        let path = dir.join(&export.file_name);
        std::fs::write(&path, &export.contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        app.ctx.success(&format!("Exported logs to {}", path.display()));
    }

    render(app, view);
    if args.watch {
        watch(&app.ctx, LOG_POLL_INTERVAL, || {
            render(app, view);
            Ok(())
        })
        .await?;
    }
    Ok(())
}

fn log_row(entry: &LogEntry) -> LogRow {
    LogRow {
        timestamp: entry.timestamp.format("%H:%M:%S").to_string(),
        level: entry.level.as_str().to_uppercase(),
        source: entry.source.clone(),
        message: entry.message.clone(),
    }
}

fn render(app: &App, view: &KernelLogView) {
    let entries = view.entries();
    let counts = view.counts();

    if app.ctx.is_json() {
        app.ctx.print_json(&json!({
            "filter": view.filter(),
            "counts": counts,
            "entries": entries,
        }));
        return;
    }

    app.ctx.heading("Kernel Logs", &app.banner());
    let summary: Vec<String> = LogLevel::ALL
        .iter()
        .map(|level| format!("{} {}", level.as_str(), counts.get(*level)))
        .collect();
    app.ctx
        .info(&format!("all {}  {}", counts.all, summary.join("  ")));

    if entries.is_empty() {
        app.ctx.info(if counts.all == 0 {
            "No logs recorded yet"
        } else {
            "No logs matching current filters"
        });
        return;
    }
    let rows: Vec<LogRow> = entries.iter().map(log_row).collect();
    app.ctx.print(&rows);
}
