//! Fleet Network page

use std::sync::Arc;

use anyhow::Result;
use horizon_core::{HealthTier, MachineStatus};
use horizon_views::{FleetView, FLEET_POLL_INTERVAL};
use serde_json::json;

use crate::app::App;
use crate::live::{until_loaded, watch};
use crate::output::{paint, MachineRow};

#[derive(Debug, Clone)]
pub struct FleetArgs {
    /// Machine to show in the detail panel
    pub machine: Option<String>,
    pub watch: bool,
}

pub async fn fleet(app: Arc<App>, args: FleetArgs) -> Result<()> {
    let view = FleetView::new(app.client.clone());
    view.open();
    if let Some(machine) = &args.machine {
        view.toggle_selection(machine);
    }

    until_loaded(&app.ctx, "Loading fleet health...", || !view.is_loading()).await;

    let result = show(&app, &view, &args).await;
    view.close();
    result
}

async fn show(app: &App, view: &FleetView, args: &FleetArgs) -> Result<()> {
    if let Some(e) = view.error() {
        return Err(e.into());
    }
    render(app, view);

    if args.watch {
        watch(&app.ctx, FLEET_POLL_INTERVAL, || {
            if let Some(e) = view.error().filter(|e| e.is_auth_expired()) {
                return Err(e.into());
            }
            render(app, view);
            Ok(())
        })
        .await?;
    }
    Ok(())
}

fn machine_row(machine: &MachineStatus) -> MachineRow {
    MachineRow {
        machine_id: machine.machine_id.clone(),
        health: format!("{:.1}%", machine.health_score),
        status: machine.status.as_str().to_uppercase(),
        location: machine.location.clone(),
        last_alert: machine.last_alert.clone().unwrap_or_else(|| "-".to_string()),
    }
}

fn render(app: &App, view: &FleetView) {
    let Some(snapshot) = view.snapshot() else {
        app.ctx.info("No fleet data");
        return;
    };
    let selected = view.selected_machine();

    if app.ctx.is_json() {
        app.ctx.print_json(&json!({
            "machines": snapshot.machines,
            "summary": snapshot.summary,
            "selected": selected,
        }));
        return;
    }

    app.ctx.heading("Fleet Network", &app.banner());

    let summary = &snapshot.summary;
    if !app.ctx.quiet {
        let tiers: Vec<String> = HealthTier::ALL
            .iter()
            .map(|tier| {
                paint(
                    &format!("{} {}", tier.as_str().to_uppercase(), summary.count(*tier)),
                    tier.tone(),
                )
                .to_string()
            })
            .collect();
        println!(
            "{} machines, average health {:.1}%  {}",
            summary.total_machines,
            summary.average_health,
            tiers.join("  ")
        );
    }

    let rows: Vec<MachineRow> = snapshot.machines.iter().map(machine_row).collect();
    app.ctx.print(&rows);

    match (view.selected_id(), selected) {
        (_, Some(machine)) => {
            app.ctx.print_kv(&[
                ("Machine", machine.machine_id.clone()),
                ("Location", machine.location.clone()),
                ("Health", format!("{:.1}%", machine.health_score)),
                (
                    "Status",
                    paint(&machine.status.as_str().to_uppercase(), machine.status.tone())
                        .to_string(),
                ),
                (
                    "Last Alert",
                    machine.last_alert.unwrap_or_else(|| "None".to_string()),
                ),
            ]);
        }
        (Some(id), None) => app.ctx.warn(&format!("Machine {} is not in the fleet", id)),
        (None, None) => {}
    }
}
