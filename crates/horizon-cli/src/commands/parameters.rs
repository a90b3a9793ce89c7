//! Parameters page

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use horizon_core::{Parameter, ParameterKind, ParameterSection};
use horizon_views::ParametersView;
use serde_json::json;

use crate::app::App;
use crate::live::spin;
use crate::output::ParameterRow;

/// A `section.param=value` assignment from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub section: String,
    pub param: String,
    pub value: String,
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected section.param=value, got '{}'", s))?;
        let (section, param) = target
            .trim()
            .split_once('.')
            .ok_or_else(|| format!("expected section.param, got '{}'", target))?;
        if section.is_empty() || param.is_empty() {
            return Err(format!("expected section.param, got '{}'", target));
        }
        Ok(Self {
            section: section.to_string(),
            param: param.to_string(),
            value: value.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParametersArgs {
    /// Only show this section
    pub section: Option<String>,
    pub set: Vec<Assignment>,
    pub reset: bool,
}

pub async fn parameters(app: Arc<App>, args: ParametersArgs) -> Result<()> {
    let view = ParametersView::new();

    if args.reset {
        view.reset();
        app.ctx.success("Parameters reset to defaults");
    }

    for assignment in &args.set {
        view.update_from_input(&assignment.section, &assignment.param, &assignment.value)
            .with_context(|| {
                format!(
                    "Failed to set {}.{}",
                    assignment.section, assignment.param
                )
            })?;
    }

    if view.has_changes() {
        spin(&app.ctx, "Saving parameters...", view.save()).await;
        app.ctx.success(&format!(
            "Saved {} parameter change(s)",
            args.set.len()
        ));
        view.acknowledge_save();
    }

    let set = view.snapshot();
    let sections: Vec<&ParameterSection> = match &args.section {
        Some(id) => match set.section(id) {
            Some(section) => vec![section],
            None => bail!("Unknown parameter section: {}", id),
        },
        None => set.sections().iter().collect(),
    };

    if app.ctx.is_json() {
        app.ctx.print_json(&json!({
            "sections": sections,
            "has_changes": view.has_changes(),
            "save_status": view.save_status(),
        }));
        return Ok(());
    }

    app.ctx.heading("Parameters", &app.banner());
    for section in sections {
        app.ctx
            .info(&format!("\n{} ({})", section.title, section.id));
        let rows: Vec<ParameterRow> = section.params.iter().map(parameter_row).collect();
        app.ctx.print(&rows);
    }
    Ok(())
}

fn parameter_row(param: &Parameter) -> ParameterRow {
    let allowed = match &param.kind {
        ParameterKind::Number { min, max, .. } => format!("{} - {}", min, max),
        ParameterKind::Select { options } => options.join(" | "),
        ParameterKind::Toggle => "on | off".to_string(),
        ParameterKind::Text => "text".to_string(),
    };
    ParameterRow {
        id: param.id.clone(),
        label: param.label.clone(),
        value: param.value.to_string(),
        unit: param.unit().to_string(),
        allowed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_assignments() {
        let parsed: Assignment = "alerts.vib_warn = 35".parse().unwrap();
        assert_eq!(
            parsed,
            Assignment {
                section: "alerts".into(),
                param: "vib_warn".into(),
                value: "35".into(),
            }
        );

        assert!("alerts.vib_warn".parse::<Assignment>().is_err());
        assert!("vib_warn=35".parse::<Assignment>().is_err());
        assert!(".vib_warn=35".parse::<Assignment>().is_err());
    }
}
