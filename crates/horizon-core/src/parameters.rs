//! Alert and system parameter catalogue
//!
//! Parameters are grouped into sections. Every edit is validated against
//! the parameter's kind (numeric range, select options) before it is
//! applied; the set tracks whether it has unsaved changes.

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

/// A parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Toggle(bool),
    Number(f64),
    Text(String),
}

impl std::fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterValue::Toggle(true) => f.write_str("on"),
            ParameterValue::Toggle(false) => f.write_str("off"),
            ParameterValue::Number(n) => write!(f, "{}", n),
            ParameterValue::Text(s) => f.write_str(s),
        }
    }
}

/// Kind of a parameter, with its constraints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParameterKind {
    Number {
        min: f64,
        max: f64,
        #[serde(default)]
        unit: String,
    },
    Text,
    Toggle,
    Select {
        options: Vec<String>,
    },
}

impl ParameterKind {
    fn expected(&self) -> &'static str {
        match self {
            ParameterKind::Number { .. } => "number",
            ParameterKind::Text => "text",
            ParameterKind::Toggle => "toggle",
            ParameterKind::Select { .. } => "select",
        }
    }
}

/// A single editable parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: String,
    pub label: String,
    pub description: String,
    #[serde(flatten)]
    pub kind: ParameterKind,
    pub value: ParameterValue,
}

impl Parameter {
    fn number(id: &str, label: &str, description: &str, value: f64, min: f64, max: f64, unit: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            kind: ParameterKind::Number {
                min,
                max,
                unit: unit.to_string(),
            },
            value: ParameterValue::Number(value),
        }
    }

    fn toggle(id: &str, label: &str, description: &str, value: bool) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            kind: ParameterKind::Toggle,
            value: ParameterValue::Toggle(value),
        }
    }

    fn select(id: &str, label: &str, description: &str, value: &str, options: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            kind: ParameterKind::Select {
                options: options.iter().map(|o| o.to_string()).collect(),
            },
            value: ParameterValue::Text(value.to_string()),
        }
    }

    /// Unit suffix for numeric parameters
    pub fn unit(&self) -> &str {
        match &self.kind {
            ParameterKind::Number { unit, .. } => unit,
            _ => "",
        }
    }

    /// Check `value` against this parameter's kind
    pub fn validate(&self, value: &ParameterValue) -> Result<(), ParameterError> {
        match (&self.kind, value) {
            (ParameterKind::Number { min, max, .. }, ParameterValue::Number(n)) => {
                if n.is_finite() && *n >= *min && *n <= *max {
                    Ok(())
                } else {
                    Err(ParameterError::OutOfRange {
                        param: self.id.clone(),
                        value: *n,
                        min: *min,
                        max: *max,
                    })
                }
            }
            (ParameterKind::Text, ParameterValue::Text(_)) => Ok(()),
            (ParameterKind::Toggle, ParameterValue::Toggle(_)) => Ok(()),
            (ParameterKind::Select { options }, ParameterValue::Text(choice)) => {
                if options.iter().any(|o| o == choice) {
                    Ok(())
                } else {
                    Err(ParameterError::InvalidOption {
                        param: self.id.clone(),
                        value: choice.clone(),
                    })
                }
            }
            (kind, _) => Err(ParameterError::TypeMismatch {
                param: self.id.clone(),
                expected: kind.expected(),
            }),
        }
    }

    /// Parse user input according to this parameter's kind
    pub fn parse_input(&self, raw: &str) -> Result<ParameterValue, ParameterError> {
        let raw = raw.trim();
        let mismatch = || ParameterError::TypeMismatch {
            param: self.id.clone(),
            expected: self.kind.expected(),
        };
        match &self.kind {
            ParameterKind::Number { .. } => raw
                .parse::<f64>()
                .map(ParameterValue::Number)
                .map_err(|_| mismatch()),
            ParameterKind::Toggle => match raw.to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Ok(ParameterValue::Toggle(true)),
                "false" | "off" | "no" | "0" => Ok(ParameterValue::Toggle(false)),
                _ => Err(mismatch()),
            },
            ParameterKind::Text | ParameterKind::Select { .. } => {
                Ok(ParameterValue::Text(raw.to_string()))
            }
        }
    }
}

/// A titled group of parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSection {
    pub id: String,
    pub title: String,
    pub params: Vec<Parameter>,
}

/// Save progress of the parameter set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
}

/// Editable parameter catalogue with dirty tracking
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    sections: Vec<ParameterSection>,
    has_changes: bool,
    save_status: SaveStatus,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            sections: default_sections(),
            has_changes: false,
            save_status: SaveStatus::Idle,
        }
    }
}

impl ParameterSet {
    pub fn sections(&self) -> &[ParameterSection] {
        &self.sections
    }

    pub fn section(&self, section_id: &str) -> Option<&ParameterSection> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    pub fn get(&self, section_id: &str, param_id: &str) -> Option<&Parameter> {
        self.section(section_id)?
            .params
            .iter()
            .find(|p| p.id == param_id)
    }

    pub fn has_changes(&self) -> bool {
        self.has_changes
    }

    pub fn save_status(&self) -> SaveStatus {
        self.save_status
    }

    /// Validate and apply a new value
    pub fn update(
        &mut self,
        section_id: &str,
        param_id: &str,
        value: ParameterValue,
    ) -> Result<(), ParameterError> {
        let section = self
            .sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or_else(|| ParameterError::UnknownSection(section_id.to_string()))?;
        let param = section
            .params
            .iter_mut()
            .find(|p| p.id == param_id)
            .ok_or_else(|| ParameterError::UnknownParameter {
                section: section_id.to_string(),
                param: param_id.to_string(),
            })?;

        param.validate(&value)?;
        param.value = value;
        self.has_changes = true;
        self.save_status = SaveStatus::Idle;
        Ok(())
    }

    /// Parse `raw` according to the parameter kind, then apply it
    pub fn update_from_input(
        &mut self,
        section_id: &str,
        param_id: &str,
        raw: &str,
    ) -> Result<(), ParameterError> {
        let value = self
            .get(section_id, param_id)
            .ok_or_else(|| {
                if self.section(section_id).is_none() {
                    ParameterError::UnknownSection(section_id.to_string())
                } else {
                    ParameterError::UnknownParameter {
                        section: section_id.to_string(),
                        param: param_id.to_string(),
                    }
                }
            })?
            .parse_input(raw)?;
        self.update(section_id, param_id, value)
    }

    pub fn begin_save(&mut self) {
        self.save_status = SaveStatus::Saving;
    }

    pub fn finish_save(&mut self) {
        self.has_changes = false;
        self.save_status = SaveStatus::Saved;
    }

    /// Clear the "saved" indicator
    pub fn acknowledge_save(&mut self) {
        if self.save_status == SaveStatus::Saved {
            self.save_status = SaveStatus::Idle;
        }
    }

    /// Restore the shipped defaults
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn default_sections() -> Vec<ParameterSection> {
    vec![
        ParameterSection {
            id: "alerts".into(),
            title: "Alert Thresholds".into(),
            params: vec![
                Parameter::number("vib_warn", "Vibration Warning", "Threshold for vibration warning alerts", 30.0, 10.0, 100.0, "mm/s"),
                Parameter::number("vib_crit", "Vibration Critical", "Threshold for critical vibration alerts", 50.0, 20.0, 100.0, "mm/s"),
                Parameter::number("temp_warn", "Temperature Warning", "Threshold for temperature warning", 55.0, 30.0, 80.0, "°C"),
                Parameter::number("temp_crit", "Temperature Critical", "Threshold for critical temperature", 65.0, 40.0, 90.0, "°C"),
                Parameter::number("kurtosis_thresh", "Kurtosis Threshold", "Bearing health indicator threshold", 4.5, 3.0, 10.0, ""),
            ],
        },
        ParameterSection {
            id: "model".into(),
            title: "ML Model Settings".into(),
            params: vec![
                Parameter::number("prediction_window", "Prediction Window", "Hours ahead for failure prediction", 72.0, 24.0, 168.0, "hours"),
                Parameter::number("confidence_thresh", "Confidence Threshold", "Minimum confidence for alerts", 0.75, 0.5, 0.99, ""),
                Parameter::select("model_version", "Model Version", "Active prediction model", "v1.2.0", &["v1.0.0", "v1.1.0", "v1.2.0", "v2.0.0-beta"]),
                Parameter::toggle("retrain_enabled", "Auto Retrain", "Enable automatic model retraining", true),
            ],
        },
        ParameterSection {
            id: "data".into(),
            title: "Data Collection".into(),
            params: vec![
                Parameter::select("sample_rate", "Telemetry Sample Rate", "Sensor data collection frequency", "1Hz", &["0.1Hz", "1Hz", "10Hz", "100Hz"]),
                Parameter::number("retention_days", "Data Retention", "Days to retain historical data", 90.0, 30.0, 365.0, "days"),
                Parameter::number("batch_size", "Batch Size", "Records per batch upload", 1000.0, 100.0, 10000.0, "records"),
                Parameter::toggle("compression", "Data Compression", "Enable telemetry compression", true),
            ],
        },
        ParameterSection {
            id: "security".into(),
            title: "Security Settings".into(),
            params: vec![
                Parameter::number("session_timeout", "Session Timeout", "Auto-logout after inactivity", 30.0, 5.0, 120.0, "min"),
                Parameter::toggle("mfa_required", "Require MFA", "Enforce multi-factor authentication", true),
                Parameter::number("api_rate_limit", "API Rate Limit", "Maximum API requests per minute", 100.0, 10.0, 1000.0, "/min"),
                Parameter::toggle("audit_logging", "Audit Logging", "Log all user actions", true),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_four_sections() {
        let set = ParameterSet::default();
        let ids: Vec<_> = set.sections().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["alerts", "model", "data", "security"]);
        assert_eq!(
            set.get("alerts", "vib_warn").unwrap().value,
            ParameterValue::Number(30.0)
        );
    }

    #[test]
    fn update_validates_range() {
        let mut set = ParameterSet::default();
        let err = set
            .update("alerts", "vib_warn", ParameterValue::Number(500.0))
            .unwrap_err();
        assert!(matches!(err, ParameterError::OutOfRange { .. }));
        assert!(!set.has_changes());

        set.update("alerts", "vib_warn", ParameterValue::Number(40.0))
            .unwrap();
        assert!(set.has_changes());
    }

    #[test]
    fn update_validates_kind_and_options() {
        let mut set = ParameterSet::default();
        assert!(matches!(
            set.update("model", "retrain_enabled", ParameterValue::Number(1.0)),
            Err(ParameterError::TypeMismatch { .. })
        ));
        assert!(matches!(
            set.update("model", "model_version", ParameterValue::Text("v9".into())),
            Err(ParameterError::InvalidOption { .. })
        ));
        assert!(matches!(
            set.update("nope", "x", ParameterValue::Toggle(true)),
            Err(ParameterError::UnknownSection(_))
        ));
    }

    #[test]
    fn input_parsing_follows_kind() {
        let mut set = ParameterSet::default();
        set.update_from_input("security", "mfa_required", "off")
            .unwrap();
        set.update_from_input("data", "sample_rate", "10Hz").unwrap();
        set.update_from_input("model", "confidence_thresh", "0.9")
            .unwrap();
        assert_eq!(
            set.get("security", "mfa_required").unwrap().value,
            ParameterValue::Toggle(false)
        );
        assert!(set
            .update_from_input("model", "confidence_thresh", "high")
            .is_err());
    }

    #[test]
    fn save_and_reset_lifecycle() {
        let mut set = ParameterSet::default();
        set.update_from_input("alerts", "temp_warn", "60").unwrap();
        set.begin_save();
        assert_eq!(set.save_status(), SaveStatus::Saving);
        set.finish_save();
        assert!(!set.has_changes());
        assert_eq!(set.save_status(), SaveStatus::Saved);
        set.acknowledge_save();
        assert_eq!(set.save_status(), SaveStatus::Idle);

        set.update_from_input("alerts", "temp_warn", "70").unwrap();
        set.reset();
        assert_eq!(set, ParameterSet::default());
    }
}
