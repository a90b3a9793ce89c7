//! Command console models

use serde::{Deserialize, Serialize};

use super::{status_enum_str, FeatureSnapshot, LogLevel, Tone};

/// Nominal power draw used to compute power deviation (kW)
pub const NOMINAL_POWER_KW: f64 = 12.0;

/// Overall console status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    #[default]
    Nominal,
    Degraded,
    Critical,
}

status_enum_str!(SystemStatus, "system status", {
    Nominal => "nominal",
    Degraded => "degraded",
    Critical => "critical",
});

impl SystemStatus {
    pub fn tone(&self) -> Tone {
        match self {
            SystemStatus::Nominal => Tone::Positive,
            SystemStatus::Degraded => Tone::Caution,
            SystemStatus::Critical => Tone::Danger,
        }
    }
}

/// One point on the console telemetry strip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolePoint {
    pub time: String,
    pub vibration: f64,
    pub temp: f64,
    pub power: f64,
    #[serde(default)]
    pub anomaly: bool,
}

impl ConsolePoint {
    /// Feature snapshot posted to the prediction service for this point
    pub fn feature_snapshot(&self, status: SystemStatus) -> FeatureSnapshot {
        FeatureSnapshot {
            vibration_rms: self.vibration,
            vibration_peak: self.vibration * 1.6,
            vibration_kurtosis: if status == SystemStatus::Degraded {
                5.2
            } else {
                3.2
            },
            temperature: self.temp,
            temp_rate_of_change: 0.1,
            power_consumption: self.power,
            power_deviation: ((self.power - NOMINAL_POWER_KW) / NOMINAL_POWER_KW) * 100.0,
            time_since_maintenance: 280.0,
            cumulative_cycles: 125_000,
        }
    }
}

/// Console event log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleLogEntry {
    pub id: String,
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}
