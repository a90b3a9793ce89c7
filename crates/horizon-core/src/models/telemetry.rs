//! Machine telemetry models

use serde::{Deserialize, Serialize};

use super::{FeatureSnapshot, Trend, NOMINAL_POWER_KW};

/// Machines known to the console, in selector order
pub const MACHINES: &[&str] = &[
    "CNC-ALPHA-921",
    "CNC-ALPHA-922",
    "CNC-BETA-101",
    "CNC-BETA-102",
    "MILL-GAMMA-301",
    "MILL-GAMMA-302",
    "LATHE-DELTA-401",
    "LATHE-DELTA-402",
];

/// Vibration RMS above this is shown as trending up (mm/s)
pub const VIBRATION_RMS_TREND_THRESHOLD: f64 = 25.0;
/// Temperature above this is shown as trending up (°C)
pub const TEMPERATURE_TREND_THRESHOLD: f64 = 50.0;
/// Kurtosis above this marks bearing health as elevated
pub const KURTOSIS_ELEVATED_THRESHOLD: f64 = 4.0;

/// A single sensor reading for one machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryReading {
    /// Reading timestamp as reported by the source
    pub timestamp: String,
    /// Vibration RMS (mm/s)
    pub vibration_rms: f64,
    /// Vibration peak amplitude (mm/s)
    pub vibration_peak: f64,
    /// Vibration kurtosis (bearing health, normal 3.0 ± 0.5)
    pub vibration_kurtosis: f64,
    /// Temperature (°C)
    pub temperature: f64,
    /// Power draw (kW)
    pub power_consumption: f64,
    /// Whether the source flagged this reading as anomalous
    #[serde(default)]
    pub anomaly_flag: bool,
}

impl TelemetryReading {
    pub fn vibration_trend(&self) -> Trend {
        if self.vibration_rms > VIBRATION_RMS_TREND_THRESHOLD {
            Trend::Up
        } else {
            Trend::Stable
        }
    }

    pub fn temperature_trend(&self) -> Trend {
        if self.temperature > TEMPERATURE_TREND_THRESHOLD {
            Trend::Up
        } else {
            Trend::Stable
        }
    }

    pub fn kurtosis_elevated(&self) -> bool {
        self.vibration_kurtosis > KURTOSIS_ELEVATED_THRESHOLD
    }

    /// Prediction features for this reading
    ///
    /// Maintenance age and cycle count are not part of a reading and use
    /// the console's fixed values.
    pub fn feature_snapshot(&self) -> FeatureSnapshot {
        FeatureSnapshot {
            vibration_rms: self.vibration_rms,
            vibration_peak: self.vibration_peak,
            vibration_kurtosis: self.vibration_kurtosis,
            temperature: self.temperature,
            temp_rate_of_change: 0.1,
            power_consumption: self.power_consumption,
            power_deviation: ((self.power_consumption - NOMINAL_POWER_KW) / NOMINAL_POWER_KW)
                * 100.0,
            time_since_maintenance: 280.0,
            cumulative_cycles: 125_000,
        }
    }
}

/// `GET /telemetry/:machine_id?limit=N` response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryHistory {
    #[serde(default)]
    pub data: Vec<TelemetryReading>,
}

/// `GET /telemetry/:machine_id/latest` response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LatestReading {
    #[serde(default)]
    pub reading: Option<TelemetryReading>,
}

/// Whether the id names a machine known to the console
pub fn is_known_machine(machine_id: &str) -> bool {
    MACHINES.contains(&machine_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(rms: f64, temp: f64, kurtosis: f64) -> TelemetryReading {
        TelemetryReading {
            timestamp: "12:00:00".into(),
            vibration_rms: rms,
            vibration_peak: rms * 1.6,
            vibration_kurtosis: kurtosis,
            temperature: temp,
            power_consumption: 12.1,
            anomaly_flag: false,
        }
    }

    #[test]
    fn trends_follow_thresholds() {
        let calm = reading(20.0, 45.0, 3.1);
        assert_eq!(calm.vibration_trend(), Trend::Stable);
        assert_eq!(calm.temperature_trend(), Trend::Stable);
        assert!(!calm.kurtosis_elevated());

        let hot = reading(30.0, 55.0, 4.5);
        assert_eq!(hot.vibration_trend(), Trend::Up);
        assert_eq!(hot.temperature_trend(), Trend::Up);
        assert!(hot.kurtosis_elevated());
    }

    #[test]
    fn latest_without_reading_deserializes() {
        let latest: LatestReading = serde_json::from_str("{}").unwrap();
        assert!(latest.reading.is_none());
    }

    #[test]
    fn reading_requires_fields() {
        let err = serde_json::from_str::<TelemetryReading>(r#"{"timestamp":"t"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn snapshot_keeps_measured_kurtosis() {
        let features = reading(22.0, 44.0, 4.4).feature_snapshot();
        assert!((features.vibration_kurtosis - 4.4).abs() < 1e-9);
        assert!((features.vibration_peak - 35.2).abs() < 1e-9);
    }

    #[test]
    fn known_machines() {
        assert!(is_known_machine("CNC-ALPHA-921"));
        assert!(!is_known_machine("CNC-OMEGA-000"));
    }
}
