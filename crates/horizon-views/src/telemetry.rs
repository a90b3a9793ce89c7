//! Live Telemetry view
//!
//! Loads the last 50 readings of the selected machine, then appends the
//! newest reading every two seconds. Switching machine cancels the running
//! poller before the next one starts.

use std::time::Duration;

use async_trait::async_trait;
use horizon_client::{
    ApiError, HorizonClient, PollSource, PollUpdate, PollingConfig, PollingView, ViewState,
    DEFAULT_HISTORY_LIMIT,
};
use horizon_core::{TelemetryReading, Tone, Trend, MACHINES};
use serde::Serialize;

pub const TELEMETRY_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const TELEMETRY_WINDOW: usize = 50;

/// Machine selected when the view first opens
pub fn default_machine() -> String {
    MACHINES[0].to_string()
}

/// Fetches history and latest readings for one machine
pub struct TelemetrySource {
    client: HorizonClient,
}

impl TelemetrySource {
    pub fn new(client: HorizonClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PollSource for TelemetrySource {
    type Key = String;
    type Item = TelemetryReading;

    async fn initial(&self, machine_id: &String) -> Result<Vec<TelemetryReading>, ApiError> {
        self.client
            .telemetry_history(machine_id, DEFAULT_HISTORY_LIMIT)
            .await
    }

    async fn poll(&self, machine_id: &String) -> Result<PollUpdate<TelemetryReading>, ApiError> {
        let latest = self
            .client
            .telemetry_latest(machine_id)
            .await
            .into_api_result()?;
        Ok(match latest.reading {
            Some(reading) => PollUpdate::Append(reading),
            None => PollUpdate::Nothing,
        })
    }
}

/// One card in the metric strip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: f64,
    pub unit: &'static str,
    pub trend: Trend,
    /// Short status note, e.g. `ELEVATED`
    pub note: Option<&'static str>,
    pub tone: Tone,
}

impl MetricCard {
    /// Cards for the latest reading
    pub fn for_reading(reading: &TelemetryReading) -> Vec<MetricCard> {
        let rising = |trend: Trend| {
            if trend == Trend::Up {
                Tone::Warning
            } else {
                Tone::Positive
            }
        };
        let vibration = reading.vibration_trend();
        let temperature = reading.temperature_trend();
        let elevated = reading.kurtosis_elevated();

        vec![
            MetricCard {
                label: "Vibration RMS",
                value: reading.vibration_rms,
                unit: "mm/s",
                trend: vibration,
                note: None,
                tone: rising(vibration),
            },
            MetricCard {
                label: "Temperature",
                value: reading.temperature,
                unit: "°C",
                trend: temperature,
                note: None,
                tone: rising(temperature),
            },
            MetricCard {
                label: "Power Draw",
                value: reading.power_consumption,
                unit: "kW",
                trend: Trend::Stable,
                note: None,
                tone: Tone::Info,
            },
            MetricCard {
                label: "Bearing Health",
                value: reading.vibration_kurtosis,
                unit: "kurtosis",
                trend: Trend::Stable,
                note: Some(if elevated { "ELEVATED" } else { "NORMAL" }),
                tone: if elevated { Tone::Warning } else { Tone::Positive },
            },
        ]
    }
}

/// Controller for the Live Telemetry page
pub struct TelemetryView {
    view: PollingView<TelemetrySource>,
}

impl TelemetryView {
    pub fn new(client: HorizonClient) -> Self {
        Self::with_config(
            client,
            PollingConfig::new(TELEMETRY_POLL_INTERVAL, TELEMETRY_WINDOW),
        )
    }

    pub fn with_config(client: HorizonClient, config: PollingConfig) -> Self {
        Self {
            view: PollingView::new(TelemetrySource::new(client), config),
        }
    }

    /// Start polling `machine_id`
    pub fn open(&self, machine_id: impl Into<String>) {
        self.view.mount(machine_id.into());
    }

    /// Select another machine
    pub fn select_machine(&self, machine_id: impl Into<String>) {
        self.view.switch_key(machine_id.into());
    }

    /// Re-run the initial fetch for the current machine
    pub fn refresh(&self) -> bool {
        self.view.retry()
    }

    pub fn close(&self) {
        self.view.unmount();
    }

    pub fn machine(&self) -> Option<String> {
        self.view.key()
    }

    pub fn state(&self) -> ViewState<String, TelemetryReading> {
        self.view.state()
    }

    pub fn latest(&self) -> Option<TelemetryReading> {
        self.view.state().items.newest().cloned()
    }

    pub fn metrics(&self) -> Vec<MetricCard> {
        self.latest()
            .map(|reading| MetricCard::for_reading(&reading))
            .unwrap_or_default()
    }

    pub fn polling(&self) -> &PollingView<TelemetrySource> {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(vibration_rms: f64, temperature: f64, kurtosis: f64) -> TelemetryReading {
        TelemetryReading {
            timestamp: "2026-01-01T00:00:00Z".into(),
            vibration_rms,
            vibration_peak: vibration_rms * 1.6,
            vibration_kurtosis: kurtosis,
            temperature,
            power_consumption: 12.1,
            anomaly_flag: false,
        }
    }

    #[test]
    fn calm_reading_is_stable() {
        let cards = MetricCard::for_reading(&reading(21.0, 44.0, 3.1));
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].trend, Trend::Stable);
        assert_eq!(cards[1].trend, Trend::Stable);
        assert_eq!(cards[3].note, Some("NORMAL"));
    }

    #[test]
    fn hot_reading_is_flagged() {
        let cards = MetricCard::for_reading(&reading(31.0, 58.0, 4.8));
        assert_eq!(cards[0].trend, Trend::Up);
        assert_eq!(cards[1].trend, Trend::Up);
        assert_eq!(cards[3].note, Some("ELEVATED"));
        assert_eq!(cards[3].tone, Tone::Warning);
    }

    #[test]
    fn first_machine_is_default() {
        assert_eq!(default_machine(), "CNC-ALPHA-921");
    }
}
