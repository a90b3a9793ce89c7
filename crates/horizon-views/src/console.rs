//! Command Console view
//!
//! A synthetic telemetry strip for one asset, refreshed every three
//! seconds. An anomalous point while the system is nominal raises a
//! critical console log and moves the status to degraded. AI analysis
//! posts the newest point to the prediction service.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use horizon_client::{
    ApiError, HorizonClient, PollSource, PollUpdate, PollingConfig, PollingView,
};
use horizon_core::synthetic::{
    anomaly_log, initial_console_points, next_console_point, CONSOLE_LOG_CAPACITY, CONSOLE_POINTS,
};
use horizon_core::{
    ConsoleLogEntry, ConsolePoint, Prediction, PredictionRequest, SlidingWindow, SystemStatus,
    MACHINES,
};
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

pub const CONSOLE_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Status and console log shared between the feed and the view
struct ConsoleStatus {
    system: SystemStatus,
    log: SlidingWindow<ConsoleLogEntry>,
    last: Option<ConsolePoint>,
}

/// Synthetic console feed
pub struct ConsoleSource {
    rng: Mutex<StdRng>,
    status: RwLock<ConsoleStatus>,
}

impl ConsoleSource {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            status: RwLock::new(ConsoleStatus {
                system: SystemStatus::Nominal,
                log: SlidingWindow::new(CONSOLE_LOG_CAPACITY),
                last: None,
            }),
        }
    }

    pub fn system_status(&self) -> SystemStatus {
        self.status.read().system
    }

    /// Console log, newest first
    pub fn log(&self) -> Vec<ConsoleLogEntry> {
        self.status.read().log.iter_newest_first().cloned().collect()
    }

    /// Feed a point through the anomaly check
    fn observe(&self, point: &ConsolePoint) {
        let mut status = self.status.write();
        if point.anomaly && status.system == SystemStatus::Nominal {
            let entry = anomaly_log(point, Utc::now());
            warn!(vibration = point.vibration, "{}", entry.message);
            status.log.push(entry);
            status.system = SystemStatus::Degraded;
        }
        status.last = Some(point.clone());
    }
}

impl Default for ConsoleSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PollSource for ConsoleSource {
    type Key = ();
    type Item = ConsolePoint;

    async fn initial(&self, _key: &()) -> Result<Vec<ConsolePoint>, ApiError> {
        let points = initial_console_points(&mut *self.rng.lock());
        self.status.write().last = points.last().cloned();
        Ok(points)
    }

    async fn poll(&self, _key: &()) -> Result<PollUpdate<ConsolePoint>, ApiError> {
        let last = self.status.read().last.clone();
        let time = Utc::now().format("%H:%M:%S").to_string();
        let point = next_console_point(&mut *self.rng.lock(), last.as_ref(), time);
        self.observe(&point);
        Ok(PollUpdate::Append(point))
    }
}

/// Result of the last AI analysis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisState {
    pub is_analyzing: bool,
    pub insight: Option<String>,
    pub error: Option<String>,
}

/// Controller for the Command Console page
pub struct ConsoleView {
    view: PollingView<ConsoleSource>,
    client: HorizonClient,
    machine_id: String,
    analysis: RwLock<AnalysisState>,
}

impl ConsoleView {
    pub fn new(client: HorizonClient) -> Self {
        Self::with_source(
            client,
            ConsoleSource::new(),
            PollingConfig::new(CONSOLE_POLL_INTERVAL, CONSOLE_POINTS),
        )
    }

    pub fn with_source(client: HorizonClient, source: ConsoleSource, config: PollingConfig) -> Self {
        Self {
            view: PollingView::new(source, config),
            client,
            machine_id: MACHINES[0].to_string(),
            analysis: RwLock::new(AnalysisState::default()),
        }
    }

    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }

    pub fn open(&self) {
        self.view.mount(());
    }

    pub fn close(&self) {
        self.view.unmount();
    }

    /// Telemetry strip, oldest first
    pub fn points(&self) -> Vec<ConsolePoint> {
        self.view.state().items.to_vec()
    }

    pub fn latest(&self) -> Option<ConsolePoint> {
        self.view.state().items.newest().cloned()
    }

    pub fn system_status(&self) -> SystemStatus {
        self.view.source().system_status()
    }

    pub fn log(&self) -> Vec<ConsoleLogEntry> {
        self.view.source().log()
    }

    pub fn analysis(&self) -> AnalysisState {
        self.analysis.read().clone()
    }

    /// Post the newest point to the prediction service
    ///
    /// Returns `Ok(None)` when there is no point to analyse yet.
    pub async fn analyze(&self) -> Result<Option<Prediction>, ApiError> {
        let Some(point) = self.latest() else {
            return Ok(None);
        };

        *self.analysis.write() = AnalysisState {
            is_analyzing: true,
            ..Default::default()
        };

        let request = PredictionRequest {
            machine_id: self.machine_id.clone(),
            features: point.feature_snapshot(self.system_status()),
        };
        let result = self.client.predict(&request).await;

        let mut analysis = self.analysis.write();
        analysis.is_analyzing = false;
        match result {
            Ok(prediction) => {
                let insight = prediction.insight();
                info!(machine_id = %self.machine_id, %insight, "Analysis complete");
                analysis.insight = Some(insight);
                Ok(Some(prediction))
            }
            Err(e) => {
                warn!(machine_id = %self.machine_id, %e, "Analysis failed");
                analysis.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn polling(&self) -> &PollingView<ConsoleSource> {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(vibration: f64, anomaly: bool) -> ConsolePoint {
        ConsolePoint {
            time: "10:00:00".into(),
            vibration,
            temp: 43.0,
            power: 12.2,
            anomaly,
        }
    }

    #[test]
    fn anomaly_degrades_once() {
        let source = ConsoleSource::seeded(1);
        source.observe(&point(22.0, false));
        assert_eq!(source.system_status(), SystemStatus::Nominal);
        assert!(source.log().is_empty());

        source.observe(&point(61.3, true));
        assert_eq!(source.system_status(), SystemStatus::Degraded);
        let log = source.log();
        assert_eq!(log.len(), 1);
        assert_eq!(
            log[0].message,
            "Anomaly: Spindle vibration threshold exceeded (61.3Hz)"
        );

        // already degraded: no further entries
        source.observe(&point(70.0, true));
        assert_eq!(source.log().len(), 1);
    }

    #[tokio::test]
    async fn initial_strip_has_forty_points() {
        let source = ConsoleSource::seeded(9);
        let points = source.initial(&()).await.unwrap();
        assert_eq!(points.len(), CONSOLE_POINTS);
        assert_eq!(points[0].time, "0:00");

        let next = source.poll(&()).await.unwrap();
        assert!(matches!(next, PollUpdate::Append(_)));
    }
}
