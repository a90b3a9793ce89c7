//! Fleet Network view: a full fleet snapshot refreshed every ten seconds

use std::time::Duration;

use async_trait::async_trait;
use horizon_client::{
    ApiError, HorizonClient, PollSource, PollUpdate, PollingConfig, PollingView,
};
use horizon_core::{FleetHealth, FleetSummary, MachineStatus};
use parking_lot::RwLock;

pub const FLEET_POLL_INTERVAL: Duration = Duration::from_secs(10);

pub struct FleetSource {
    client: HorizonClient,
}

impl FleetSource {
    pub fn new(client: HorizonClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PollSource for FleetSource {
    type Key = ();
    type Item = FleetHealth;

    async fn initial(&self, _key: &()) -> Result<Vec<FleetHealth>, ApiError> {
        Ok(vec![self.client.fleet_health().await?])
    }

    async fn poll(&self, _key: &()) -> Result<PollUpdate<FleetHealth>, ApiError> {
        Ok(PollUpdate::Replace(vec![self.client.fleet_health().await?]))
    }
}

/// Controller for the Fleet Network page
pub struct FleetView {
    view: PollingView<FleetSource>,
    selected: RwLock<Option<String>>,
}

impl FleetView {
    pub fn new(client: HorizonClient) -> Self {
        Self::with_interval(client, FLEET_POLL_INTERVAL)
    }

    pub fn with_interval(client: HorizonClient, interval: Duration) -> Self {
        Self {
            view: PollingView::new(FleetSource::new(client), PollingConfig::new(interval, 1)),
            selected: RwLock::new(None),
        }
    }

    pub fn open(&self) {
        self.view.mount(());
    }

    pub fn retry(&self) -> bool {
        self.view.retry()
    }

    pub fn close(&self) {
        self.view.unmount();
    }

    pub fn is_loading(&self) -> bool {
        self.view.state().is_loading
    }

    pub fn error(&self) -> Option<ApiError> {
        self.view.state().error
    }

    /// Latest snapshot, if one has loaded
    pub fn snapshot(&self) -> Option<FleetHealth> {
        self.view.state().items.newest().cloned()
    }

    pub fn summary(&self) -> Option<FleetSummary> {
        self.snapshot().map(|fleet| fleet.summary)
    }

    pub fn machines(&self) -> Vec<MachineStatus> {
        self.snapshot().map(|fleet| fleet.machines).unwrap_or_default()
    }

    /// Select a machine for the detail panel; selecting it again clears
    /// the selection
    pub fn toggle_selection(&self, machine_id: &str) {
        let mut selected = self.selected.write();
        if selected.as_deref() == Some(machine_id) {
            *selected = None;
        } else {
            *selected = Some(machine_id.to_string());
        }
    }

    pub fn clear_selection(&self) {
        *self.selected.write() = None;
    }

    pub fn selected_id(&self) -> Option<String> {
        self.selected.read().clone()
    }

    /// Detail of the selected machine in the latest snapshot
    pub fn selected_machine(&self) -> Option<MachineStatus> {
        let id = self.selected_id()?;
        self.snapshot()?.machine(&id).cloned()
    }

    pub fn polling(&self) -> &PollingView<FleetSource> {
        &self.view
    }
}
