//! Parameters view: edits the parameter catalogue and simulates saving it

use std::sync::Arc;
use std::time::Duration;

use horizon_core::{ParameterError, ParameterSet, ParameterValue, SaveStatus};
use parking_lot::RwLock;
use tracing::{debug, info};

/// Simulated persistence latency
pub const SAVE_LATENCY: Duration = Duration::from_millis(500);

/// Controller for the Parameters page
#[derive(Debug, Clone)]
pub struct ParametersView {
    set: Arc<RwLock<ParameterSet>>,
    save_latency: Duration,
}

impl ParametersView {
    pub fn new() -> Self {
        Self::with_save_latency(SAVE_LATENCY)
    }

    pub fn with_save_latency(save_latency: Duration) -> Self {
        Self {
            set: Arc::new(RwLock::new(ParameterSet::default())),
            save_latency,
        }
    }

    pub fn snapshot(&self) -> ParameterSet {
        self.set.read().clone()
    }

    pub fn has_changes(&self) -> bool {
        self.set.read().has_changes()
    }

    pub fn save_status(&self) -> SaveStatus {
        self.set.read().save_status()
    }

    pub fn update(
        &self,
        section: &str,
        param: &str,
        value: ParameterValue,
    ) -> Result<(), ParameterError> {
        self.set.write().update(section, param, value)?;
        debug!(section, param, "Parameter updated");
        Ok(())
    }

    /// Parse a typed-in value and apply it
    pub fn update_from_input(&self, section: &str, param: &str, raw: &str) -> Result<(), ParameterError> {
        self.set.write().update_from_input(section, param, raw)?;
        debug!(section, param, raw, "Parameter updated");
        Ok(())
    }

    /// Persist pending changes: idle -> saving -> saved
    pub async fn save(&self) {
        self.set.write().begin_save();
        tokio::time::sleep(self.save_latency).await;
        self.set.write().finish_save();
        info!("Parameters saved");
    }

    pub fn acknowledge_save(&self) {
        self.set.write().acknowledge_save();
    }

    /// Restore the shipped defaults
    pub fn reset(&self) {
        self.set.write().reset();
        info!("Parameters reset to defaults");
    }
}

impl Default for ParametersView {
    fn default() -> Self {
        Self::new()
    }
}
