//! Kernel Logs view
//!
//! Starts from ten seeded entries and appends one synthetic entry every
//! three seconds, keeping the newest 100. Filtering, counts and export
//! work on whatever is currently held.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use horizon_client::{ApiError, PollSource, PollUpdate, PollingConfig, PollingView};
use horizon_core::synthetic::{random_log_entry, seeded_kernel_logs};
use horizon_core::{export_file_name, export_logs, LogCounts, LogEntry, LogFilter, LogLevel};
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const LOG_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const LOG_WINDOW: usize = 100;

/// Synthetic kernel log feed
pub struct KernelLogSource {
    rng: Mutex<StdRng>,
}

impl KernelLogSource {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl Default for KernelLogSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PollSource for KernelLogSource {
    type Key = ();
    type Item = LogEntry;

    async fn initial(&self, _key: &()) -> Result<Vec<LogEntry>, ApiError> {
        // seeded newest first; the window holds oldest first
        let mut entries = seeded_kernel_logs(Utc::now());
        entries.reverse();
        Ok(entries)
    }

    async fn poll(&self, _key: &()) -> Result<PollUpdate<LogEntry>, ApiError> {
        let entry = random_log_entry(&mut *self.rng.lock(), Utc::now());
        Ok(PollUpdate::Append(entry))
    }
}

/// A log export ready to be written out
#[derive(Debug, Clone, PartialEq)]
pub struct LogExport {
    pub file_name: String,
    pub contents: String,
}

/// Controller for the Kernel Logs page
pub struct KernelLogView {
    view: PollingView<KernelLogSource>,
    filter: RwLock<LogFilter>,
}

impl KernelLogView {
    pub fn new() -> Self {
        Self::with_source(
            KernelLogSource::new(),
            PollingConfig::new(LOG_POLL_INTERVAL, LOG_WINDOW),
        )
    }

    pub fn with_source(source: KernelLogSource, config: PollingConfig) -> Self {
        Self {
            view: PollingView::new(source, config),
            filter: RwLock::new(LogFilter::default()),
        }
    }

    pub fn open(&self) {
        self.view.mount(());
    }

    pub fn close(&self) {
        self.view.unmount();
    }

    /// Show one level only, or all levels with `None`
    pub fn set_level(&self, level: Option<LogLevel>) {
        self.filter.write().level = level;
    }

    pub fn set_search(&self, search: impl Into<String>) {
        self.filter.write().search = search.into();
    }

    pub fn filter(&self) -> LogFilter {
        self.filter.read().clone()
    }

    /// All held entries, newest first
    pub fn all_entries(&self) -> Vec<LogEntry> {
        self.view
            .state()
            .items
            .iter_newest_first()
            .cloned()
            .collect()
    }

    /// Entries passing the current filter, newest first
    pub fn entries(&self) -> Vec<LogEntry> {
        let filter = self.filter();
        self.all_entries()
            .into_iter()
            .filter(|entry| filter.matches(entry))
            .collect()
    }

    /// Per-level counts over all held entries
    pub fn counts(&self) -> LogCounts {
        LogCounts::tally(&self.all_entries())
    }

    pub fn clear(&self) {
        self.view.clear();
    }

    /// Export the filtered entries
    pub fn export(&self, now: DateTime<Utc>) -> LogExport {
        LogExport {
            file_name: export_file_name(now),
            contents: export_logs(&self.entries()),
        }
    }

    pub fn polling(&self) -> &PollingView<KernelLogSource> {
        &self.view
    }
}

impl Default for KernelLogView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_client::testing::wait_for;

    async fn holds_at_least(view: &KernelLogView, n: usize) -> bool {
        wait_for(
            || async move { view.all_entries().len() >= n },
            Duration::from_secs(2),
        )
        .await
    }

    fn fast_view() -> KernelLogView {
        KernelLogView::with_source(
            KernelLogSource::seeded(3),
            PollingConfig::new(Duration::from_millis(20), 12),
        )
    }

    #[tokio::test]
    async fn starts_with_seeded_entries_newest_first() {
        let view = KernelLogView::new();
        view.open();
        assert!(holds_at_least(&view, 10).await);

        let entries = view.all_entries();
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0].id, "1");
        assert_eq!(entries[9].id, "10");
        assert_eq!(view.counts().all, 10);
        assert_eq!(view.counts().get(LogLevel::Info), 4);
    }

    #[tokio::test]
    async fn window_caps_entries() {
        let view = fast_view();
        view.open();
        assert!(holds_at_least(&view, 12).await);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(view.all_entries().len(), 12);
    }

    #[tokio::test]
    async fn filter_and_search() {
        let view = KernelLogView::new();
        view.open();
        assert!(holds_at_least(&view, 10).await);

        view.set_level(Some(LogLevel::Warning));
        assert_eq!(view.entries().len(), 2);

        view.set_level(None);
        view.set_search("database");
        let found = view.entries();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source, "DATABASE");
    }

    #[tokio::test]
    async fn clear_then_export() {
        let view = KernelLogView::new();
        view.open();
        assert!(holds_at_least(&view, 10).await);

        let now = Utc::now();
        let export = view.export(now);
        assert_eq!(export.file_name, export_file_name(now));
        assert_eq!(export.contents.lines().count(), 10);

        view.clear();
        assert!(view.all_entries().is_empty());
        assert!(view.export(now).contents.is_empty());
    }
}
