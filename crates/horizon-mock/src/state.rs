//! Shared state for the mock handlers

use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Largest history page served
pub const MAX_HISTORY_LIMIT: usize = 1000;
/// History page size when `limit` is absent
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct MockState {
    rng: Arc<Mutex<StdRng>>,
}

impl MockState {
    /// State with an entropy-seeded generator
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic state for tests and reproducible demos
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Run `f` with exclusive access to the generator
    pub fn with_rng<R>(&self, f: impl FnOnce(&mut StdRng) -> R) -> R {
        f(&mut self.rng.lock())
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self::new()
    }
}
