//! horizon-views - Dashboard view controllers
//!
//! One controller per dashboard page. The controllers own the view-local
//! state and the polling lifecycle; rendering is left to the caller.
//!
//! | View | Data | Refresh |
//! |---|---|---|
//! | [`ConsoleView`] | synthetic strip + `/predict` | 3s |
//! | [`TelemetryView`] | `/telemetry/{id}` then `/latest` | 2s |
//! | [`FleetView`] | `/health/fleet` | 10s |
//! | [`KernelLogView`] | synthetic | 3s |
//! | [`SecurityView`] | seeded events | - |
//! | [`ParametersView`] | local catalogue | - |

pub mod console;
pub mod fleet;
pub mod logs;
pub mod parameters;
pub mod security;
pub mod telemetry;

pub use console::{AnalysisState, ConsoleSource, ConsoleView, CONSOLE_POLL_INTERVAL};
pub use fleet::{FleetSource, FleetView, FLEET_POLL_INTERVAL};
pub use logs::{KernelLogSource, KernelLogView, LogExport, LOG_POLL_INTERVAL, LOG_WINDOW};
pub use parameters::{ParametersView, SAVE_LATENCY};
pub use security::SecurityView;
pub use telemetry::{
    default_machine, MetricCard, TelemetrySource, TelemetryView, TELEMETRY_POLL_INTERVAL,
    TELEMETRY_WINDOW,
};
