//! Command implementations for the horizon CLI

pub mod auth;
pub mod console;
pub mod fleet;
pub mod logs;
pub mod open;
pub mod parameters;
pub mod predict;
pub mod security;
pub mod telemetry;

pub use console::{console, ConsoleArgs};
pub use fleet::{fleet, FleetArgs};
pub use logs::{logs, LogsArgs};
pub use parameters::{parameters, Assignment, ParametersArgs};
pub use predict::predict;
pub use security::security;
pub use telemetry::{telemetry, TelemetryArgs};
