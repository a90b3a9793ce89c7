//! Data models for telemetry, fleet health, logs and security events
//!
//! Status strings coming from external services or generators are parsed
//! into closed enums at the boundary. Presentation attributes are looked
//! up from those enums, never from raw strings.

use serde::{Deserialize, Serialize};

/// Presentation tone attached to a status value
///
/// Renderers map a tone to whatever their medium supports (terminal
/// colours, CSS classes, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Muted,
    Info,
    Positive,
    Caution,
    Warning,
    Danger,
}

/// Direction indicator shown next to a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Implements `FromStr` and `Display` for a lowercase status enum
macro_rules! status_enum_str {
    ($ty:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            /// All variants, in display order
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Wire representation
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = crate::error::ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($ty::$variant),)+
                    _ => Err(crate::error::ValidationError::unknown($kind, s)),
                }
            }
        }
    };
}

pub(crate) use status_enum_str;

mod console;
mod fleet;
mod log;
mod prediction;
mod security;
mod telemetry;

pub use console::*;
pub use fleet::*;
pub use log::*;
pub use prediction::*;
pub use security::*;
pub use telemetry::*;
