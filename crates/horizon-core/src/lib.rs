//! horizon-core - Core types for the HorizonOps console
//!
//! This crate holds everything the console needs that does not touch the
//! network: the telemetry/fleet/log/security models with their closed
//! status enums, the session store and its persistence, the authenticator
//! seam, the navigation shell, the sliding window used by polling views,
//! the parameter catalogue and the synthetic data generators.

pub mod auth;
pub mod error;
pub mod models;
pub mod parameters;
pub mod routing;
pub mod session;
pub mod synthetic;
pub mod window;

pub use auth::{AuthError, Authenticator, Credentials, StubAuthenticator};
pub use error::{ParameterError, ValidationError};
pub use models::*;
pub use parameters::{
    Parameter, ParameterKind, ParameterSection, ParameterSet, ParameterValue, SaveStatus,
};
pub use routing::{Navigator, Route};
pub use session::{
    FileSessionStorage, Identity, MemorySessionStorage, ModeBanner, Session, SessionError,
    SessionMode, SessionStorage, SessionStore,
};
pub use window::SlidingWindow;
