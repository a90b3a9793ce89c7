//! Session state for the console
//!
//! A session is either a guest session (no identity) or a demo /
//! authenticated session carrying an [`Identity`]. The invariant is
//! enforced by construction: [`Session`] can only be built through
//! [`Session::guest`], [`Session::demo`] and [`Session::authenticated`].

mod storage;
mod store;

pub use storage::{
    FileSessionStorage, MemorySessionStorage, SessionError, SessionStorage, IDENTITY_KEY, MODE_KEY,
};
pub use store::SessionStore;

use serde::{Deserialize, Serialize};

use crate::models::{status_enum_str, Tone};

/// Who is using the console, and in what capacity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    #[default]
    Guest,
    Demo,
    Authenticated,
}

status_enum_str!(SessionMode, "session mode", {
    Guest => "guest",
    Demo => "demo",
    Authenticated => "authenticated",
});

impl SessionMode {
    /// Whether this mode carries an identity
    pub fn has_identity(&self) -> bool {
        matches!(self, SessionMode::Demo | SessionMode::Authenticated)
    }

    /// Banner shown in the shell header
    pub fn banner(&self) -> ModeBanner {
        match self {
            SessionMode::Demo => ModeBanner {
                label: "DEMO MODE",
                description: "Viewing simulated data",
                tone: Tone::Info,
            },
            SessionMode::Guest => ModeBanner {
                label: "GUEST",
                description: "Temporary session",
                tone: Tone::Muted,
            },
            SessionMode::Authenticated => ModeBanner {
                label: "AUTHENTICATED",
                description: "Personal data",
                tone: Tone::Positive,
            },
        }
    }
}

/// Header banner for a session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeBanner {
    pub label: &'static str,
    pub description: &'static str,
    pub tone: Tone,
}

/// Identity attached to demo and authenticated sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub role: String,
}

impl Identity {
    /// Fixed identity used for demo sessions
    pub fn demo() -> Self {
        Self {
            email: "demo@horizonops.io".to_string(),
            display_name: "Demo User".to_string(),
            role: "demo".to_string(),
        }
    }
}

/// Current session: mode plus optional identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    mode: SessionMode,
    identity: Option<Identity>,
}

impl Session {
    pub fn guest() -> Self {
        Self {
            mode: SessionMode::Guest,
            identity: None,
        }
    }

    pub fn demo() -> Self {
        Self {
            mode: SessionMode::Demo,
            identity: Some(Identity::demo()),
        }
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            mode: SessionMode::Authenticated,
            identity: Some(identity),
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_demo(&self) -> bool {
        self.mode == SessionMode::Demo
    }

    pub fn is_guest(&self) -> bool {
        self.mode == SessionMode::Guest
    }

    pub fn is_authenticated(&self) -> bool {
        self.mode == SessionMode::Authenticated
    }

    pub fn banner(&self) -> ModeBanner {
        self.mode.banner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_hold_invariant() {
        for session in [
            Session::guest(),
            Session::demo(),
            Session::authenticated(Identity::demo()),
        ] {
            assert_eq!(session.identity().is_some(), session.mode().has_identity());
        }
    }

    #[test]
    fn identity_uses_name_key() {
        let json = serde_json::to_value(Identity::demo()).unwrap();
        assert_eq!(json["name"], "Demo User");
        assert!(json.get("display_name").is_none());
    }

    #[test]
    fn banners() {
        assert_eq!(Session::demo().banner().label, "DEMO MODE");
        assert_eq!(Session::guest().banner().description, "Temporary session");
    }
}
