//! Navigation shell: route table and access guard
//!
//! Dashboard routes are reachable only once a session store exists. Guest,
//! demo and authenticated sessions all pass the guard; only a shell that
//! was never given a store is sent to the login page. Unknown paths and
//! the bare root also resolve to login.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::session::SessionStore;

/// Pages of the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Login,
    Console,
    Telemetry,
    Security,
    Fleet,
    Logs,
    Parameters,
}

impl Route {
    /// Dashboard pages, in navigation order
    pub const DASHBOARD: [Route; 6] = [
        Route::Console,
        Route::Telemetry,
        Route::Security,
        Route::Fleet,
        Route::Logs,
        Route::Parameters,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Console => "/console",
            Route::Telemetry => "/telemetry",
            Route::Security => "/security",
            Route::Fleet => "/fleet",
            Route::Logs => "/logs",
            Route::Parameters => "/parameters",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Console => "Command Console",
            Route::Telemetry => "Live Telemetry",
            Route::Security => "Security Core",
            Route::Fleet => "Fleet Network",
            Route::Logs => "Kernel Logs",
            Route::Parameters => "Parameters",
        }
    }

    pub fn is_dashboard(&self) -> bool {
        !matches!(self, Route::Login)
    }

    /// Match a path against the route table, ignoring guards
    ///
    /// ```
    /// # use horizon_core::routing::Route;
    /// assert_eq!(Route::from_path("/fleet"), Some(Route::Fleet));
    /// assert_eq!(Route::from_path("logs/"), Some(Route::Logs));
    /// assert_eq!(Route::from_path("/"), None);
    /// ```
    pub fn from_path(path: &str) -> Option<Route> {
        let normalized = path.trim().trim_matches('/').to_ascii_lowercase();
        match normalized.as_str() {
            "login" => Some(Route::Login),
            "console" => Some(Route::Console),
            "telemetry" => Some(Route::Telemetry),
            "security" => Some(Route::Security),
            "fleet" => Some(Route::Fleet),
            "logs" => Some(Route::Logs),
            "parameters" => Some(Route::Parameters),
            _ => None,
        }
    }

    /// Resolve a path, applying the session guard
    pub fn resolve(path: &str, session_initialized: bool) -> Route {
        match Route::from_path(path) {
            Some(route) if route.is_dashboard() && !session_initialized => Route::Login,
            Some(route) => route,
            None => Route::Login,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Tracks the current page and applies the guard on every transition
#[derive(Debug)]
pub struct Navigator {
    session: Option<Arc<SessionStore>>,
    current: Route,
}

impl Navigator {
    pub fn new(session: Option<Arc<SessionStore>>) -> Self {
        Self {
            session,
            current: Route::Login,
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    pub fn session(&self) -> Option<&Arc<SessionStore>> {
        self.session.as_ref()
    }

    /// Navigate to `path`; returns the page actually shown
    pub fn navigate(&mut self, path: &str) -> Route {
        let route = Route::resolve(path, self.session.is_some());
        debug!(path, route = %route, "Navigate");
        self.current = route;
        route
    }

    /// Log out and return to the login page
    pub fn logout(&mut self) -> Route {
        if let Some(session) = &self.session {
            session.logout();
        }
        self.current = Route::Login;
        self.current
    }

    /// Send the user back to login without touching the session
    pub fn go_home(&mut self) -> Route {
        self.current = Route::Login;
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemorySessionStorage, SessionMode};

    #[test]
    fn root_and_unknown_redirect_to_login() {
        assert_eq!(Route::resolve("/", true), Route::Login);
        assert_eq!(Route::resolve("", true), Route::Login);
        assert_eq!(Route::resolve("/reactor", true), Route::Login);
    }

    #[test]
    fn dashboard_requires_session() {
        for route in Route::DASHBOARD {
            assert_eq!(Route::resolve(route.path(), false), Route::Login);
            assert_eq!(Route::resolve(route.path(), true), route);
        }
    }

    #[test]
    fn guest_session_passes_guard() {
        let store = Arc::new(SessionStore::with_stub_auth(Arc::new(
            MemorySessionStorage::new(),
        )));
        assert_eq!(store.mode(), SessionMode::Guest);

        let mut nav = Navigator::new(Some(store));
        assert_eq!(nav.navigate("/telemetry"), Route::Telemetry);
        assert_eq!(nav.current(), Route::Telemetry);
    }

    #[test]
    fn uninitialized_shell_stays_on_login() {
        let mut nav = Navigator::new(None);
        assert_eq!(nav.navigate("/fleet"), Route::Login);
    }

    #[test]
    fn logout_clears_session() {
        let store = Arc::new(SessionStore::with_stub_auth(Arc::new(
            MemorySessionStorage::new(),
        )));
        store.enter_demo();
        let mut nav = Navigator::new(Some(store.clone()));
        nav.navigate("/logs");
        assert_eq!(nav.logout(), Route::Login);
        assert_eq!(store.mode(), SessionMode::Guest);
    }
}
