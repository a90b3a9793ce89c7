//! Navigate by path, the way the browser address bar does

use horizon_core::{Navigator, Route};

use crate::output::OutputContext;

/// Resolve `path` through the guard; `None` means the login page was shown
pub fn resolve(nav: &mut Navigator, path: &str, ctx: &OutputContext) -> Option<Route> {
    match nav.navigate(path) {
        Route::Login => {
            if Route::from_path(path) != Some(Route::Login) {
                ctx.warn(&format!("{} redirects to login", path));
            }
            ctx.info("Sign in with `horizon login`, or use `horizon demo` / `horizon guest`");
            None
        }
        route => Some(route),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use horizon_core::{MemorySessionStorage, SessionStore};
    use std::sync::Arc;

    fn ctx() -> OutputContext {
        OutputContext::new(OutputFormat::Table, true, true, false)
    }

    #[test]
    fn dashboard_paths_resolve_with_a_session() {
        let store = SessionStore::with_stub_auth(Arc::new(MemorySessionStorage::new()));
        let mut nav = Navigator::new(Some(Arc::new(store)));

        assert_eq!(resolve(&mut nav, "/logs", &ctx()), Some(Route::Logs));
        assert_eq!(resolve(&mut nav, "/", &ctx()), None);
        assert_eq!(nav.current(), Route::Login);
    }

    #[test]
    fn no_session_lands_on_login() {
        let mut nav = Navigator::new(None);
        assert_eq!(resolve(&mut nav, "/fleet", &ctx()), None);
    }
}
