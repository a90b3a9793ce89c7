//! Session scoping for the CLI
//!
//! Each terminal gets its own session file. The scope is taken from
//! `--session-scope` / `HORIZON_SESSION_SCOPE`, falling back to the parent
//! shell's process id.

use std::path::Path;
use std::sync::Arc;

use horizon_core::{FileSessionStorage, SessionStore};
use tracing::debug;

/// Scope used when no explicit scope is given
pub fn default_scope() -> String {
    #[cfg(unix)]
    {
        format!("ppid-{}", std::os::unix::process::parent_id())
    }
    #[cfg(not(unix))]
    {
        "default".to_string()
    }
}

/// Restore the session store for `scope` under `dir`
pub fn open_store(dir: &Path, scope: Option<&str>) -> Arc<SessionStore> {
    let scope = scope
        .map(str::to_string)
        .unwrap_or_else(default_scope);
    let storage = FileSessionStorage::for_scope(dir, &scope);
    debug!(scope = %scope, path = %storage.path().display(), "Opening session storage");
    Arc::new(SessionStore::with_stub_auth(Arc::new(storage)))
}
