//! Session store: the single source of truth for the current session

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::storage::{SessionStorage, IDENTITY_KEY, MODE_KEY};
use super::{Identity, Session, SessionMode};
use crate::auth::{Authenticator, Credentials, StubAuthenticator};

/// Holds the current [`Session`] and mirrors it into [`SessionStorage`]
///
/// The store is constructed once and shared as `Arc<SessionStore>`. It is
/// only mutated through [`enter_demo`](Self::enter_demo),
/// [`enter_guest`](Self::enter_guest), [`login`](Self::login) and
/// [`logout`](Self::logout); each mutation writes through to storage
/// before returning.
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    authenticator: Arc<dyn Authenticator>,
    current: RwLock<Session>,
}

impl SessionStore {
    /// Restore the session persisted in `storage`, defaulting to guest
    pub fn restore(
        storage: Arc<dyn SessionStorage>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        let session = load_session(storage.as_ref());
        debug!(mode = %session.mode(), "Session restored");

        let store = Self {
            storage,
            authenticator,
            current: RwLock::new(Session::guest()),
        };
        store.replace(session);
        store
    }

    /// Restore with the stub authenticator
    pub fn with_stub_auth(storage: Arc<dyn SessionStorage>) -> Self {
        Self::restore(storage, Arc::new(StubAuthenticator))
    }

    /// Snapshot of the current session
    pub fn snapshot(&self) -> Session {
        self.current.read().clone()
    }

    pub fn mode(&self) -> SessionMode {
        self.current.read().mode()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.current.read().identity().cloned()
    }

    /// Switch to demo mode with the fixed demo identity
    pub fn enter_demo(&self) {
        self.replace(Session::demo());
        info!("Entered demo mode");
    }

    /// Switch to guest mode, dropping any identity
    pub fn enter_guest(&self) {
        self.replace(Session::guest());
        info!("Entered guest mode");
    }

    /// Authenticate and switch to authenticated mode
    ///
    /// Returns `false` and leaves the session untouched when the
    /// authenticator rejects the credentials.
    pub async fn login(&self, email: &str, secret: &str) -> bool {
        let credentials = Credentials::new(email, secret);
        match self.authenticator.authenticate(&credentials).await {
            Ok(identity) => {
                info!(email = %identity.email, "Login succeeded");
                self.replace(Session::authenticated(identity));
                true
            }
            Err(e) => {
                warn!(email, %e, "Login rejected");
                false
            }
        }
    }

    /// Reset to guest and clear persisted state
    pub fn logout(&self) {
        let mut current = self.current.write();
        *current = Session::guest();
        for key in [MODE_KEY, IDENTITY_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, %e, "Failed to clear session key");
            }
        }
        info!("Logged out");
    }

    /// Swap the session and mirror it into storage under the write lock
    fn replace(&self, session: Session) {
        let mut current = self.current.write();
        self.persist(&session);
        *current = session;
    }

    fn persist(&self, session: &Session) {
        if let Err(e) = self.storage.set(MODE_KEY, session.mode().as_str()) {
            warn!(%e, "Failed to persist session mode");
        }

        let identity_result = match session.identity() {
            Some(identity) => match serde_json::to_string(identity) {
                Ok(json) => self.storage.set(IDENTITY_KEY, &json),
                Err(e) => {
                    warn!(%e, "Failed to serialize identity");
                    Ok(())
                }
            },
            None => self.storage.remove(IDENTITY_KEY),
        };
        if let Err(e) = identity_result {
            warn!(%e, "Failed to persist session identity");
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.current.read())
            .finish_non_exhaustive()
    }
}

/// Read a persisted session, normalising anything that breaks the
/// identity invariant back to guest
fn load_session(storage: &dyn SessionStorage) -> Session {
    let mode = match storage.get(MODE_KEY) {
        Some(raw) => raw.parse::<SessionMode>().unwrap_or_else(|e| {
            warn!(%e, "Unknown persisted session mode, using guest");
            SessionMode::Guest
        }),
        None => SessionMode::Guest,
    };

    let identity = storage
        .get(IDENTITY_KEY)
        .and_then(|raw| match serde_json::from_str::<Identity>(&raw) {
            Ok(identity) => Some(identity),
            Err(e) => {
                warn!(%e, "Discarding unreadable persisted identity");
                None
            }
        });

    match (mode, identity) {
        (SessionMode::Guest, _) => Session::guest(),
        (SessionMode::Demo, Some(_)) => Session::demo(),
        (SessionMode::Authenticated, Some(identity)) => Session::authenticated(identity),
        (mode, None) => {
            warn!(%mode, "Persisted session has no identity, using guest");
            Session::guest()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStorage;

    fn store_with(storage: Arc<MemorySessionStorage>) -> SessionStore {
        SessionStore::with_stub_auth(storage)
    }

    fn assert_invariant(store: &SessionStore) {
        let session = store.snapshot();
        assert_eq!(session.identity().is_some(), session.mode().has_identity());
    }

    #[test]
    fn defaults_to_guest() {
        let storage = Arc::new(MemorySessionStorage::new());
        let store = store_with(storage.clone());
        assert_eq!(store.mode(), SessionMode::Guest);
        assert!(store.identity().is_none());
        assert_eq!(storage.get(MODE_KEY).as_deref(), Some("guest"));
        assert!(!storage.contains(IDENTITY_KEY));
    }

    #[tokio::test]
    async fn login_success() {
        let store = store_with(Arc::new(MemorySessionStorage::new()));
        assert!(store.login("a@b.com", "secret").await);
        assert_eq!(store.mode(), SessionMode::Authenticated);
        assert_eq!(store.identity().unwrap().display_name, "a");
    }

    #[tokio::test]
    async fn login_with_empty_field_leaves_mode() {
        let store = store_with(Arc::new(MemorySessionStorage::new()));
        store.enter_demo();
        assert!(!store.login("", "x").await);
        assert_eq!(store.mode(), SessionMode::Demo);
        assert!(!store.login("x", "").await);
        assert_eq!(store.mode(), SessionMode::Demo);
    }

    #[tokio::test]
    async fn invariant_holds_across_transitions() {
        let storage = Arc::new(MemorySessionStorage::new());
        let store = store_with(storage.clone());

        store.enter_demo();
        assert_invariant(&store);
        assert!(storage.contains(IDENTITY_KEY));

        store.enter_guest();
        assert_invariant(&store);
        assert!(!storage.contains(IDENTITY_KEY));

        store.login("ops@horizonops.io", "pw").await;
        assert_invariant(&store);

        store.logout();
        assert_invariant(&store);
        assert!(!storage.contains(MODE_KEY));
        assert!(!storage.contains(IDENTITY_KEY));

        store.enter_demo();
        store.enter_demo();
        assert_invariant(&store);
    }

    #[tokio::test]
    async fn restores_persisted_session() {
        let storage = Arc::new(MemorySessionStorage::new());
        {
            let store = store_with(storage.clone());
            store.login("pilot@horizonops.io", "pw").await;
        }
        let restored = store_with(storage);
        assert_eq!(restored.mode(), SessionMode::Authenticated);
        assert_eq!(restored.identity().unwrap().display_name, "pilot");
    }

    #[test]
    fn restore_normalises_broken_snapshots() {
        let storage = Arc::new(MemorySessionStorage::with_entries([(MODE_KEY, "demo")]));
        assert_eq!(store_with(storage).mode(), SessionMode::Guest);

        let storage = Arc::new(MemorySessionStorage::with_entries([(MODE_KEY, "root")]));
        assert_eq!(store_with(storage).mode(), SessionMode::Guest);

        let storage = Arc::new(MemorySessionStorage::with_entries([
            (MODE_KEY, "guest"),
            (IDENTITY_KEY, r#"{"email":"a@b.com","name":"a","role":"operator"}"#),
        ]));
        let store = store_with(storage.clone());
        assert!(store.identity().is_none());
        assert!(!storage.contains(IDENTITY_KEY));
    }
}
