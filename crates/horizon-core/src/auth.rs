//! Authentication seam
//!
//! The console does not own a credential store. `SessionStore::login`
//! delegates to an [`Authenticator`]; the bundled [`StubAuthenticator`]
//! accepts any non-empty email/secret pair.

use async_trait::async_trait;
use thiserror::Error;

use crate::session::Identity;

/// Role assigned to identities produced by the stub authenticator
pub const OPERATOR_ROLE: &str = "operator";

/// Credentials submitted from the login page
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Authentication failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication service unavailable: {0}")]
    Unavailable(String),
}

/// External collaborator that turns credentials into an identity
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Identity, AuthError>;
}

/// Accepts any non-empty email and secret
///
/// The display name is the local part of the email address.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubAuthenticator;

#[async_trait]
impl Authenticator for StubAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        if credentials.email.is_empty() || credentials.secret.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let display_name = credentials
            .email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_string();

        Ok(Identity {
            email: credentials.email.clone(),
            display_name,
            role: OPERATOR_ROLE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_rejects_empty_fields() {
        let auth = StubAuthenticator;
        assert_eq!(
            auth.authenticate(&Credentials::new("", "x")).await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            auth.authenticate(&Credentials::new("x", "")).await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn stub_derives_display_name() {
        let identity = StubAuthenticator
            .authenticate(&Credentials::new("jane.doe@horizonops.io", "pw"))
            .await
            .unwrap();
        assert_eq!(identity.display_name, "jane.doe");
        assert_eq!(identity.role, OPERATOR_ROLE);
    }

    #[test]
    fn debug_redacts_secret() {
        let creds = Credentials::new("a@b.com", "hunter2");
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }
}
