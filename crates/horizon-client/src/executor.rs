//! Request executor: per-attempt timeout, retry with backoff and error
//! classification, with an observable {data, loading, error} state.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use horizon_core::SessionStore;
use parking_lot::RwLock;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ApiError, Result};
use crate::request::{classify_status, read_error_message, ApiRequest};

/// Default ceiling for a single attempt
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default number of automatic retries
pub const DEFAULT_MAX_RETRIES: u32 = 2;
/// Default backoff step before a retry after a network failure
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(1);

/// Retry behaviour of a [`RequestExecutor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub attempt_timeout: Duration,
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            backoff_unit: DEFAULT_BACKOFF_UNIT,
        }
    }
}

impl RetryPolicy {
    /// Total attempts including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay before retry `n` (1-based) after a network failure
    ///
    /// ```
    /// # use horizon_client::RetryPolicy;
    /// # use std::time::Duration;
    /// let policy = RetryPolicy::default();
    /// assert_eq!(policy.backoff(1), Duration::from_secs(1));
    /// assert_eq!(policy.backoff(2), Duration::from_secs(2));
    /// ```
    pub fn backoff(&self, retry: u32) -> Duration {
        self.backoff_unit * retry
    }
}

/// Derived phase of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestPhase {
    Idle,
    Loading,
    Success,
    Failure,
}

/// Observable state of the most recent call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<ApiError>,
    /// Attempts made by the most recent call
    pub attempts: u32,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
            attempts: 0,
        }
    }
}

impl<T> RequestState<T> {
    pub fn phase(&self) -> RequestPhase {
        if self.is_loading {
            RequestPhase::Loading
        } else if self.error.is_some() {
            RequestPhase::Failure
        } else if self.data.is_some() {
            RequestPhase::Success
        } else {
            RequestPhase::Idle
        }
    }
}

/// Runs one logical request at a time with bounded latency and bounded
/// recovery from transient failures
///
/// - 2xx: body parsed into `T`
/// - 401: the session is logged out, `AuthExpired`
/// - 403 / 404 / 5xx / other 4xx: classified, never retried
/// - attempt timeout: retried immediately while retries remain
/// - network failure: retried after `backoff(n)` while retries remain
pub struct RequestExecutor<T> {
    http: Client,
    session: Option<Arc<SessionStore>>,
    policy: RetryPolicy,
    state: Arc<RwLock<RequestState<T>>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> RequestExecutor<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn new(http: Client, policy: RetryPolicy, session: Option<Arc<SessionStore>>) -> Self {
        Self {
            http,
            session,
            policy,
            state: Arc::new(RwLock::new(RequestState::default())),
            _marker: PhantomData,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Snapshot of the current state
    pub fn state(&self) -> RequestState<T> {
        self.state.read().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.state.read().data.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading
    }

    pub fn error(&self) -> Option<ApiError> {
        self.state.read().error.clone()
    }

    /// Clear data, loading flag and error without issuing a request
    pub fn reset(&self) {
        *self.state.write() = RequestState::default();
    }

    /// Replace the data only
    pub fn set_data(&self, data: Option<T>) {
        self.state.write().data = data;
    }

    /// Execute `request`, retrying transient failures per the policy
    pub async fn execute(&self, request: &ApiRequest) -> Result<T> {
        {
            let mut state = self.state.write();
            state.is_loading = true;
            state.error = None;
            state.attempts = 0;
        }

        let mut retries_remaining = self.policy.max_retries;
        let mut attempt: u32 = 0;

        let result = loop {
            attempt += 1;
            self.state.write().attempts = attempt;

            let outcome =
                match tokio::time::timeout(self.policy.attempt_timeout, self.attempt(request)).await
                {
                    Ok(outcome) => outcome,
                    Err(_) => Err(ApiError::Timeout),
                };

            match outcome {
                Ok(data) => break Ok(data),
                Err(e) if e.is_transient() && retries_remaining > 0 => {
                    let retry = self.policy.max_retries - retries_remaining + 1;
                    warn!(
                        attempt,
                        retries_remaining,
                        url = %request.url(),
                        %e,
                        "Request failed, retrying"
                    );
                    if matches!(e, ApiError::NetworkFailure(_)) {
                        tokio::time::sleep(self.policy.backoff(retry)).await;
                    }
                    retries_remaining -= 1;
                }
                Err(e) => break Err(e),
            }
        };

        let mut state = self.state.write();
        state.is_loading = false;
        match &result {
            Ok(data) => {
                debug!(attempt, url = %request.url(), "Request succeeded");
                state.data = Some(data.clone());
                state.error = None;
            }
            Err(e) => {
                debug!(attempt, url = %request.url(), %e, "Request failed");
                state.data = None;
                state.error = Some(e.clone());
            }
        }
        result
    }

    /// A single attempt, without timeout
    async fn attempt(&self, request: &ApiRequest) -> Result<T> {
        let response = request
            .build(&self.http)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ApiError::from_transport(&e));
        }

        let message = read_error_message(response).await;
        let error = classify_status(status, message);
        if error.is_auth_expired() {
            if let Some(session) = &self.session {
                info!("Received 401, logging out");
                session.logout();
            }
        }
        Err(error)
    }
}

/// A clone shares the HTTP client, session and policy but starts with its
/// own empty state
impl<T> Clone for RequestExecutor<T> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            session: self.session.clone(),
            policy: self.policy,
            state: Arc::new(RwLock::new(RequestState::default())),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for RequestExecutor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.attempt_timeout, Duration::from_secs(30));
    }

    #[test]
    fn phase_is_derived() {
        let mut state: RequestState<u32> = RequestState::default();
        assert_eq!(state.phase(), RequestPhase::Idle);
        state.is_loading = true;
        assert_eq!(state.phase(), RequestPhase::Loading);
        state.is_loading = false;
        state.data = Some(1);
        assert_eq!(state.phase(), RequestPhase::Success);
        state.error = Some(ApiError::Timeout);
        assert_eq!(state.phase(), RequestPhase::Failure);
    }

    #[tokio::test]
    async fn reset_and_set_data() {
        let executor: RequestExecutor<u32> =
            RequestExecutor::new(Client::new(), RetryPolicy::default(), None);
        executor.set_data(Some(7));
        assert_eq!(executor.data(), Some(7));
        executor.reset();
        assert_eq!(executor.state(), RequestState::default());
    }
}
