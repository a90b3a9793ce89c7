//! Typed client for the four HorizonOps endpoints

use std::sync::Arc;
use std::time::Duration;

use horizon_core::{
    FleetHealth, LatestReading, Prediction, PredictionRequest, PredictionResponse, SessionStore,
    TelemetryHistory, TelemetryReading,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{ApiError, Result};
use crate::executor::{RequestExecutor, RetryPolicy};
use crate::fetch::{fetch_once, FetchOutcome};
use crate::request::ApiRequest;

/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of historical readings requested by the telemetry view
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// URL-encode an id for use as a single path segment
fn encode_path_segment(id: &str) -> String {
    id.replace('%', "%25").replace('/', "%2F").replace('?', "%3F")
}

/// HorizonOps REST client
///
/// Cheap to clone; clones share the connection pool and the session.
#[derive(Debug, Clone)]
pub struct HorizonClient {
    http: Client,
    base_url: Url,
    policy: RetryPolicy,
    session: Option<Arc<SessionStore>>,
}

impl HorizonClient {
    /// Create a client with the default retry policy
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the API (e.g., "http://localhost:8000")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_policy(base_url, RetryPolicy::default())
    }

    /// Create a client with a custom retry policy
    ///
    /// The attempt ceiling is enforced by the executor, so the underlying
    /// HTTP client only carries a connect timeout.
    pub fn with_policy(base_url: &str, policy: RetryPolicy) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(policy.attempt_timeout))
            .build()
            .map_err(|e| ApiError::Setup(e.to_string()))?;
        let base_url = Url::parse(base_url)?;

        Ok(Self {
            http,
            base_url,
            policy,
            session: None,
        })
    }

    /// Attach the session store that is logged out on a 401
    pub fn with_session(mut self, session: Arc<SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn session(&self) -> Option<&Arc<SessionStore>> {
        self.session.as_ref()
    }

    /// Underlying HTTP client, for `fetch_once` calls
    pub fn http_client(&self) -> &Client {
        &self.http
    }

    /// A fresh executor bound to this client's policy and session
    pub fn executor<T>(&self) -> RequestExecutor<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        RequestExecutor::new(self.http.clone(), self.policy, self.session.clone())
    }

    // =========================================================================
    // Request builders
    // =========================================================================

    pub fn predict_request(&self, request: &PredictionRequest) -> Result<ApiRequest> {
        ApiRequest::post_json(self.base_url.join("/predict")?, request)
    }

    pub fn fleet_health_request(&self) -> Result<ApiRequest> {
        Ok(ApiRequest::get(self.base_url.join("/health/fleet")?))
    }

    pub fn telemetry_history_request(&self, machine_id: &str, limit: usize) -> Result<ApiRequest> {
        let mut url = self
            .base_url
            .join(&format!("/telemetry/{}", encode_path_segment(machine_id)))?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        Ok(ApiRequest::get(url))
    }

    pub fn telemetry_latest_request(&self, machine_id: &str) -> Result<ApiRequest> {
        let url = self.base_url.join(&format!(
            "/telemetry/{}/latest",
            encode_path_segment(machine_id)
        ))?;
        Ok(ApiRequest::get(url))
    }

    // =========================================================================
    // Endpoints
    // =========================================================================

    /// Run a risk prediction
    ///
    /// A response without a usable `risk_level` is a validation error.
    #[instrument(skip(self, request), fields(machine_id = %request.machine_id))]
    pub async fn predict(&self, request: &PredictionRequest) -> Result<Prediction> {
        let api_request = self.predict_request(request)?;
        let response: PredictionResponse = self.executor().execute(&api_request).await?;
        let prediction = response.validate()?;
        debug!(risk = %prediction.risk_level, score = prediction.risk_score, "Prediction received");
        Ok(prediction)
    }

    /// Fleet-wide health snapshot
    #[instrument(skip(self))]
    pub async fn fleet_health(&self) -> Result<FleetHealth> {
        let request = self.fleet_health_request()?;
        self.executor().execute(&request).await
    }

    /// Historical readings for one machine, oldest first
    #[instrument(skip(self))]
    pub async fn telemetry_history(
        &self,
        machine_id: &str,
        limit: usize,
    ) -> Result<Vec<TelemetryReading>> {
        let request = self.telemetry_history_request(machine_id, limit)?;
        let history: TelemetryHistory = self.executor().execute(&request).await?;
        Ok(history.data)
    }

    /// Newest reading for one machine, as a one-shot fetch
    #[instrument(skip(self))]
    pub async fn telemetry_latest(&self, machine_id: &str) -> FetchOutcome<LatestReading> {
        match self.telemetry_latest_request(machine_id) {
            Ok(request) => fetch_once(&self.http, &request).await,
            Err(e) => FetchOutcome::err(e.to_string()),
        }
    }
}
