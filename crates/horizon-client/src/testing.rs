//! Test utilities for horizon-client
//!
//! Provides helpers for running integration tests against an in-process
//! axum router.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::{ApiError, HorizonClient, Result, RetryPolicy};

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: HorizonClient,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Start serving `router` on an ephemeral port
    ///
    /// # Example
    ///
    /// ```ignore
    /// use horizon_client::testing::TestServer;
    ///
    /// let server = TestServer::start(horizon_mock::create_router(state)).await?;
    /// let fleet = server.client.fleet_health().await?;
    /// ```
    pub async fn start<S>(router: axum::Router<S>) -> Result<Self>
    where
        S: Clone + Send + Sync + 'static,
        axum::Router<S>: Into<axum::Router>,
    {
        Self::start_with_policy(router, RetryPolicy::default()).await
    }

    /// Start a test server whose client uses `policy`
    pub async fn start_with_policy<S>(router: axum::Router<S>, policy: RetryPolicy) -> Result<Self>
    where
        S: Clone + Send + Sync + 'static,
        axum::Router<S>: Into<axum::Router>,
    {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| ApiError::Setup(e.to_string()))?;
        let addr = listener
            .local_addr()
            .map_err(|e| ApiError::Setup(e.to_string()))?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let router: axum::Router = router.into();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        let client = HorizonClient::with_policy(&format!("http://{}", addr), policy)?;

        Ok(Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get a reference to the client
    pub fn client(&self) -> &HorizonClient {
        &self.client
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Retry policy with millisecond timings for tests
pub fn fast_policy(attempt_timeout: Duration) -> RetryPolicy {
    RetryPolicy {
        attempt_timeout,
        backoff_unit: Duration::from_millis(10),
        ..RetryPolicy::default()
    }
}

/// Base URL of a local port with nothing listening on it
pub fn unreachable_base_url() -> String {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .map(|addr| addr.port())
        .unwrap_or(9);
    format!("http://127.0.0.1:{}", port)
}

/// Wait for a condition with timeout
pub async fn wait_for<F, Fut>(condition: F, timeout: Duration) -> bool
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;

    while tokio::time::Instant::now() < deadline {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_policy_keeps_retry_count() {
        let policy = fast_policy(Duration::from_millis(50));
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.attempt_timeout, Duration::from_millis(50));
    }

    #[test]
    fn unreachable_url_is_local() {
        assert!(unreachable_base_url().starts_with("http://127.0.0.1:"));
    }
}
