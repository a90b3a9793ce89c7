//! One-shot fetch: a single attempt with no retry, timeout or loading
//! state

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;
use crate::request::{read_error_message, ApiRequest};

/// Message used when a transport failure carries no text of its own
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Outcome of [`fetch_once`]: exactly one of `data` or `error` is set
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> FetchOutcome<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match (self.data, self.error) {
            (Some(data), None) => Ok(data),
            (_, Some(error)) => Err(error),
            (None, None) => Err(UNEXPECTED_ERROR_MESSAGE.to_string()),
        }
    }

    /// Same as [`into_result`](Self::into_result) with the message wrapped
    /// in [`ApiError::Fetch`]
    pub fn into_api_result(self) -> crate::Result<T> {
        self.into_result().map_err(ApiError::Fetch)
    }
}

/// Send `request` once
///
/// Any non-2xx status, 401 included, surfaces the message extracted from
/// the response body. Session state is not touched.
pub async fn fetch_once<T: DeserializeOwned>(http: &Client, request: &ApiRequest) -> FetchOutcome<T> {
    let response = match request.build(http).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!(url = %request.url(), %e, "One-shot fetch failed");
            return FetchOutcome::err(transport_message(&e));
        }
    };

    let status = response.status();
    if !status.is_success() {
        let message = read_error_message(response).await;
        debug!(url = %request.url(), status = status.as_u16(), %message, "One-shot fetch rejected");
        return FetchOutcome::err(message);
    }

    match response.json::<T>().await {
        Ok(data) => FetchOutcome::ok(data),
        Err(e) => FetchOutcome::err(transport_message(&e)),
    }
}

fn transport_message(e: &reqwest::Error) -> String {
    let message = e.to_string();
    if message.trim().is_empty() {
        UNEXPECTED_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_into_result() {
        assert_eq!(FetchOutcome::ok(3).into_result(), Ok(3));
        assert_eq!(
            FetchOutcome::<u8>::err("nope").into_result(),
            Err("nope".to_string())
        );
        let empty: FetchOutcome<u8> = FetchOutcome {
            data: None,
            error: None,
        };
        assert_eq!(
            empty.into_result(),
            Err(UNEXPECTED_ERROR_MESSAGE.to_string())
        );
        assert_eq!(
            FetchOutcome::<u8>::err("gone").into_api_result(),
            Err(ApiError::Fetch("gone".to_string()))
        );
    }
}
