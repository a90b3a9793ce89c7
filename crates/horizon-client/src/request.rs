//! Request description and error-body handling shared by the executor and
//! `fetch_once`

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::{ApiError, Result};
use horizon_core::ValidationError;

/// Body fields consulted for an error message, in order of preference
const ERROR_MESSAGE_FIELDS: [&str; 3] = ["detail", "message", "error"];

/// One outbound call: target plus options
///
/// Retries re-send the same `ApiRequest`, so target and options are
/// preserved across attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    url: Url,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            body: None,
        }
    }

    /// POST with a JSON body
    pub fn post_json<B: Serialize>(url: Url, body: &B) -> Result<Self> {
        let body = serde_json::to_value(body).map_err(|e| {
            ApiError::Validation(ValidationError::Invalid(format!(
                "Request body could not be encoded: {}",
                e
            )))
        })?;
        Ok(Self {
            method: Method::POST,
            url,
            body: Some(body),
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub(crate) fn build(&self, http: &Client) -> RequestBuilder {
        let builder = http
            .request(self.method.clone(), self.url.clone())
            .header(CONTENT_TYPE, "application/json");
        match &self.body {
            Some(body) => builder.json(body),
            None => builder,
        }
    }
}

/// Pick the user-facing message out of an error response body
///
/// Prefers `detail`, then `message`, then `error`; a JSON body with none
/// of them yields `"Error: <status>"`. A body that is not JSON yields
/// `"HTTP Error: <status> <reason>"`.
pub fn extract_error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => ERROR_MESSAGE_FIELDS
            .iter()
            .find_map(|field| value.get(field).and_then(message_text))
            .unwrap_or_else(|| format!("Error: {}", status.as_u16())),
        Err(_) => format!(
            "HTTP Error: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        )
        .trim_end()
        .to_string(),
    }
}

/// Text for a message field; empty, null, false and zero count as absent
fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Read the body of a failed response and extract its message
pub(crate) async fn read_error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    extract_error_message(status, &body)
}

/// Map a non-success status to its error class
pub(crate) fn classify_status(status: StatusCode, message: String) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::AuthExpired,
        StatusCode::FORBIDDEN => ApiError::Forbidden,
        StatusCode::NOT_FOUND => ApiError::NotFound,
        s if s.is_server_error() => ApiError::ServerError { status: s.as_u16() },
        s => ApiError::ClientError {
            status: s.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn detail_wins_over_message_and_error() {
        let body = r#"{"error":"e","message":"m","detail":"d"}"#;
        assert_eq!(extract_error_message(StatusCode::BAD_REQUEST, body), "d");
    }

    #[test]
    fn message_then_error() {
        assert_eq!(
            extract_error_message(StatusCode::BAD_REQUEST, r#"{"error":"e","message":"m"}"#),
            "m"
        );
        assert_eq!(
            extract_error_message(StatusCode::BAD_REQUEST, r#"{"error":"e"}"#),
            "e"
        );
    }

    #[test]
    fn empty_fields_are_skipped() {
        assert_eq!(
            extract_error_message(StatusCode::CONFLICT, r#"{"detail":"","error":"busy"}"#),
            "busy"
        );
        assert_eq!(
            extract_error_message(StatusCode::CONFLICT, r#"{"detail":null}"#),
            "Error: 409"
        );
    }

    #[test]
    fn non_json_body_uses_reason() {
        assert_eq!(
            extract_error_message(StatusCode::BAD_GATEWAY, "<html>oops</html>"),
            "HTTP Error: 502 Bad Gateway"
        );
        assert_eq!(
            extract_error_message(StatusCode::BAD_REQUEST, ""),
            "HTTP Error: 400 Bad Request"
        );
    }

    #[test]
    fn structured_detail_is_rendered() {
        let body = r#"{"detail":[{"loc":["body"],"msg":"field required"}]}"#;
        let message = extract_error_message(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert!(message.contains("field required"));
    }

    #[test]
    fn status_classes() {
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED, String::new()),
            ApiError::AuthExpired
        );
        assert_eq!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE, "x".into()),
            ApiError::ServerError { status: 503 }
        );
        assert_eq!(
            classify_status(StatusCode::UNPROCESSABLE_ENTITY, "bad".into()),
            ApiError::ClientError {
                status: 422,
                message: "bad".into()
            }
        );
    }

    #[test]
    fn post_carries_body() {
        let url = Url::parse("http://localhost:8000/predict").unwrap();
        let request = ApiRequest::post_json(url, &serde_json::json!({"machine_id": "x"})).unwrap();
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.body().unwrap()["machine_id"], "x");
    }
}
