use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::io;
use thiserror::Error;

/// Fixed text returned to clients whenever a provider call fails.
pub const AI_API_FAILURE: &str = "Failed to get response from AI API";

/// Failure of a single call to a remote LLM API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport-level failures (DNS, connect, timeout, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// The API rejected the credentials (401/403)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The API throttled the request (429)
    #[error("Rate limited: {0}")]
    RateLimit(String),

    /// The API answered but the body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Any other non-success status
    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("No API key configured for provider: {0}")]
    MissingApiKey(String),
}

impl ProviderError {
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 | 403 => ProviderError::Auth(body),
            429 => ProviderError::RateLimit(body),
            code => ProviderError::Api {
                status: code,
                message: body,
            },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            ProviderError::Network(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            ProviderError::InvalidResponse(format!("Could not decode body: {}", err))
        } else if let Some(status) = err.status() {
            ProviderError::from_status(status, err.to_string())
        } else {
            ProviderError::Network(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::InvalidResponse(format!("JSON error: {}", err))
    }
}

/// Unified error type for the relay
#[derive(Error, Debug)]
pub enum RelayError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Client sent a body we cannot act on
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Remote LLM call failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for RelayError {
    fn from(err: serde_yml::Error) -> Self {
        RelayError::Serialization(format!("YAML error: {}", err))
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RelayError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            RelayError::Provider(_) => (StatusCode::INTERNAL_SERVER_ERROR, AI_API_FAILURE.to_string()),
            _ => {
                tracing::error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_error_kinds() {
        assert!(matches!(
            ProviderError::from_status(reqwest::StatusCode::UNAUTHORIZED, String::new()),
            ProviderError::Auth(_)
        ));
        assert!(matches!(
            ProviderError::from_status(reqwest::StatusCode::FORBIDDEN, String::new()),
            ProviderError::Auth(_)
        ));
        assert!(matches!(
            ProviderError::from_status(reqwest::StatusCode::TOO_MANY_REQUESTS, String::new()),
            ProviderError::RateLimit(_)
        ));
        assert!(matches!(
            ProviderError::from_status(reqwest::StatusCode::NOT_FOUND, "no such model".into()),
            ProviderError::Api { status: 404, .. }
        ));
    }

    #[test]
    fn every_provider_failure_is_the_same_500() {
        let kinds = [
            ProviderError::Network("reset".into()),
            ProviderError::RateLimit("slow down".into()),
            ProviderError::UnknownProvider("mistral".into()),
        ];
        for kind in kinds {
            let response = RelayError::from(kind).into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn bad_request_is_400() {
        let response = RelayError::BadRequest("missing field `message`".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
