use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use thiserror::Error;

/// Failure of a single upstream fetch. Scoped to one platform slot.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("{}", or_default(.0, "Network error"))]
    Network(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("{}", or_default(.0, "Invalid JSON"))]
    InvalidJson(String),
}

fn or_default<'a>(message: &'a str, default: &'a str) -> &'a str {
    if message.is_empty() {
        default
    } else {
        message
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::InvalidJson(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Internal(message) if message.is_empty() => "Server error".to_string(),
            other => other.to_string(),
        };

        let body = json!({
            "error": message,
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        });

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
