//! API error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::error::AppError;

/// Example request shown to callers who get the parameters wrong.
pub const USAGE: &str = "/api/race-results?year=2024&race=Miami";

/// Errors the race results endpoint reports to callers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// `year` or `race` absent or empty
    #[error("Missing required parameters")]
    MissingParameters,

    /// `year` is not an unsigned integer
    #[error("Invalid year parameter")]
    InvalidYear(String),

    /// The race report could not be retrieved
    #[error("Failed to fetch race results")]
    Upstream(#[from] AppError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameters | Self::InvalidYear(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            Self::MissingParameters => json!({
                "error": self.to_string(),
                "usage": USAGE,
            }),
            Self::InvalidYear(value) => json!({
                "error": self.to_string(),
                "details": format!("'{value}' is not a year"),
                "usage": USAGE,
            }),
            Self::Upstream(source) => {
                let mut body = json!({
                    "error": self.to_string(),
                    "details": source.details(),
                });
                if let Some(url) = source.source_url() {
                    body["url"] = json!(url);
                }
                body
            }
        };

        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::MissingParameters.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidYear("abc".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(AppError::fetch("u", "timeout")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::MissingParameters.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
