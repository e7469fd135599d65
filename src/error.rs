use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

pub type Result<T> = std::result::Result<T, RankError>;

/// Failure modes of the rank lookup pipeline.
///
/// Every variant is terminal for the request — no retries anywhere.
/// Each maps to exactly one JSON error body and HTTP status in
/// [`IntoResponse`].
#[derive(Debug, Error)]
pub enum RankError {
    /// Region string is not one of the allow-listed codes.
    #[error("Invalid Region: {0}")]
    InvalidRegion(String),

    /// Transport-level failure reaching the upstream API.
    #[error("Issue connecting to external API")]
    UpstreamUnreachable(#[source] reqwest::Error),

    /// Upstream answered with a non-200 status, propagated as-is.
    #[error("API returned status code: {0}")]
    UpstreamStatus(u16),

    /// Upstream body was not decodable as the expected JSON envelope.
    #[error("Failed to parse API response")]
    UpstreamMalformed(#[source] serde_json::Error),

    /// Upstream envelope decoded but carried no `data` object.
    #[error("API response missing data object")]
    MissingData,

    /// A payload field was absent or of the wrong type.
    #[error("Invalid field type: {field}")]
    InvalidFieldType { field: &'static str },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RankError {
    /// HTTP status this error surfaces as.
    ///
    /// Upstream statuses pass through unchanged; a code outside the
    /// representable range falls back to 502.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RankError::InvalidRegion(_) => StatusCode::BAD_REQUEST,
            RankError::UpstreamStatus(code) => {
                StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RankError::UpstreamUnreachable(_)
            | RankError::UpstreamMalformed(_)
            | RankError::MissingData
            | RankError::InvalidFieldType { .. }
            | RankError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RankError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        warn!("Request failed ({}): {}", status, self);

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
