use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Failures surfaced to API callers as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required request or server setting is missing. Raised before any network call.
    #[error("incomplete configuration: {0}")]
    Config(String),

    /// The client-credentials exchange did not produce a token.
    #[error("failed to obtain token (OAuth2): {0}")]
    Auth(String),

    /// A call the request cannot do without failed.
    #[error("{0}")]
    Upstream(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn missing(field: &str) -> Self {
        Self::Config(format!("missing {field}"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Config(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) | ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
