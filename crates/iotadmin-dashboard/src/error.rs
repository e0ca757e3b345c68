//! Error types for the dashboard crate.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use iotadmin_client::ApiError;
use thiserror::Error;

/// Errors that can occur in the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Failed to start the server.
    #[error("failed to start dashboard: {0}")]
    StartupFailed(String),

    /// Invalid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            DashboardError::Api(e) if e.is_unauthorized() => StatusCode::UNAUTHORIZED,
            DashboardError::Api(ApiError::Validation(_)) => StatusCode::BAD_REQUEST,
            DashboardError::Api(ApiError::Network(_)) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(status = status.as_u16(), error = %self, "request failed");

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let response = DashboardError::InvalidRequest("unknown device".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = DashboardError::Api(ApiError::Network("refused".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = DashboardError::Api(ApiError::from_status(401, "expired".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
