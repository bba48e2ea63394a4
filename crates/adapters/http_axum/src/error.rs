//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use workshift_domain::error::WorkshiftError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`WorkshiftError`] to an HTTP response with appropriate status code.
pub struct ApiError(WorkshiftError);

impl From<WorkshiftError> for ApiError {
    fn from(err: WorkshiftError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            WorkshiftError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            WorkshiftError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            WorkshiftError::Host(err) => {
                tracing::error!(error = %err, "host error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
