//! Error responses
//!
//! Every failure has the same body:
//! `{"error": message, "code": CODE, "canRespond": false}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tutor_application::QueryError;

/// Non-standard "client closed request" status.
const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Handler error wrapping [`QueryError`].
#[derive(Debug)]
pub struct ApiError(pub QueryError);

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        ApiError(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            QueryError::InvalidRequest(_) | QueryError::UnknownModel(_) => StatusCode::BAD_REQUEST,
            QueryError::UpstreamFailure(_) => StatusCode::BAD_GATEWAY,
            QueryError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            QueryError::Cancelled => {
                StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::BAD_REQUEST)
            }
            QueryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON error body.
    pub fn body(&self) -> serde_json::Value {
        json!({
            "error": self.0.public_message(),
            "code": self.0.code(),
            "canRespond": false,
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.0.code(), error = %self.0, "Query failed");
        } else {
            tracing::debug!(code = self.0.code(), error = %self.0, "Query rejected");
        }

        (status, Json(self.body())).into_response()
    }
}
