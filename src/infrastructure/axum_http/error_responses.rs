use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::domain::value_objects::ingestion::IngestError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        let status = match &self {
            IngestError::Validation(_) => StatusCode::BAD_REQUEST,
            IngestError::IdentityNotFound { .. } => StatusCode::NOT_FOUND,
            // Store failures are retryable at the transport level because
            // the write path is idempotent on the transaction reference.
            IngestError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}
