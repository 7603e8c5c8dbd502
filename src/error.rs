use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum RecordsError {
    #[error("record '{0}' not found")]
    NotFound(String),

    #[error("record '{0}' already exists")]
    Duplicate(String),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("request rejected ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),
}

impl RecordsError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            RecordsError::NotFound(_) => StatusCode::NOT_FOUND,
            RecordsError::Duplicate(_) => StatusCode::CONFLICT,
            RecordsError::Validation(_) => StatusCode::BAD_REQUEST,
            RecordsError::Rejected { status, .. } => *status,
            RecordsError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RecordsError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let error_body = match self {
            RecordsError::NotFound(id) => ApiErrorBody {
                code: "NOT_FOUND".to_string(),
                message: format!("record '{id}' not found"),
            },
            RecordsError::Duplicate(id) => ApiErrorBody {
                code: "ALREADY_EXISTS".to_string(),
                message: format!("record '{id}' already exists"),
            },
            RecordsError::Validation(message) => ApiErrorBody {
                code: "INVALID_ARGUMENT".to_string(),
                message,
            },
            RecordsError::Rejected { status, message } => {
                let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    "PAYLOAD_TOO_LARGE"
                } else {
                    "REQUEST_REJECTED"
                };
                ApiErrorBody {
                    code: code.to_string(),
                    message,
                }
            }
            RecordsError::DatabaseError(e) => {
                error!(error = %e, "database operation failed");
                ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                }
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
