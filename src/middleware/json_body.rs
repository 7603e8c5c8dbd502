use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::RecordsError;

/// JSON body extractor whose rejections speak `RecordsError`.
///
/// Malformed or mistyped JSON becomes a 400 instead of axum's 422;
/// other rejections (content type, body size) keep their status.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = RecordsError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> RecordsError {
    match rejection {
        JsonRejection::JsonDataError(e) => RecordsError::Validation(e.body_text()),
        JsonRejection::JsonSyntaxError(e) => RecordsError::Validation(e.body_text()),
        other => RecordsError::Rejected {
            status: other.status(),
            message: other.body_text(),
        },
    }
}
