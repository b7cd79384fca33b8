//! Conversion of gate rejections into HTTP responses

use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use sentinel_core::errors::GateError;
use sentinel_shared::ErrorResponse;
use thiserror::Error;

/// A gate rejection rendered as `{"error": <message>}` with its status code.
/// Rate limit rejections also carry a `Retry-After` header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub GateError);

impl ApiError {
    pub fn gate_error(&self) -> &GateError {
        &self.0
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        log::debug!("Request rejected: {} ({})", self.0, self.0.error_code());

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(secs) = self.0.retry_after_secs() {
            builder.insert_header((header::RETRY_AFTER, secs.to_string()));
        }
        builder.json(ErrorResponse::new(self.0.to_string()))
    }
}
