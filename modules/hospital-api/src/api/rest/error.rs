use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use crate::domain::error::DomainError;

/// Error body shape shared by every failure response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// JSON extractor/response whose rejection is the standard `{message}` body
/// instead of axum's plain-text default.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(DomainError::validation("body", rejection.body_text()))
    }
}

/// API-level error: a domain error plus its HTTP mapping.
#[derive(Debug)]
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DomainError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            DomainError::Forbidden { .. } => (StatusCode::FORBIDDEN, self.0.to_string()),
            DomainError::UserNotFound
            | DomainError::PatientNotFound
            | DomainError::DoctorNotFound
            | DomainError::AppointmentNotFound => (StatusCode::NOT_FOUND, self.0.to_string()),
            DomainError::EmailTaken { .. }
            | DomainError::LicenseTaken { .. }
            | DomainError::SlotTaken => (StatusCode::CONFLICT, self.0.to_string()),
            DomainError::Validation { .. } => (StatusCode::BAD_REQUEST, self.0.to_string()),
            DomainError::Database { message } => {
                error!(detail = %message, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error".to_string(),
                )
            }
        };

        (status, axum::Json(ErrorBody { message })).into_response()
    }
}
