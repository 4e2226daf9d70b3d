//! API error types with HTTP response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{ErrorKind, ServiceError};

use crate::wire::ErrorBody;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// A service rejected the call.
    Service(ServiceError),
    /// The request body was absent, `null` or not valid JSON for the type.
    InvalidBody(ServiceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Service(err) => status_for(err.kind()),
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// HTTP status for each service error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Check => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::ObjectNotFound => StatusCode::NOT_FOUND,
        ErrorKind::DuplicateKey => StatusCode::CONFLICT,
        ErrorKind::Find | ErrorKind::Create | ErrorKind::Update | ErrorKind::Remove => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (ApiError::Service(err) | ApiError::InvalidBody(err)) = self;

        metrics::counter!("api_errors_total", "status" => status.as_u16().to_string())
            .increment(1);
        if status.is_server_error() {
            tracing::error!(kind = ?err.kind(), error = %err, "request failed");
        } else {
            tracing::debug!(kind = ?err.kind(), error = %err, "request rejected");
        }

        (status, Json(ErrorBody::from(&err))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

/// Unwraps an optional JSON body.
///
/// A missing, `null` or malformed body fails with the error `on_invalid`
/// builds, so a create with no order is a `Create` failure rather than a
/// bare 400 from the extractor.
pub fn require_body<T>(
    body: Result<Json<Option<T>>, JsonRejection>,
    on_invalid: fn(String) -> ServiceError,
) -> Result<T, ApiError> {
    match body {
        Ok(Json(Some(value))) => Ok(value),
        Ok(Json(None)) => Err(ApiError::InvalidBody(on_invalid(
            "request body is null".to_string(),
        ))),
        Err(rejection) => Err(ApiError::InvalidBody(on_invalid(rejection.body_text()))),
    }
}
