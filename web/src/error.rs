use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use domain::error::{DomainErrorKind, Error as DomainError, InternalErrorKind};

use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

/// Body of every failed response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Error {
    /// An error with no domain meaning, reported as a generic 500 that carries `details`.
    pub(crate) fn unexpected(details: impl Into<String>) -> Self {
        Self(DomainError {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(details.into())),
        })
    }
}

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            message: self.0.message(),
            details: self.0.details(),
        };

        if status.is_server_error() {
            error!("{status} {}: {:?}", body.message, body.details);
        } else {
            warn!("{status} {}", body.message);
        }

        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use domain::error::{ConfigErrorKind, ExternalErrorKind, ValidationErrorKind};
    use serde_json::{json, Value};

    async fn render(err: Error) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error_omits_details() {
        let (status, body) = render(ValidationErrorKind::MissingSubject.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "subject is required"}));
    }

    #[tokio::test]
    async fn test_upstream_error_carries_status_and_details() {
        let err = Error(DomainError {
            source: Some("Too many requests".into()),
            error_kind: DomainErrorKind::External(ExternalErrorKind::RateLimited),
        });
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            body,
            json!({
                "message": "Microsoft Graph rate limit exceeded. Please retry shortly.",
                "details": "Too many requests"
            })
        );
    }

    #[tokio::test]
    async fn test_config_error_is_internal_server_error() {
        let (status, body) = render(ConfigErrorKind::MissingCredential("TENANT_ID").into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Missing required configuration value: TENANT_ID");
    }

    #[tokio::test]
    async fn test_unexpected_error_is_generic() {
        let (status, body) = render(Error::unexpected("request entity too large")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({
                "message": "Unexpected server error",
                "details": "request entity too large"
            })
        );
    }
}
