//! Classification of Microsoft Graph failures into client facing errors.
//!
//! The rules are substring heuristics over free text and are applied in a fixed
//! precedence: authentication, permission, rate limit, then the upstream status
//! (or 502 when there is no usable status). A message that merely mentions "auth"
//! is classified as an authentication failure; that is intended.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use meeting_auth::error::{Error as MeetingAuthError, ErrorKind as MeetingAuthErrorKind};
use serde::Deserialize;

/// Error code used for failures of the credential exchange itself.
pub const AUTHENTICATION_ERROR_CODE: &str = "AuthenticationError";

const UNKNOWN_ERROR_MESSAGE: &str = "Unknown Graph API error";

const AUTHENTICATION_MARKERS: &[&str] = &["invalid", "token", "auth"];
const PERMISSION_MARKERS: &[&str] = &["insufficient", "permission", "consent", "forbidden"];

/// A failure surfaced while calling Microsoft Graph, in whatever shape it arrived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphError {
    /// HTTP status of the failed response, when there was one.
    pub status_code: Option<u16>,
    /// `error.code` from the Graph error body.
    pub code: Option<String>,
    /// `error.message` from the Graph error body.
    pub body_message: Option<String>,
    /// Message of the failure itself (transport error, credential error).
    pub message: Option<String>,
}

/// The `{"error": {...}}` envelope Graph returns on failure.
#[derive(Debug, Deserialize)]
struct GraphErrorEnvelope {
    error: GraphErrorBody,
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl GraphError {
    /// Build from a non-2xx Graph response status and its raw body.
    ///
    /// Only `error.code` and `error.message` of the Graph envelope are kept. Any other
    /// body is left to the caller's logs and never reaches classification.
    pub fn from_response(status_code: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<GraphErrorEnvelope>(body).ok();
        let (code, body_message) = match parsed {
            Some(envelope) => (envelope.error.code, envelope.error.message),
            None => (None, None),
        };
        Self {
            status_code: Some(status_code),
            code,
            body_message,
            message: Some(format!("Graph API responded with status {status_code}")),
        }
    }

    /// The most specific message available.
    pub fn raw_message(&self) -> &str {
        non_empty(self.body_message.as_deref())
            .or_else(|| non_empty(self.message.as_deref()))
            .unwrap_or(UNKNOWN_ERROR_MESSAGE)
    }

    /// Classify into a domain error. Pure: the same input always yields the same kind.
    pub fn classify(&self) -> Error {
        let raw_message = self.raw_message();
        let lowercase = raw_message.to_lowercase();
        let mentions = |markers: &[&str]| markers.iter().any(|marker| lowercase.contains(marker));

        let kind = if self.code.as_deref() == Some(AUTHENTICATION_ERROR_CODE)
            || mentions(AUTHENTICATION_MARKERS)
        {
            ExternalErrorKind::Authentication
        } else if mentions(PERMISSION_MARKERS) || self.status_code == Some(403) {
            ExternalErrorKind::Permission
        } else if self.status_code == Some(429) {
            ExternalErrorKind::RateLimited
        } else {
            ExternalErrorKind::Upstream(
                self.status_code
                    .filter(|status| (100..=599).contains(status))
                    .unwrap_or(502),
            )
        };

        Error {
            source: Some(raw_message.to_string().into()),
            error_kind: DomainErrorKind::External(kind),
        }
    }
}

impl From<&MeetingAuthError> for GraphError {
    fn from(err: &MeetingAuthError) -> Self {
        let detail = err.detail().unwrap_or_else(|| err.to_string());
        match &err.error_kind {
            MeetingAuthErrorKind::OAuth(_) => Self {
                code: Some(AUTHENTICATION_ERROR_CODE.to_string()),
                message: Some(detail),
                ..Default::default()
            },
            MeetingAuthErrorKind::Http(_) => Self {
                message: Some(format!("Failed to reach Microsoft Graph: {detail}")),
                ..Default::default()
            },
            MeetingAuthErrorKind::Config(_) => Self {
                message: Some(detail),
                ..Default::default()
            },
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
