//! Error types for the `domain` layer.
use meeting_auth::error::{
    ConfigErrorKind as MeetingAuthConfigErrorKind, Error as MeetingAuthError,
    ErrorKind as MeetingAuthErrorKind,
};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field holds the original error, and for upstream
/// failures its text is the raw message surfaced to clients as `details`.
/// `web` turns the kind into a status code and message via `status_code()` and `message()`.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    /// The caller sent a request that cannot be processed.
    Validation(ValidationErrorKind),
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Problems with the caller's input. Always a 400.
#[derive(Debug, PartialEq)]
pub enum ValidationErrorKind {
    InvalidJson,
    MissingSubject,
    InvalidDateTime(DateTimeField),
    EndNotAfterStart,
}

/// The request fields that carry date-times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeField {
    Start,
    End,
}

impl DateTimeField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateTimeField::Start => "startDateTime",
            DateTimeField::End => "endDateTime",
        }
    }
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Config(ConfigErrorKind),
    Other(String),
}

/// Server misconfiguration. Not the caller's fault, always a 500.
#[derive(Debug, PartialEq)]
pub enum ConfigErrorKind {
    MissingOrganizer,
    InvalidOrganizerEmail,
    MissingCredential(&'static str),
}

/// Enum representing the classified failures of the upstream calendaring API.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Authentication,
    Permission,
    RateLimited,
    /// Any other failure; carries the status to respond with.
    Upstream(u16),
}

impl Error {
    /// HTTP status code this error is reported with.
    pub fn status_code(&self) -> u16 {
        match &self.error_kind {
            DomainErrorKind::Validation(_) => 400,
            DomainErrorKind::Internal(_) => 500,
            DomainErrorKind::External(kind) => match kind {
                ExternalErrorKind::Authentication => 401,
                ExternalErrorKind::Permission => 403,
                ExternalErrorKind::RateLimited => 429,
                ExternalErrorKind::Upstream(status) => *status,
            },
        }
    }

    /// Stable, client facing message for this error.
    pub fn message(&self) -> String {
        match &self.error_kind {
            DomainErrorKind::Validation(kind) => match kind {
                ValidationErrorKind::InvalidJson => "Invalid JSON request body".to_string(),
                ValidationErrorKind::MissingSubject => "subject is required".to_string(),
                ValidationErrorKind::InvalidDateTime(field) => {
                    format!("{} must be a valid date/time", field.as_str())
                }
                ValidationErrorKind::EndNotAfterStart => {
                    "endDateTime must be after startDateTime".to_string()
                }
            },
            DomainErrorKind::Internal(InternalErrorKind::Config(kind)) => match kind {
                ConfigErrorKind::MissingOrganizer => {
                    "Neither DEFAULT_ORGANIZER_USER_ID nor DEFAULT_ORGANIZER_EMAIL is configured"
                        .to_string()
                }
                ConfigErrorKind::InvalidOrganizerEmail => {
                    "DEFAULT_ORGANIZER_EMAIL must be a valid email address".to_string()
                }
                ConfigErrorKind::MissingCredential(name) => {
                    format!("Missing required configuration value: {name}")
                }
            },
            DomainErrorKind::Internal(InternalErrorKind::Other(_)) => {
                "Unexpected server error".to_string()
            }
            DomainErrorKind::External(kind) => match kind {
                ExternalErrorKind::Authentication => {
                    "Authentication with Microsoft Graph failed".to_string()
                }
                ExternalErrorKind::Permission => "Microsoft Graph permissions are missing. \
                    Ensure OnlineMeetings.ReadWrite.All is granted with admin consent."
                    .to_string(),
                ExternalErrorKind::RateLimited => {
                    "Microsoft Graph rate limit exceeded. Please retry shortly.".to_string()
                }
                ExternalErrorKind::Upstream(_) => "Failed to create Teams meeting".to_string(),
            },
        }
    }

    /// Raw underlying message, if any, for diagnostics.
    pub fn details(&self) -> Option<String> {
        match &self.error_kind {
            DomainErrorKind::Internal(InternalErrorKind::Other(message)) => Some(message.clone()),
            _ => self.source.as_ref().map(|source| source.to_string()),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<ValidationErrorKind> for Error {
    fn from(kind: ValidationErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Validation(kind),
        }
    }
}

impl From<ConfigErrorKind> for Error {
    fn from(kind: ConfigErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config(kind)),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Errors that result from issues building the reqwest::Client instance. This
        // type of error will occur prior to any network calls being made.
        Error {
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(err.to_string())),
            source: Some(Box::new(err)),
        }
    }
}

// Only configuration and client construction problems are translated here. Failures of
// the token exchange or of the outbound call itself are classified by `graph_error`.
impl From<MeetingAuthError> for Error {
    fn from(err: MeetingAuthError) -> Self {
        match err.error_kind {
            MeetingAuthErrorKind::Config(MeetingAuthConfigErrorKind::MissingValue(name)) => {
                ConfigErrorKind::MissingCredential(name).into()
            }
            MeetingAuthErrorKind::OAuth(_) | MeetingAuthErrorKind::Http(_) => Error {
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(err.to_string())),
                source: Some(Box::new(err)),
            },
        }
    }
}
