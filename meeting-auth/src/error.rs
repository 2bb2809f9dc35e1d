//! Error types for the `meeting-auth` crate.
//!
//! Follows the same pattern as domain::error with a root Error struct and error kind enums.

use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for meeting-auth crate.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in meeting-auth.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    Config(ConfigErrorKind),
    OAuth(OAuthErrorKind),
    Http(HttpErrorKind),
}

/// Errors raised before any network activity because a required setting is unusable.
#[derive(Debug, PartialEq)]
pub enum ConfigErrorKind {
    /// The named setting is absent or blank.
    MissingValue(&'static str),
}

/// Errors from the token endpoint.
#[derive(Debug, PartialEq)]
pub enum OAuthErrorKind {
    /// The identity platform rejected the credentials or the request.
    TokenExchangeFailed,
    /// The token endpoint could not be reached.
    Network,
    /// The token endpoint answered with a body that is not a token response.
    InvalidResponse,
}

/// Errors from HTTP client operations.
#[derive(Debug, PartialEq)]
pub enum HttpErrorKind {
    BuilderFailed,
    RequestFailed,
    Network,
}

impl Error {
    /// The underlying message carried by this error, if any.
    pub fn detail(&self) -> Option<String> {
        self.source.as_ref().map(|source| source.to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::Config(ConfigErrorKind::MissingValue(name)) => {
                write!(f, "Missing required configuration value: {name}")
            }
            ErrorKind::OAuth(kind) => match self.detail() {
                Some(detail) => write!(f, "OAuth error: {kind:?}: {detail}"),
                None => write!(f, "OAuth error: {kind:?}"),
            },
            ErrorKind::Http(kind) => match self.detail() {
                Some(detail) => write!(f, "HTTP error: {kind:?}: {detail}"),
                None => write!(f, "HTTP error: {kind:?}"),
            },
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let error_kind = if err.is_builder() {
            ErrorKind::Http(HttpErrorKind::BuilderFailed)
        } else if err.is_request() {
            ErrorKind::Http(HttpErrorKind::RequestFailed)
        } else {
            ErrorKind::Http(HttpErrorKind::Network)
        };

        // The request URL carries caller data (the organizer id) and must not reach details.
        Error {
            source: Some(Box::new(err.without_url())),
            error_kind,
        }
    }
}

/// Helper function to create configuration errors.
pub fn config_error(kind: ConfigErrorKind) -> Error {
    Error {
        source: None,
        error_kind: ErrorKind::Config(kind),
    }
}

/// Helper function to create OAuth errors.
pub fn oauth_error(kind: OAuthErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::OAuth(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_value_names_the_setting() {
        let err = config_error(ConfigErrorKind::MissingValue("CLIENT_SECRET"));
        assert_eq!(
            err.to_string(),
            "Missing required configuration value: CLIENT_SECRET"
        );
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn test_oauth_error_keeps_message_as_detail() {
        let err = oauth_error(
            OAuthErrorKind::TokenExchangeFailed,
            "invalid_client: AADSTS7000215",
        );
        assert_eq!(
            err.error_kind,
            ErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed)
        );
        assert_eq!(err.detail().as_deref(), Some("invalid_client: AADSTS7000215"));
        assert!(err.to_string().contains("AADSTS7000215"));
    }

    #[tokio::test]
    async fn test_transport_error_detail_omits_request_url() {
        let err: Error = reqwest::Client::new()
            .post("http://127.0.0.1:9/users/author%40contoso.com/onlineMeetings")
            .send()
            .await
            .err()
            .unwrap()
            .into();

        assert!(matches!(err.error_kind, ErrorKind::Http(_)));
        let detail = err.detail().unwrap();
        assert!(!detail.contains("127.0.0.1"), "{detail}");
        assert!(!detail.contains("author"), "{detail}");
    }
}
