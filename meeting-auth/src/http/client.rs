//! Authenticated HTTP client builder.

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, ErrorKind, HttpErrorKind};
use crate::oauth::TokenCredential;

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("meeting-auth/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client that authenticates every request with a bearer token from its credential.
///
/// The token is acquired immediately before each request and not reused.
#[derive(Clone)]
pub struct AuthenticatedClient {
    client: reqwest::Client,
    credential: Arc<dyn TokenCredential>,
    scopes: Vec<String>,
}

impl AuthenticatedClient {
    /// Acquire a token and send `body` as JSON to `url` with a POST.
    ///
    /// Token acquisition failures are returned as-is (`ErrorKind::OAuth`/`Config`);
    /// transport failures become `ErrorKind::Http`. Non-2xx responses are returned
    /// to the caller for interpretation.
    pub async fn post_json<T>(&self, url: &str, body: &T) -> Result<reqwest::Response, Error>
    where
        T: Serialize + ?Sized,
    {
        let tokens = self.credential.get_token(&self.scopes).await?;

        debug!(%url, "POST with bearer token");

        let response = self
            .client
            .post(url)
            .bearer_auth(tokens.access_token.expose_secret())
            .json(body)
            .send()
            .await?;

        Ok(response)
    }
}

/// Builder for creating authenticated HTTP clients.
///
/// Provides a fluent API for constructing HTTP clients with:
/// - A token credential and the scopes to request
/// - Timeout configuration
/// - User agent
///
/// A client passed to [`AuthenticatedClientBuilder::with_http_client`] is used as-is
/// and the timeout and user agent settings are ignored.
pub struct AuthenticatedClientBuilder {
    config: HttpClientConfig,
    credential: Option<Arc<dyn TokenCredential>>,
    scopes: Vec<String>,
    http_client: Option<reqwest::Client>,
}

impl AuthenticatedClientBuilder {
    /// Create a new client builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: HttpClientConfig::default(),
            credential: None,
            scopes: Vec::new(),
            http_client: None,
        }
    }

    /// Set the credential used to acquire access tokens.
    pub fn with_credential(mut self, credential: Box<dyn TokenCredential>) -> Self {
        self.credential = Some(Arc::from(credential));
        self
    }

    /// Add a scope to request with every token.
    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scopes.push(scope.to_string());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.config.user_agent = user_agent;
        self
    }

    /// Send requests through an already configured client.
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Build the configured HTTP client.
    ///
    /// Fails with `HttpErrorKind::BuilderFailed` when no credential was set or the
    /// underlying client cannot be constructed.
    pub fn build(self) -> Result<AuthenticatedClient, Error> {
        let credential = self.credential.ok_or_else(|| Error {
            source: Some("an authenticated client requires a credential".into()),
            error_kind: ErrorKind::Http(HttpErrorKind::BuilderFailed),
        })?;

        let client = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .use_rustls_tls()
                .timeout(self.config.timeout)
                .user_agent(self.config.user_agent)
                .build()?,
        };

        Ok(AuthenticatedClient {
            client,
            credential,
            scopes: self.scopes,
        })
    }
}

impl Default for AuthenticatedClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{oauth_error, OAuthErrorKind};
    use crate::oauth::{Tokens, GRAPH_DEFAULT_SCOPE};
    use async_trait::async_trait;
    use mockito::{Matcher, Server};
    use secrecy::SecretString;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticCredential {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TokenCredential for StaticCredential {
        async fn get_token(&self, scopes: &[String]) -> Result<Tokens, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Tokens {
                access_token: SecretString::from("static-token".to_string()),
                expires_at: None,
                token_type: "Bearer".to_string(),
                scopes: scopes.to_vec(),
            })
        }
    }

    struct RejectingCredential;

    #[async_trait]
    impl TokenCredential for RejectingCredential {
        async fn get_token(&self, _scopes: &[String]) -> Result<Tokens, Error> {
            Err(oauth_error(
                OAuthErrorKind::TokenExchangeFailed,
                "invalid_client",
            ))
        }
    }

    #[test]
    fn test_builder_default() {
        let builder = AuthenticatedClientBuilder::new();
        assert_eq!(builder.config.timeout, Duration::from_secs(30));
        assert!(builder.scopes.is_empty());
    }

    #[test]
    fn test_builder_with_timeout_and_scope() {
        let builder = AuthenticatedClientBuilder::new()
            .with_timeout(Duration::from_secs(5))
            .with_scope(GRAPH_DEFAULT_SCOPE);
        assert_eq!(builder.config.timeout, Duration::from_secs(5));
        assert_eq!(builder.scopes, vec![GRAPH_DEFAULT_SCOPE.to_string()]);
    }

    #[test]
    fn test_build_without_credential_fails() {
        let err = AuthenticatedClientBuilder::new().build().err().unwrap();
        assert_eq!(err.error_kind, ErrorKind::Http(HttpErrorKind::BuilderFailed));
    }

    #[tokio::test]
    async fn test_post_json_acquires_token_per_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/resource")
            .match_header("authorization", "Bearer static-token")
            .match_body(Matcher::Json(serde_json::json!({"hello": "world"})))
            .with_status(201)
            .expect(2)
            .create_async()
            .await;

        let calls = Arc::new(AtomicUsize::new(0));
        let client = AuthenticatedClientBuilder::new()
            .with_credential(Box::new(StaticCredential {
                calls: Arc::clone(&calls),
            }))
            .with_scope(GRAPH_DEFAULT_SCOPE)
            .build()
            .unwrap();

        let url = format!("{}/resource", server.url());
        let body = serde_json::json!({"hello": "world"});
        for _ in 0..2 {
            let response = client.post_json(&url, &body).await.unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        }

        mock.assert_async().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_post_json_uses_shared_http_client() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/resource")
            .match_header("user-agent", "shared-client/1.0")
            .with_status(201)
            .create_async()
            .await;

        let shared = reqwest::Client::builder()
            .user_agent("shared-client/1.0")
            .build()
            .unwrap();
        let client = AuthenticatedClientBuilder::new()
            .with_credential(Box::new(StaticCredential {
                calls: Arc::new(AtomicUsize::new(0)),
            }))
            .with_user_agent("ignored/0.0".to_string())
            .with_http_client(shared)
            .build()
            .unwrap();

        client
            .post_json(&format!("{}/resource", server.url()), &serde_json::json!({}))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_json_does_not_call_resource_when_token_fails() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/resource")
            .expect(0)
            .create_async()
            .await;

        let client = AuthenticatedClientBuilder::new()
            .with_credential(Box::new(RejectingCredential))
            .build()
            .unwrap();

        let err = client
            .post_json(&format!("{}/resource", server.url()), &serde_json::json!({}))
            .await
            .err()
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            err.error_kind,
            ErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed)
        );
    }
}
