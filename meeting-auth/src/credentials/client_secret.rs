//! Client secret credential for the OAuth 2.0 client credentials grant.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::error::{config_error, oauth_error, ConfigErrorKind, Error, OAuthErrorKind};
use crate::oauth::{TokenCredential, TokenErrorResponse, TokenResponse, Tokens};

/// Microsoft identity platform host for the public cloud.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Application identity authenticated with a client secret.
///
/// Every call to [`TokenCredential::get_token`] performs a fresh exchange against
/// `{authority_host}/{tenant_id}/oauth2/v2.0/token`.
pub struct ClientSecretCredential {
    tenant_id: String,
    client_id: String,
    client_secret: SecretString,
    authority_host: String,
    http_client: reqwest::Client,
}

impl ClientSecretCredential {
    /// Create a credential from the three required settings.
    ///
    /// Fails before any network activity when a value is absent or blank. The error
    /// names the first missing setting (`TENANT_ID`, `CLIENT_ID`, `CLIENT_SECRET`).
    /// The token exchange is sent through `http_client`.
    pub fn new(
        tenant_id: Option<&str>,
        client_id: Option<&str>,
        client_secret: Option<&str>,
        http_client: reqwest::Client,
    ) -> Result<Self, Error> {
        let tenant_id = required("TENANT_ID", tenant_id)?;
        let client_id = required("CLIENT_ID", client_id)?;
        let client_secret = required("CLIENT_SECRET", client_secret)?;

        Ok(Self {
            tenant_id,
            client_id,
            client_secret: SecretString::from(client_secret),
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            http_client,
        })
    }

    /// Use a different identity platform host (sovereign clouds, tests).
    pub fn with_authority_host(mut self, authority_host: &str) -> Self {
        self.authority_host = authority_host.trim_end_matches('/').to_string();
        self
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host,
            urlencoding::encode(&self.tenant_id)
        )
    }
}

#[async_trait]
impl TokenCredential for ClientSecretCredential {
    async fn get_token(&self, scopes: &[String]) -> Result<Tokens, Error> {
        let scope = scopes.join(" ");
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret().as_str()),
            ("scope", scope.as_str()),
        ];

        debug!(tenant_id = %self.tenant_id, %scope, "Requesting client credentials token");

        let response = self
            .http_client
            .post(self.token_url())
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                warn!("Token endpoint unreachable: {e}");
                oauth_error(
                    OAuthErrorKind::Network,
                    &format!("ClientSecretCredential authentication failed: {e}"),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let summary = serde_json::from_str::<TokenErrorResponse>(&body)
                .ok()
                .and_then(|error| error.summary())
                .unwrap_or_else(|| format!("token endpoint returned {status}"));
            warn!("Client credentials exchange rejected: {summary}");
            return Err(oauth_error(
                OAuthErrorKind::TokenExchangeFailed,
                &format!("ClientSecretCredential authentication failed: {summary}"),
            ));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse token response: {e}");
            oauth_error(
                OAuthErrorKind::InvalidResponse,
                &format!("ClientSecretCredential authentication failed: invalid token response: {e}"),
            )
        })?;

        let tokens = token.into_tokens(scopes);
        debug!(
            expires_in = ?tokens.time_until_expiry().map(|d| d.num_seconds()),
            "Acquired access token"
        );
        Ok(tokens)
    }
}

fn required(name: &'static str, value: Option<&str>) -> Result<String, Error> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| config_error(ConfigErrorKind::MissingValue(name)))
}
