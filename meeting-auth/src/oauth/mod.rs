//! OAuth 2.0 access token acquisition.

mod tokens;

use async_trait::async_trait;

use crate::error::Error;

pub(crate) use tokens::{TokenErrorResponse, TokenResponse};
pub use tokens::Tokens;

/// The scope requesting every application permission granted to the app on Microsoft Graph.
pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Trait for credentials that can produce an access token for a set of scopes.
///
/// Implementations perform whatever exchange the credential type needs. Callers
/// request a token per outbound call; nothing is cached between calls.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Acquire an access token valid for `scopes`.
    async fn get_token(&self, scopes: &[String]) -> Result<Tokens, Error>;
}
