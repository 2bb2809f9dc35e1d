//! # meeting-auth
//!
//! Service-to-service authentication for the Microsoft identity platform:
//! - Client secret credentials for the OAuth 2.0 client credentials grant
//! - Access token types and the `TokenCredential` abstraction
//! - An HTTP client that attaches a freshly acquired bearer token to every call
//!
//! ## Usage
//!
//! ```rust,ignore
//! use meeting_auth::{
//!     credentials::ClientSecretCredential,
//!     http::AuthenticatedClientBuilder,
//!     oauth::GRAPH_DEFAULT_SCOPE,
//! };
//!
//! let http_client = reqwest::Client::new();
//! let credential =
//!     ClientSecretCredential::new(tenant_id, client_id, client_secret, http_client.clone())?;
//! let client = AuthenticatedClientBuilder::new()
//!     .with_credential(Box::new(credential))
//!     .with_scope(GRAPH_DEFAULT_SCOPE)
//!     .with_http_client(http_client)
//!     .build()?;
//! let response = client.post_json(&url, &body).await?;
//! ```

pub mod credentials;
pub mod error;
pub mod http;
pub mod oauth;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
