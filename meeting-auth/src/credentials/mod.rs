//! Credentials the service authenticates itself with.

mod client_secret;

pub use client_secret::{ClientSecretCredential, DEFAULT_AUTHORITY_HOST};
