//! Typed descriptions of endpoint inputs.
//!
//! Request bodies are validated by `domain::meeting_input`, which needs the raw JSON to
//! report the first failing field. The types here document the accepted shape for the
//! OpenAPI description.

pub(crate) mod meeting;
