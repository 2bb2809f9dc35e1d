//! Meeting creation for the Teams meeting service.
//!
//! Validation of inbound requests, the Microsoft Graph gateway and the mapping of
//! upstream failures into client facing errors live here. `web` only translates
//! HTTP to and from these operations.

pub mod error;
pub mod graph_error;
pub mod meeting;
pub mod meeting_input;

pub mod gateway;
