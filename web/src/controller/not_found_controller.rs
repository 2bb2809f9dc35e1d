use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Json;
use log::*;
use serde_json::json;

/// Response for any path or method this service does not handle.
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    debug!("No route for {uri}");
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": "Route not found"})),
    )
}
