use crate::controller::{health_check_controller, meeting_controller, not_found_controller};
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use log::*;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Largest request body accepted, in bytes.
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

// OpenAPI document for the service. Paths and schemas only appear in the
// rendered document when listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Teams Meeting API"
        ),
        paths(
            health_check_controller::health_check,
            meeting_controller::create,
        ),
        components(
            schemas(
                domain::meeting::MeetingResult,
                crate::error::ErrorResponse,
                crate::params::meeting::CreateParams,
            )
        ),
        tags(
            (name = "teams_meeting", description = "Create Microsoft Teams online meetings")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    let config = app_state.config_ref();
    let cors = cors_layer(&config.allowed_origins);

    // Files under `static_dir` for anything not routed above; a miss is the JSON 404.
    let static_files = ServeDir::new(&config.static_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found_controller::not_found.into_service());

    Router::new()
        .merge(health_routes())
        .merge(meeting_routes(app_state.clone()))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        .fallback_service(static_files)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
}

fn health_routes() -> Router {
    Router::new().route(
        "/health",
        get(health_check_controller::health_check).fallback(not_found_controller::not_found),
    )
}

fn meeting_routes(app_state: AppState) -> Router {
    let create = post(meeting_controller::create).fallback(not_found_controller::not_found);

    Router::new()
        .route("/api/meetings", create.clone())
        .route("/api/meetings/", create)
        .with_state(app_state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.iter().any(|origin| origin.trim() == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.trim().parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}
