use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::ErrorResponse;
use crate::extractors::json_body::JsonBody;
use crate::params::meeting::CreateParams;
use crate::{AppState, Error};
use domain::meeting as MeetingApi;
use domain::meeting::MeetingResult;
use log::*;

/// POST create a new Teams meeting for the configured organizer
#[utoipa::path(
    post,
    path = "/api/meetings",
    request_body = CreateParams,
    responses(
        (status = 201, description = "Successfully created a new Teams meeting", body = MeetingResult),
        (status = 400, description = "Invalid JSON body or invalid meeting fields", body = ErrorResponse),
        (status = 401, description = "Authentication with Microsoft Graph failed", body = ErrorResponse),
        (status = 403, description = "Microsoft Graph permissions are missing", body = ErrorResponse),
        (status = 429, description = "Microsoft Graph rate limit exceeded", body = ErrorResponse),
        (status = 500, description = "Server misconfiguration or unexpected error", body = ErrorResponse),
        (status = 502, description = "Microsoft Graph failed without a usable status", body = ErrorResponse)
    )
)]
pub async fn create(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new Teams meeting");

    let meeting = MeetingApi::create_online_meeting(app_state.config_ref(), &payload).await?;

    debug!("New Teams meeting: {:?}", meeting);

    Ok((StatusCode::CREATED, Json(meeting)))
}
