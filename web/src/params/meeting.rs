use serde::Deserialize;
use utoipa::ToSchema;

/// Request body for creating a Teams meeting.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub(crate) struct CreateParams {
    /// Meeting title. Surrounding whitespace is trimmed and it must not be blank.
    #[schema(example = "Sync")]
    pub subject: String,
    /// Any date/time with an offset (RFC 3339 or RFC 2822), a date/time without an
    /// offset (taken as UTC), a date, or milliseconds since the Unix epoch.
    #[schema(example = "2024-01-01T10:00:00Z")]
    pub start_date_time: String,
    /// Must be strictly after `startDateTime`.
    #[schema(example = "2024-01-01T10:30:00Z")]
    pub end_date_time: String,
}
