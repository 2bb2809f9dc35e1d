//! Validation and normalization of inbound meeting requests.
//!
//! Checks run in a fixed order and the first failure wins:
//! subject, organizer configuration, organizer email shape, `startDateTime`,
//! `endDateTime`, and finally that the meeting ends after it starts.

use crate::error::{ConfigErrorKind, DateTimeField, Error, ValidationErrorKind};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use log::*;
use serde_json::Value;
use service::config::Config;

// Largest distance from the epoch, in milliseconds, that a JavaScript style date can represent.
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// The organizer identity meetings are created for, as configured for the process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizerConfig {
    pub user_id: Option<String>,
    pub email: Option<String>,
}

impl From<&Config> for OrganizerConfig {
    fn from(config: &Config) -> Self {
        Self {
            user_id: config.default_organizer_user_id().map(str::to_string),
            email: config.default_organizer_email().map(str::to_string),
        }
    }
}

/// A validated request, ready to be sent upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMeetingInput {
    pub subject: String,
    /// Identifier placed in the upstream resource path. The user id when configured.
    pub organizer_id: String,
    /// Organizer reported back to the caller. The email when configured.
    pub organizer: String,
    /// ISO-8601 UTC with millisecond precision, e.g. `2024-01-01T10:00:00.000Z`.
    pub start_date_time: String,
    pub end_date_time: String,
}

/// Validate a raw request body against the organizer configuration.
pub fn validate(
    payload: &Value,
    organizer: &OrganizerConfig,
) -> Result<NormalizedMeetingInput, Error> {
    let subject = payload
        .get("subject")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|subject| !subject.is_empty())
        .ok_or(ValidationErrorKind::MissingSubject)?;

    let user_id = non_blank(organizer.user_id.as_deref());
    let email = non_blank(organizer.email.as_deref());

    if user_id.is_none() && email.is_none() {
        warn!("No organizer configured, refusing to create meeting");
        return Err(ConfigErrorKind::MissingOrganizer.into());
    }
    if let Some(email) = email {
        if !is_valid_email_shape(email) {
            warn!("Configured organizer email is malformed");
            return Err(ConfigErrorKind::InvalidOrganizerEmail.into());
        }
    }

    let start = parse_field(payload, DateTimeField::Start)?;
    let end = parse_field(payload, DateTimeField::End)?;

    if end <= start {
        return Err(ValidationErrorKind::EndNotAfterStart.into());
    }

    // Both are present at this point; the fallbacks only pick the preferred one.
    let (organizer_id, organizer) = match (user_id, email) {
        (Some(user_id), Some(email)) => (user_id, email),
        (Some(user_id), None) => (user_id, user_id),
        (None, Some(email)) => (email, email),
        (None, None) => return Err(ConfigErrorKind::MissingOrganizer.into()),
    };

    Ok(NormalizedMeetingInput {
        subject: subject.to_string(),
        organizer_id: organizer_id.to_string(),
        organizer: organizer.to_string(),
        start_date_time: to_iso_string(&start),
        end_date_time: to_iso_string(&end),
    })
}

/// Basic `local@domain.tld` shape: no whitespace, exactly one `@`, and a dot in the
/// domain with at least one character on each side of it.
pub fn is_valid_email_shape(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Parse a request date-time value.
///
/// Strings may be RFC 3339 (any offset), RFC 2822, an offset-less date-time (taken as
/// UTC) or a plain date (midnight UTC). Numbers are milliseconds since the Unix epoch.
/// The result is truncated to millisecond precision.
pub fn parse_date_time(value: &Value) -> Option<DateTime<Utc>> {
    let parsed = match value {
        Value::String(text) => parse_date_time_str(text.trim()),
        Value::Number(number) => number
            .as_i64()
            .map(|millis| millis as f64)
            .or_else(|| number.as_f64())
            .filter(|millis| millis.is_finite() && millis.abs() <= MAX_EPOCH_MILLIS)
            .and_then(|millis| DateTime::from_timestamp_millis(millis.trunc() as i64)),
        _ => None,
    }?;

    DateTime::from_timestamp_millis(parsed.timestamp_millis())
}

/// Canonical ISO-8601 UTC rendering with millisecond precision.
pub fn to_iso_string(date_time: &DateTime<Utc>) -> String {
    date_time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_date_time_str(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(text) {
        return Some(date_time.with_timezone(&Utc));
    }
    if let Ok(date_time) = DateTime::parse_from_rfc2822(text) {
        return Some(date_time.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_field(payload: &Value, field: DateTimeField) -> Result<DateTime<Utc>, Error> {
    payload
        .get(field.as_str())
        .and_then(parse_date_time)
        .ok_or_else(|| ValidationErrorKind::InvalidDateTime(field).into())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
