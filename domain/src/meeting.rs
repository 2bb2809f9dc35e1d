//! Creation of Teams online meetings on behalf of the configured organizer.

use crate::error::Error;
use crate::gateway::microsoft_graph::{Client, OnlineMeeting};
use crate::meeting_input::{self, NormalizedMeetingInput, OrganizerConfig};
use log::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service::config::Config;
use utoipa::ToSchema;

/// A created meeting as reported to the caller. Nothing here is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingResult {
    pub meeting_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_url: Option<String>,
    pub organizer: String,
}

impl MeetingResult {
    fn project(meeting: OnlineMeeting, input: &NormalizedMeetingInput) -> Self {
        Self {
            meeting_id: meeting.id,
            subject: meeting.subject,
            start_date_time: meeting.start_date_time,
            end_date_time: meeting.end_date_time,
            join_url: meeting.join_web_url,
            organizer: input.organizer.clone(),
        }
    }
}

/// Validate `payload`, then create exactly one online meeting upstream.
///
/// Validation and configuration failures are returned before any network call.
/// Upstream failures are classified into client facing errors.
pub async fn create_online_meeting(config: &Config, payload: &Value) -> Result<MeetingResult, Error> {
    let input = meeting_input::validate(payload, &OrganizerConfig::from(config))?;
    let client = Client::new(config)?;

    let meeting = client
        .create_online_meeting(&input)
        .await
        .map_err(|e| {
            let err = e.classify();
            warn!(
                "Teams meeting creation failed with status {}: {}",
                err.status_code(),
                e.raw_message()
            );
            err
        })?;

    debug!("Teams meeting {} created for {}", meeting.id, input.organizer);
    Ok(MeetingResult::project(meeting, &input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{
        ConfigErrorKind, DomainErrorKind, InternalErrorKind, ValidationErrorKind,
    };
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    fn config(server: &ServerGuard) -> Config {
        Config::with_defaults()
            .set_credentials(
                Some("tenant-1".to_string()),
                Some("client-1".to_string()),
                Some("secret-1".to_string()),
            )
            .set_organizer(
                Some("6f1c2a".to_string()),
                Some("organizer@contoso.com".to_string()),
            )
            .set_authority_host(server.url())
            .set_graph_base_url(format!("{}/v1.0", server.url()))
    }

    fn payload() -> Value {
        json!({
            "subject": "Sync",
            "startDateTime": "2024-01-01T10:00:00Z",
            "endDateTime": "2024-01-01T10:30:00Z"
        })
    }

    async fn mock_token(server: &mut ServerGuard) -> mockito::Mock {
        server
            .mock("POST", "/tenant-1/oauth2/v2.0/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token_type":"Bearer","expires_in":3599,"access_token":"graph-token"}"#)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_create_online_meeting_projects_upstream_resource() {
        let mut server = Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let create = server
            .mock("POST", "/v1.0/users/6f1c2a/onlineMeetings")
            .match_body(Matcher::PartialJson(json!({
                "startDateTime": "2024-01-01T10:00:00.000Z",
                "endDateTime": "2024-01-01T10:30:00.000Z",
                "lobbyBypassSettings": {"scope": "everyone", "isDialInBypassEnabled": true}
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"MSo1N2Y5","subject":"Sync","startDateTime":"2024-01-01T10:00:00Z","endDateTime":"2024-01-01T10:30:00Z","joinWebUrl":"https://teams.microsoft.com/l/meetup-join/abc","participants":{}}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let result = create_online_meeting(&config(&server), &payload())
            .await
            .unwrap();

        create.assert_async().await;
        assert_eq!(
            result,
            MeetingResult {
                meeting_id: "MSo1N2Y5".to_string(),
                subject: Some("Sync".to_string()),
                start_date_time: Some("2024-01-01T10:00:00Z".to_string()),
                end_date_time: Some("2024-01-01T10:30:00Z".to_string()),
                join_url: Some("https://teams.microsoft.com/l/meetup-join/abc".to_string()),
                organizer: "organizer@contoso.com".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_input_makes_no_network_call() {
        let mut server = Server::new_async().await;
        let token = server
            .mock("POST", "/tenant-1/oauth2/v2.0/token")
            .expect(0)
            .create_async()
            .await;

        let payload = json!({
            "subject": "Sync",
            "startDateTime": "2024-01-01T10:30:00Z",
            "endDateTime": "2024-01-01T10:00:00Z"
        });
        let err = create_online_meeting(&config(&server), &payload)
            .await
            .err()
            .unwrap();

        token.assert_async().await;
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Validation(ValidationErrorKind::EndNotAfterStart)
        );
    }

    #[tokio::test]
    async fn test_missing_credentials_is_a_config_error() {
        let server = Server::new_async().await;
        let config = config(&server).set_credentials(None, None, None);

        let err = create_online_meeting(&config, &payload())
            .await
            .err()
            .unwrap();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Config(
                ConfigErrorKind::MissingCredential("TENANT_ID")
            ))
        );
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_upstream_permission_failure_is_classified() {
        let mut server = Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let _create = server
            .mock("POST", "/v1.0/users/6f1c2a/onlineMeetings")
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"error":{"code":"Forbidden","message":"Forbidden: insufficient privileges"}}"#,
            )
            .create_async()
            .await;

        let err = create_online_meeting(&config(&server), &payload())
            .await
            .err()
            .unwrap();

        assert_eq!(err.status_code(), 403);
        assert!(err.message().contains("admin consent"));
        assert_eq!(
            err.details().as_deref(),
            Some("Forbidden: insufficient privileges")
        );
    }

    #[test]
    fn test_result_serializes_with_camel_case_keys() {
        let result = MeetingResult {
            meeting_id: "m-1".to_string(),
            subject: Some("Sync".to_string()),
            start_date_time: None,
            end_date_time: None,
            join_url: Some("https://teams.microsoft.com/l/meetup-join/abc".to_string()),
            organizer: "6f1c2a".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "meetingId": "m-1",
                "subject": "Sync",
                "joinUrl": "https://teams.microsoft.com/l/meetup-join/abc",
                "organizer": "6f1c2a"
            })
        );
    }
}
