//! Microsoft Graph client for creating Teams online meetings.
//!
//! Authenticates as the application (client credentials) and creates the meeting
//! on behalf of the configured organizer with `POST /users/{id}/onlineMeetings`.

use crate::error::Error;
use crate::graph_error::GraphError;
use crate::meeting_input::NormalizedMeetingInput;
use log::*;
use meeting_auth::{
    credentials::ClientSecretCredential,
    http::{AuthenticatedClient, AuthenticatedClientBuilder},
    oauth::GRAPH_DEFAULT_SCOPE,
};
use serde::{Deserialize, Serialize};
use service::config::Config;
use std::time::Duration;

/// Lobby settings requested for new meetings. Tenant policy may still override them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyBypassSettings {
    pub scope: &'static str,
    pub is_dial_in_bypass_enabled: bool,
}

/// Request body of `POST /users/{id}/onlineMeetings`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOnlineMeetingRequest<'a> {
    pub subject: &'a str,
    pub start_date_time: &'a str,
    pub end_date_time: &'a str,
    pub lobby_bypass_settings: LobbyBypassSettings,
    pub allowed_presenters: &'static str,
}

impl<'a> From<&'a NormalizedMeetingInput> for CreateOnlineMeetingRequest<'a> {
    fn from(input: &'a NormalizedMeetingInput) -> Self {
        Self {
            subject: &input.subject,
            start_date_time: &input.start_date_time,
            end_date_time: &input.end_date_time,
            lobby_bypass_settings: LobbyBypassSettings {
                scope: "everyone",
                is_dial_in_bypass_enabled: true,
            },
            allowed_presenters: "everyone",
        }
    }
}

/// The fields of the created `onlineMeeting` resource this service uses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineMeeting {
    pub id: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub start_date_time: Option<String>,
    #[serde(default)]
    pub end_date_time: Option<String>,
    #[serde(default)]
    pub join_web_url: Option<String>,
}

/// Microsoft Graph API client
pub struct Client {
    client: AuthenticatedClient,
    base_url: String,
}

impl Client {
    /// Build a client from the credential settings in `config`.
    ///
    /// Fails with a configuration error, before any network activity, when
    /// `TENANT_ID`, `CLIENT_ID` or `CLIENT_SECRET` is missing.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http_client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(config.graph_timeout_secs))
            .user_agent(format!("teams-meeting-rs/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut credential = ClientSecretCredential::new(
            config.tenant_id(),
            config.client_id(),
            config.client_secret(),
            http_client.clone(),
        )?;
        if let Some(authority_host) = config.authority_host() {
            credential = credential.with_authority_host(authority_host);
        }

        let client = AuthenticatedClientBuilder::new()
            .with_credential(Box::new(credential))
            .with_scope(GRAPH_DEFAULT_SCOPE)
            .with_http_client(http_client)
            .build()?;

        Ok(Self {
            client,
            base_url: config.graph_base_url().to_string(),
        })
    }

    /// Create an online meeting for the organizer in `input`.
    ///
    /// Issues exactly one create call. Failures are returned unclassified so the
    /// caller can map them once.
    pub async fn create_online_meeting(
        &self,
        input: &NormalizedMeetingInput,
    ) -> Result<OnlineMeeting, GraphError> {
        let url = format!(
            "{}/users/{}/onlineMeetings",
            self.base_url,
            urlencoding::encode(&input.organizer_id)
        );
        let request = CreateOnlineMeetingRequest::from(input);

        debug!("Creating Teams meeting for organizer {}", input.organizer_id);

        let response = self
            .client
            .post_json(&url, &request)
            .await
            .map_err(|e| {
                warn!("Failed to reach Microsoft Graph: {e}");
                GraphError::from(&e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Microsoft Graph API error ({status}): {body}");
            return Err(GraphError::from_response(status.as_u16(), &body));
        }

        let meeting: OnlineMeeting = response.json().await.map_err(|e| {
            warn!("Failed to parse Microsoft Graph response: {e:?}");
            GraphError {
                message: Some("Unexpected response body from Microsoft Graph".to_string()),
                ..Default::default()
            }
        })?;

        info!("Created Teams meeting: {}", meeting.id);
        Ok(meeting)
    }
}
