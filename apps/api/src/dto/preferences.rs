use cadre_domain::{SlackIntegration, UserPreferences};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of user preferences.
#[derive(Debug, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/user-preferences.ts"
)]
pub struct UserPreferencesPayload {
    pub timezone: Option<String>,
    pub language: Option<String>,
}

/// API representation of a Slack integration.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/slack-integration-response.ts"
)]
pub struct SlackIntegrationResponse {
    pub webhook_url: String,
    pub channel_name: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Incoming payload creating or replacing a Slack integration.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/save-slack-integration-request.ts"
)]
pub struct SaveSlackIntegrationRequest {
    pub webhook_url: String,
    pub channel_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl From<UserPreferences> for UserPreferencesPayload {
    fn from(value: UserPreferences) -> Self {
        Self {
            timezone: value.timezone,
            language: value.language,
        }
    }
}

impl From<UserPreferencesPayload> for UserPreferences {
    fn from(value: UserPreferencesPayload) -> Self {
        Self {
            timezone: value.timezone,
            language: value.language,
        }
    }
}

impl From<SlackIntegration> for SlackIntegrationResponse {
    fn from(value: SlackIntegration) -> Self {
        Self {
            webhook_url: value.webhook_url,
            channel_name: value.channel_name,
            is_active: value.is_active,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}
