//! Ports for user preferences and notification delivery.

use async_trait::async_trait;

use cadre_core::AppResult;
use cadre_domain::{SlackIntegration, UserPreferences};

/// Repository port for per-user preference records.
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    /// Returns the subject's preferences, defaults when none are stored.
    async fn preferences_for(&self, subject: &str) -> AppResult<UserPreferences>;

    /// Persists the subject's preferences.
    async fn save_preferences(
        &self,
        subject: &str,
        preferences: &UserPreferences,
    ) -> AppResult<()>;

    /// Returns the subject's Slack integration, if any.
    async fn slack_integration_for(&self, subject: &str) -> AppResult<Option<SlackIntegration>>;

    /// Creates or replaces the subject's Slack integration.
    async fn upsert_slack_integration(
        &self,
        subject: &str,
        integration: &SlackIntegration,
    ) -> AppResult<()>;

    /// Removes the subject's Slack integration. Returns whether one
    /// existed.
    async fn delete_slack_integration(&self, subject: &str) -> AppResult<bool>;
}

/// Outbound port delivering notification text to a Slack webhook.
#[async_trait]
pub trait SlackNotifier: Send + Sync {
    /// Posts one message to the webhook.
    async fn send_message(&self, webhook_url: &str, text: &str) -> AppResult<()>;
}
