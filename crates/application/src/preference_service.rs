//! Application service for user preferences and Slack integration.

use std::sync::Arc;

use chrono::Utc;

use cadre_core::{AppError, AppResult, UserIdentity};
use cadre_domain::{SlackIntegration, UserPreferences, validate_slack_webhook_url};

use crate::preference_ports::{PreferenceRepository, SlackNotifier};

/// Input for creating or replacing a Slack integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackIntegrationInput {
    /// Incoming-webhook URL.
    pub webhook_url: String,
    /// Optional channel label.
    pub channel_name: Option<String>,
    /// Whether notifications should be delivered.
    pub is_active: bool,
}

/// Application service for per-user settings.
#[derive(Clone)]
pub struct PreferenceService {
    repository: Arc<dyn PreferenceRepository>,
    notifier: Arc<dyn SlackNotifier>,
}

impl PreferenceService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(repository: Arc<dyn PreferenceRepository>, notifier: Arc<dyn SlackNotifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Returns the acting user's preferences.
    pub async fn preferences(&self, actor: &UserIdentity) -> AppResult<UserPreferences> {
        self.repository.preferences_for(actor.subject()).await
    }

    /// Validates and persists the acting user's preferences.
    pub async fn update_preferences(
        &self,
        actor: &UserIdentity,
        preferences: UserPreferences,
    ) -> AppResult<UserPreferences> {
        preferences.validate()?;
        self.repository
            .save_preferences(actor.subject(), &preferences)
            .await?;
        Ok(preferences)
    }

    /// Returns the acting user's Slack integration, if configured.
    pub async fn slack_integration(
        &self,
        actor: &UserIdentity,
    ) -> AppResult<Option<SlackIntegration>> {
        self.repository.slack_integration_for(actor.subject()).await
    }

    /// Creates or replaces the acting user's Slack integration.
    pub async fn set_slack_integration(
        &self,
        actor: &UserIdentity,
        input: SlackIntegrationInput,
    ) -> AppResult<SlackIntegration> {
        validate_slack_webhook_url(input.webhook_url.as_str())?;

        let now = Utc::now();
        let created_at = self
            .repository
            .slack_integration_for(actor.subject())
            .await?
            .map_or(now, |existing| existing.created_at);

        let integration = SlackIntegration {
            webhook_url: input.webhook_url,
            channel_name: input.channel_name,
            is_active: input.is_active,
            created_at,
            updated_at: now,
        };

        self.repository
            .upsert_slack_integration(actor.subject(), &integration)
            .await?;

        Ok(integration)
    }

    /// Removes the acting user's Slack integration.
    pub async fn remove_slack_integration(&self, actor: &UserIdentity) -> AppResult<()> {
        let removed = self
            .repository
            .delete_slack_integration(actor.subject())
            .await?;

        if !removed {
            return Err(AppError::NotFound(
                "no slack integration is configured".to_owned(),
            ));
        }

        Ok(())
    }

    /// Delivers a test message through the configured, active webhook.
    pub async fn send_test_notification(&self, actor: &UserIdentity) -> AppResult<()> {
        let integration = self
            .repository
            .slack_integration_for(actor.subject())
            .await?
            .ok_or_else(|| {
                AppError::NotFound("no slack integration is configured".to_owned())
            })?;

        if !integration.is_active {
            return Err(AppError::Validation(
                "slack integration is disabled".to_owned(),
            ));
        }

        self.notifier
            .send_message(
                integration.webhook_url.as_str(),
                &format!(
                    "Cadre test notification for {} — your webhook is wired up.",
                    actor.display_name()
                ),
            )
            .await
    }
}
