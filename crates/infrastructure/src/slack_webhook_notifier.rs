//! Slack incoming-webhook notifier.

use async_trait::async_trait;
use serde_json::json;

use cadre_application::SlackNotifier;
use cadre_core::{AppError, AppResult};

/// Notifier posting messages to Slack incoming webhooks over HTTPS.
#[derive(Clone)]
pub struct SlackWebhookNotifier {
    http_client: reqwest::Client,
}

impl SlackWebhookNotifier {
    /// Creates a notifier over an existing HTTP client.
    #[must_use]
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl SlackNotifier for SlackWebhookNotifier {
    async fn send_message(&self, webhook_url: &str, text: &str) -> AppResult<()> {
        let response = self
            .http_client
            .post(webhook_url)
            .json(&json!({ "text": text }))
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to reach slack webhook: {error}"))
            })?;

        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "slack webhook rejected the message with status {}",
                response.status()
            )));
        }

        Ok(())
    }
}
