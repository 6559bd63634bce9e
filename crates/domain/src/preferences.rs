//! Per-user preferences and the optional Slack integration.

use cadre_core::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Per-user display preferences. Both fields are nullable; a null means
/// the product default applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// IANA timezone name, e.g. "Europe/Berlin".
    pub timezone: Option<String>,
    /// BCP-47 language tag, e.g. "en" or "pt-BR".
    pub language: Option<String>,
}

impl UserPreferences {
    /// Validates the shape of both fields without consulting a tz or
    /// locale database: timezones look like "Area/City" (or "UTC"),
    /// languages like "xx" or "xx-YY".
    pub fn validate(&self) -> AppResult<()> {
        if let Some(timezone) = self.timezone.as_deref() {
            validate_timezone(timezone)?;
        }

        if let Some(language) = self.language.as_deref() {
            validate_language(language)?;
        }

        Ok(())
    }
}

fn validate_timezone(value: &str) -> AppResult<()> {
    if value == "UTC" {
        return Ok(());
    }

    let well_formed = value.split('/').count() >= 2
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '/' | '_' | '+' | '-'))
        && !value.starts_with('/')
        && !value.ends_with('/');

    if !well_formed {
        return Err(AppError::Validation(format!(
            "'{value}' is not a valid timezone name"
        )));
    }

    Ok(())
}

fn validate_language(value: &str) -> AppResult<()> {
    let mut parts = value.split('-');
    let language = parts.next().unwrap_or_default();

    let language_ok = (2..=3).contains(&language.len())
        && language.chars().all(|ch| ch.is_ascii_lowercase());
    let region_ok = match parts.next() {
        Some(region) => region.len() == 2 && region.chars().all(|ch| ch.is_ascii_uppercase()),
        None => true,
    };

    if !language_ok || !region_ok || parts.next().is_some() {
        return Err(AppError::Validation(format!(
            "'{value}' is not a valid language tag"
        )));
    }

    Ok(())
}

/// Slack webhook binding used for user notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackIntegration {
    /// Validated incoming-webhook URL.
    pub webhook_url: String,
    /// Optional channel label shown in the settings UI.
    pub channel_name: Option<String>,
    /// Whether notifications are currently delivered.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validates a Slack incoming-webhook URL: https, a slack.com host and
/// the /services/ path prefix.
pub fn validate_slack_webhook_url(value: &str) -> AppResult<Url> {
    let url = Url::parse(value)
        .map_err(|error| AppError::Validation(format!("invalid webhook URL: {error}")))?;

    if url.scheme() != "https" {
        return Err(AppError::Validation(
            "webhook URL must use https".to_owned(),
        ));
    }

    let host_ok = url
        .host_str()
        .is_some_and(|host| host == "hooks.slack.com" || host.ends_with(".slack.com"));
    if !host_ok {
        return Err(AppError::Validation(
            "webhook URL must point at a slack.com host".to_owned(),
        ));
    }

    if !url.path().starts_with("/services/") {
        return Err(AppError::Validation(
            "webhook URL must be a Slack incoming webhook".to_owned(),
        ));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::{UserPreferences, validate_slack_webhook_url};

    #[test]
    fn default_preferences_are_valid() {
        assert!(UserPreferences::default().validate().is_ok());
    }

    #[test]
    fn well_formed_preferences_pass() {
        let preferences = UserPreferences {
            timezone: Some("America/Sao_Paulo".to_owned()),
            language: Some("pt-BR".to_owned()),
        };
        assert!(preferences.validate().is_ok());
    }

    #[test]
    fn utc_is_a_valid_timezone() {
        let preferences = UserPreferences {
            timezone: Some("UTC".to_owned()),
            language: None,
        };
        assert!(preferences.validate().is_ok());
    }

    #[test]
    fn malformed_timezone_is_rejected() {
        let preferences = UserPreferences {
            timezone: Some("not a timezone".to_owned()),
            language: None,
        };
        assert!(preferences.validate().is_err());
    }

    #[test]
    fn malformed_language_is_rejected() {
        for tag in ["English", "e", "en-gb", "en-GB-x"] {
            let preferences = UserPreferences {
                timezone: None,
                language: Some(tag.to_owned()),
            };
            assert!(preferences.validate().is_err(), "accepted '{tag}'");
        }
    }

    #[test]
    fn slack_webhook_url_is_validated() {
        assert!(
            validate_slack_webhook_url("https://hooks.slack.com/services/T000/B000/XXXX").is_ok()
        );
        assert!(validate_slack_webhook_url("http://hooks.slack.com/services/T000").is_err());
        assert!(validate_slack_webhook_url("https://example.com/services/T000").is_err());
        assert!(validate_slack_webhook_url("https://hooks.slack.com/webhook").is_err());
    }
}
