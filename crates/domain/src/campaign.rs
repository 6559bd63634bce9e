//! Campaign entities and the status workflow.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use cadre_core::{AppError, AppResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CampaignId(Uuid);

impl CampaignId {
    /// Creates a new random campaign identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a campaign identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for CampaignId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for CampaignId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Workflow states a campaign moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    /// Being planned; not yet running.
    Draft,
    /// Currently running.
    Active,
    /// Temporarily stopped; can resume.
    Paused,
    /// Finished successfully. Terminal.
    Completed,
    /// Stopped before completion. Terminal.
    Cancelled,
}

impl CampaignStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether the workflow allows moving to `next` from here.
    ///
    /// Draft campaigns activate or cancel; active campaigns pause,
    /// complete or cancel; paused campaigns resume or cancel. Completed
    /// and cancelled are terminal.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Active | Self::Cancelled)
                | (Self::Active, Self::Paused | Self::Completed | Self::Cancelled)
                | (Self::Paused, Self::Active | Self::Cancelled)
        )
    }
}

impl FromStr for CampaignStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(AppError::Validation(format!(
                "unknown campaign status '{value}'"
            ))),
        }
    }
}

/// Channels a campaign can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignType {
    /// Banner and display placements.
    DigitalDisplay,
    /// Social platform placements.
    SocialMedia,
    /// Paid search.
    SearchEngine,
    /// Video placements.
    Video,
    /// Audio and podcast placements.
    Audio,
    /// Print media.
    Print,
    /// Out-of-home placements.
    Outdoor,
    /// Influencer partnerships.
    Influencer,
}

impl CampaignType {
    /// Returns a stable storage value for this type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DigitalDisplay => "digital_display",
            Self::SocialMedia => "social_media",
            Self::SearchEngine => "search_engine",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Print => "print",
            Self::Outdoor => "outdoor",
            Self::Influencer => "influencer",
        }
    }
}

impl FromStr for CampaignType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "digital_display" => Ok(Self::DigitalDisplay),
            "social_media" => Ok(Self::SocialMedia),
            "search_engine" => Ok(Self::SearchEngine),
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            "print" => Ok(Self::Print),
            "outdoor" => Ok(Self::Outdoor),
            "influencer" => Ok(Self::Influencer),
            _ => Err(AppError::Validation(format!(
                "unknown campaign type '{value}'"
            ))),
        }
    }
}

/// An advertising campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    /// Stable campaign identifier.
    pub id: CampaignId,
    /// Display name.
    pub name: String,
    /// Objectives and strategy notes.
    pub description: String,
    /// Channel the campaign runs on.
    pub campaign_type: CampaignType,
    /// Current workflow state.
    pub status: CampaignStatus,
    /// Total allocated budget.
    pub budget: Decimal,
    /// Amount spent so far.
    pub spent_amount: Decimal,
    /// Scheduled start.
    pub start_date: DateTime<Utc>,
    /// Scheduled end.
    pub end_date: DateTime<Utc>,
    /// Subject of the owning user.
    pub owner_subject: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// Returns spend as a share of budget, zero when no budget is set.
    #[must_use]
    pub fn budget_utilization(&self) -> Decimal {
        if self.budget.is_zero() {
            return Decimal::ZERO;
        }
        self.spent_amount / self.budget
    }

    /// Returns whether spend exceeds the allocated budget.
    #[must_use]
    pub fn is_over_budget(&self) -> bool {
        self.spent_amount > self.budget
    }
}

/// Validated mutable campaign fields shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignInput {
    /// Display name.
    pub name: String,
    /// Objectives and strategy notes.
    pub description: String,
    /// Channel the campaign runs on.
    pub campaign_type: CampaignType,
    /// Total allocated budget.
    pub budget: Decimal,
    /// Scheduled start.
    pub start_date: DateTime<Utc>,
    /// Scheduled end.
    pub end_date: DateTime<Utc>,
}

impl CampaignInput {
    /// Validates the invariants shared by create and update: a non-empty
    /// name, a positive budget and an end date after the start date.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation(
                "campaign name must not be empty".to_owned(),
            ));
        }

        if self.budget <= Decimal::ZERO {
            return Err(AppError::Validation(
                "campaign budget must be positive".to_owned(),
            ));
        }

        if self.end_date <= self.start_date {
            return Err(AppError::Validation(
                "campaign end date must be after its start date".to_owned(),
            ));
        }

        Ok(())
    }
}
