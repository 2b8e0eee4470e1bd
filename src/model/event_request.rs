//! Customer event requests and the reviews attached to them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{RecordId, Role};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Event Request
// ---------------------------------------------------------------------------

/// A customer's request for an event, tracked through the review chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub id: RecordId,

    /// Free-text reference from the intake form, if the client quoted one.
    pub record_number: Option<String>,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub event_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub expected_number: u32,
    pub budget: u64,
    pub preferences: Preferences,

    pub status: EventRequestStatus,
    pub created_by: Role,

    /// Attached once, by the Financial Manager.
    pub financial_review: Option<FinancialReview>,
    /// Attached once, by the Administration Manager.
    pub administration_review: Option<AdministrationReview>,
    /// Comments of whichever review rejected the request.
    pub rejection_reason: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Services the client asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub decoration: bool,
    #[serde(default)]
    pub food: bool,
    #[serde(default)]
    pub drinks: bool,
    #[serde(default)]
    pub photo: bool,
    #[serde(default)]
    pub parties: bool,
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of an event request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventRequestStatus {
    /// Captured by Customer Service, not yet forwarded.
    Draft,
    PendingScsReview,
    PendingFinancialReview,
    PendingAdministrationReview,
    /// Terminal.
    Approved,
    /// Terminal.
    Rejected,
}

impl EventRequestStatus {
    pub const ALL: [EventRequestStatus; 6] = [
        EventRequestStatus::Draft,
        EventRequestStatus::PendingScsReview,
        EventRequestStatus::PendingFinancialReview,
        EventRequestStatus::PendingAdministrationReview,
        EventRequestStatus::Approved,
        EventRequestStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventRequestStatus::Draft => "DRAFT",
            EventRequestStatus::PendingScsReview => "PENDING_SCS_REVIEW",
            EventRequestStatus::PendingFinancialReview => "PENDING_FINANCIAL_REVIEW",
            EventRequestStatus::PendingAdministrationReview => "PENDING_ADMINISTRATION_REVIEW",
            EventRequestStatus::Approved => "APPROVED",
            EventRequestStatus::Rejected => "REJECTED",
        }
    }

    /// Is this a terminal state?
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            EventRequestStatus::Approved | EventRequestStatus::Rejected
        )
    }
}

impl std::fmt::Display for EventRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventRequestStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        EventRequestStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::UnknownStatus(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// A reviewer's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Approve,
    Reject,
}

impl Recommendation {
    pub fn as_str(self) -> &'static str {
        match self {
            Recommendation::Approve => "APPROVE",
            Recommendation::Reject => "REJECT",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Recommendation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "APPROVE" => Ok(Recommendation::Approve),
            "REJECT" => Ok(Recommendation::Reject),
            other => Err(Error::UnknownRecommendation(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReview {
    pub reviewed_by: String,
    pub comments: String,
    pub recommendation: Recommendation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministrationReview {
    pub reviewed_by: String,
    pub comments: String,
    pub recommendation: Recommendation,
}

impl FinancialReview {
    pub(crate) fn validate(&self) -> Result<()> {
        require_text("reviewedBy", &self.reviewed_by)
    }
}

impl AdministrationReview {
    pub(crate) fn validate(&self) -> Result<()> {
        require_text("reviewedBy", &self.reviewed_by)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Intake payload for a new event request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEventRequest {
    #[serde(default)]
    pub record_number: Option<String>,
    pub client_name: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub client_phone: String,
    pub event_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub expected_number: u32,
    pub budget: u64,
    #[serde(default)]
    pub preferences: Preferences,
}

impl NewEventRequest {
    pub fn new(
        client_name: impl Into<String>,
        event_type: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            record_number: None,
            client_name: client_name.into(),
            client_email: String::new(),
            client_phone: String::new(),
            event_type: event_type.into(),
            start_date,
            end_date,
            expected_number: 1,
            budget: 1,
            preferences: Preferences::default(),
        }
    }

    pub fn record_number(mut self, record_number: impl Into<String>) -> Self {
        self.record_number = Some(record_number.into());
        self
    }

    pub fn contact(mut self, email: impl Into<String>, phone: impl Into<String>) -> Self {
        self.client_email = email.into();
        self.client_phone = phone.into();
        self
    }

    pub fn expected_number(mut self, n: u32) -> Self {
        self.expected_number = n;
        self
    }

    pub fn budget(mut self, budget: u64) -> Self {
        self.budget = budget;
        self
    }

    pub fn preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Reject payloads the intake form would never have produced.
    pub(crate) fn validate(&self) -> Result<()> {
        require_text("clientName", &self.client_name)?;
        require_text("eventType", &self.event_type)?;
        if self.expected_number == 0 {
            return Err(Error::Validation(
                "expectedNumber must be positive".to_string(),
            ));
        }
        if self.budget == 0 {
            return Err(Error::Validation("budget must be positive".to_string()));
        }
        if self.end_date < self.start_date {
            return Err(Error::Validation(format!(
                "endDate {} is before startDate {}",
                self.end_date, self.start_date
            )));
        }
        Ok(())
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::Validation(format!("{field} must not be blank")))
    } else {
        Ok(())
    }
}
