//! Ticket aggregate and its input values.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Validation failures for ticket input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TicketValidationError {
    #[error("ticket id must be a valid UUID")]
    InvalidId,
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("unknown ticket status: {0}")]
    UnknownStatus(String),
}

/// Ticket identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Parse a path segment. Anything that is not a UUID is rejected, which
    /// handlers report exactly like a missing ticket.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TicketValidationError> {
        Uuid::parse_str(raw.as_ref())
            .map(Self)
            .map_err(|_| TicketValidationError::InvalidId)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Fixed set of workflow states; only admins change them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    #[serde(rename = "Open")]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Waiting on User")]
    WaitingOnUser,
    #[serde(rename = "Resolved")]
    Resolved,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        Self::Open,
        Self::InProgress,
        Self::WaitingOnUser,
        Self::Resolved,
    ];

    /// Display and storage label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::WaitingOnUser => "Waiting on User",
            Self::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = TicketValidationError;

    /// Exact, case-sensitive match against the labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| TicketValidationError::UnknownStatus(s.to_owned()))
    }
}

/// Category suggestions offered by the new-ticket form. Any non-empty
/// category is accepted.
pub const SUGGESTED_CATEGORIES: [&str; 5] = ["IT Support", "Facilities", "HR", "Finance", "Other"];

fn required(field: &'static str, raw: &str) -> Result<String, TicketValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TicketValidationError::MissingField { field });
    }
    Ok(trimmed.to_owned())
}

/// Validated input for a new ticket.
///
/// ## Invariants
/// - `title`, `description` and `category` are trimmed and non-empty.
/// - Content is otherwise verbatim; rendering must escape it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    title: String,
    description: String,
    category: String,
}

impl TicketDraft {
    pub fn try_from_parts(
        title: &str,
        description: &str,
        category: &str,
    ) -> Result<Self, TicketValidationError> {
        Ok(Self {
            title: required("title", title)?,
            description: required("description", description)?,
            category: required("category", category)?,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// A stored ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: TicketId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Build a fresh `Open` ticket from a draft.
    pub fn open(id: TicketId, owner_id: UserId, draft: TicketDraft, now: DateTime<Utc>) -> Self {
        let TicketDraft {
            title,
            description,
            category,
        } = draft;
        Self {
            id,
            owner_id,
            title,
            description,
            category,
            status: TicketStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Ticket joined with its owner's username, as listed on the admin dashboard
/// and shown on detail pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketOverview {
    pub ticket: Ticket,
    pub owner_username: String,
}

/// Title filter for ticket listings.
///
/// Matching is a case-insensitive literal substring test on the term exactly
/// as entered; surrounding whitespace is part of the term. Only the empty
/// term matches everything. The term never influences which owner's tickets
/// are searched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// In-process form of the match, used by adapters that filter in memory.
    pub fn matches(&self, title: &str) -> bool {
        self.is_empty() || title.to_lowercase().contains(&self.0.to_lowercase())
    }

    /// `ILIKE` pattern with `\`, `%` and `_` escaped so the term is literal.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for ch in self.0.chars() {
            if matches!(ch, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }
}
