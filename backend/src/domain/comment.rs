//! Append-only ticket comments.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{ticket::TicketId, user::UserId};

/// The two comment streams attached to a ticket.
///
/// User comments are visible to the ticket owner and admins; admin comments
/// are internal notes shown only on the admin ticket page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    User,
    Admin,
}

/// Rejected comment body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("comment cannot be empty")]
pub struct EmptyComment;

/// Trimmed, non-empty comment text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBody(String);

impl CommentBody {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmptyComment> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmptyComment);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A stored comment joined with its author's username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Uuid,
    pub ticket_id: TicketId,
    pub author_id: UserId,
    pub author_username: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
