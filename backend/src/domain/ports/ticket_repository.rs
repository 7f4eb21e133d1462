//! Port for ticket and comment persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Comment, CommentKind, SearchTerm, Ticket, TicketId, TicketOverview, TicketStatus, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ticket repository adapters.
    pub enum TicketPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "ticket repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ticket repository query failed: {message}",
    }
}

/// Ownership predicate applied inside a ticket lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketScope {
    /// Only tickets owned by this user are visible.
    OwnedBy(UserId),
    /// Every ticket is visible.
    Any,
}

impl TicketScope {
    pub fn admits(&self, owner_id: &UserId) -> bool {
        match self {
            Self::OwnedBy(viewer) => viewer == owner_id,
            Self::Any => true,
        }
    }
}

/// Comment row ready to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub id: uuid::Uuid,
    pub ticket_id: TicketId,
    pub author_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketPersistenceError>;

    /// Tickets owned by `owner` whose title matches `search`, newest first.
    async fn list_for_owner(
        &self,
        owner: &UserId,
        search: &SearchTerm,
    ) -> Result<Vec<Ticket>, TicketPersistenceError>;

    /// Every ticket with its owner's username, newest first.
    async fn list_all(&self) -> Result<Vec<TicketOverview>, TicketPersistenceError>;

    /// Single lookup with the ownership predicate applied in the same query.
    /// A ticket outside `scope` is reported exactly like a missing one.
    async fn find_visible(
        &self,
        id: &TicketId,
        scope: &TicketScope,
    ) -> Result<Option<TicketOverview>, TicketPersistenceError>;

    /// Returns `false` when no ticket has this id.
    async fn update_status(
        &self,
        id: &TicketId,
        status: TicketStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, TicketPersistenceError>;

    async fn insert_comment(
        &self,
        kind: CommentKind,
        comment: &NewComment,
    ) -> Result<(), TicketPersistenceError>;

    /// Comments of one stream, oldest first.
    async fn list_comments(
        &self,
        ticket: &TicketId,
        kind: CommentKind,
    ) -> Result<Vec<Comment>, TicketPersistenceError>;
}
