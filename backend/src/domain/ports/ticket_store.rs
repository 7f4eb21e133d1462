//! Driving port for ticket use-cases.

use async_trait::async_trait;

use crate::domain::{
    Comment, CommentBody, CommentKind, Error, SearchTerm, SessionUser, Ticket, TicketDraft,
    TicketId, TicketOverview, TicketStatus, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn create(&self, owner: &SessionUser, draft: TicketDraft) -> Result<TicketId, Error>;

    /// Own tickets only; `owner` must come from the session, never from
    /// request input.
    async fn list_for_owner(&self, owner: &UserId, search: &SearchTerm)
    -> Result<Vec<Ticket>, Error>;

    async fn list_all(&self) -> Result<Vec<TicketOverview>, Error>;

    /// The ticket when `viewer` owns it or is an admin, otherwise `None`.
    async fn get_for_viewer(
        &self,
        id: &TicketId,
        viewer: &SessionUser,
    ) -> Result<Option<TicketOverview>, Error>;

    /// Missing tickets fail with [`crate::domain::ErrorCode::NotFound`].
    async fn update_status(
        &self,
        id: &TicketId,
        status: TicketStatus,
        actor: &SessionUser,
    ) -> Result<(), Error>;

    /// Append to one comment stream. User comments need a ticket visible to
    /// `author`; admin comments need the ticket to exist.
    async fn add_comment(
        &self,
        id: &TicketId,
        author: &SessionUser,
        body: CommentBody,
        kind: CommentKind,
    ) -> Result<(), Error>;

    async fn comments(&self, id: &TicketId, kind: CommentKind) -> Result<Vec<Comment>, Error>;
}
