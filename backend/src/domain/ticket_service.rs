//! Ticket store service.
//!
//! Implements the [`TicketStore`] driving port. Identifiers are generated
//! here, timestamps come from the injected clock, and every ownership check is
//! delegated to a scoped repository lookup.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::{
    NewComment, TicketPersistenceError, TicketRepository, TicketScope, TicketStore,
};
use crate::domain::{
    Comment, CommentBody, CommentKind, Error, EventLog, SearchTerm, SessionUser, Ticket,
    TicketDraft, TicketId, TicketOverview, TicketStatus, UserId,
};

/// Shown when a ticket is missing or outside the caller's scope.
pub const TICKET_NOT_FOUND: &str = "Ticket not found.";

fn map_ticket_error(error: TicketPersistenceError) -> Error {
    match error {
        TicketPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("ticket repository unavailable: {message}"))
        }
        TicketPersistenceError::Query { message } => {
            Error::internal(format!("ticket repository error: {message}"))
        }
    }
}

fn scope_for(viewer: &SessionUser) -> TicketScope {
    if viewer.is_admin() {
        TicketScope::Any
    } else {
        TicketScope::OwnedBy(viewer.user_id)
    }
}

/// Ticket use-cases over a [`TicketRepository`].
pub struct TicketService<R> {
    tickets: Arc<R>,
    clock: Arc<dyn Clock>,
    events: EventLog,
}

impl<R> TicketService<R> {
    pub fn new(tickets: Arc<R>, clock: Arc<dyn Clock>, events: EventLog) -> Self {
        Self {
            tickets,
            clock,
            events,
        }
    }
}

impl<R: TicketRepository> TicketService<R> {
    async fn failed(&self, context: String, error: TicketPersistenceError) -> Error {
        self.events.report(&context, map_ticket_error(error)).await
    }
}

#[async_trait]
impl<R: TicketRepository> TicketStore for TicketService<R> {
    async fn create(&self, owner: &SessionUser, draft: TicketDraft) -> Result<TicketId, Error> {
        let ticket = Ticket::open(TicketId::random(), owner.user_id, draft, self.clock.utc());
        if let Err(err) = self.tickets.insert(&ticket).await {
            return Err(self
                .failed(format!("Ticket creation error for {}", owner.username), err)
                .await);
        }
        self.events
            .info(format!(
                "Ticket created by {} (ID {})",
                owner.username, ticket.id
            ))
            .await;
        Ok(ticket.id)
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
        search: &SearchTerm,
    ) -> Result<Vec<Ticket>, Error> {
        match self.tickets.list_for_owner(owner, search).await {
            Ok(tickets) => Ok(tickets),
            Err(err) => Err(self.failed("SQL error on listing tickets".into(), err).await),
        }
    }

    async fn list_all(&self) -> Result<Vec<TicketOverview>, Error> {
        match self.tickets.list_all().await {
            Ok(tickets) => Ok(tickets),
            Err(err) => Err(self.failed("Admin dashboard error".into(), err).await),
        }
    }

    async fn get_for_viewer(
        &self,
        id: &TicketId,
        viewer: &SessionUser,
    ) -> Result<Option<TicketOverview>, Error> {
        match self.tickets.find_visible(id, &scope_for(viewer)).await {
            Ok(found) => Ok(found),
            Err(err) => Err(self.failed(format!("Ticket fetch error for {id}"), err).await),
        }
    }

    async fn update_status(
        &self,
        id: &TicketId,
        status: TicketStatus,
        actor: &SessionUser,
    ) -> Result<(), Error> {
        match self.tickets.update_status(id, status, self.clock.utc()).await {
            Ok(true) => {
                self.events
                    .info(format!(
                        "Admin {} updated status for ticket {id} to {status}",
                        actor.username
                    ))
                    .await;
                Ok(())
            }
            Ok(false) => Err(Error::not_found(TICKET_NOT_FOUND)),
            Err(err) => Err(self
                .failed(format!("Status update error for ticket {id}"), err)
                .await),
        }
    }

    async fn add_comment(
        &self,
        id: &TicketId,
        author: &SessionUser,
        body: CommentBody,
        kind: CommentKind,
    ) -> Result<(), Error> {
        let scope = match kind {
            CommentKind::User => scope_for(author),
            CommentKind::Admin => TicketScope::Any,
        };
        let visible = match self.tickets.find_visible(id, &scope).await {
            Ok(found) => found.is_some(),
            Err(err) => {
                return Err(self
                    .failed(format!("Ticket fetch error for {id}"), err)
                    .await);
            }
        };
        if !visible {
            return Err(Error::not_found(TICKET_NOT_FOUND));
        }

        let comment = NewComment {
            id: Uuid::new_v4(),
            ticket_id: *id,
            author_id: author.user_id,
            body: body.into_inner(),
            created_at: self.clock.utc(),
        };
        match self.tickets.insert_comment(kind, &comment).await {
            Ok(()) => Ok(()),
            Err(err) => Err(self
                .failed(format!("Comment error on ticket {id}"), err)
                .await),
        }
    }

    async fn comments(&self, id: &TicketId, kind: CommentKind) -> Result<Vec<Comment>, Error> {
        match self.tickets.list_comments(id, kind).await {
            Ok(comments) => Ok(comments),
            Err(err) => Err(self
                .failed(format!("Comments fetch error for ticket {id}"), err)
                .await),
        }
    }
}

#[cfg(test)]
#[path = "ticket_service_tests.rs"]
mod tests;
