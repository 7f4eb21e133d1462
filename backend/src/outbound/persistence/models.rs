//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them into
//! domain types and report undecodable rows as query errors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Comment, LogEntry, Role, Ticket, TicketId, TicketStatus, User, UserId, Username,
};

use super::schema::{event_logs, tickets, users};

/// Row decoding failure (a stored value that violates a domain invariant).
#[derive(Debug, thiserror::Error)]
#[error("stored {column} is invalid: {reason}")]
pub(crate) struct RowDecodeError {
    column: &'static str,
    reason: String,
}

impl RowDecodeError {
    fn new(column: &'static str, reason: impl ToString) -> Self {
        Self {
            column,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<(User, String), RowDecodeError> {
        let username =
            Username::new(&self.username).map_err(|err| RowDecodeError::new("username", err))?;
        let role: Role = self
            .role
            .parse()
            .map_err(|err| RowDecodeError::new("role", err))?;
        Ok((
            User::new(UserId::from_uuid(self.id), username, role),
            self.password_hash,
        ))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TicketRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TicketRow {
    pub(crate) fn into_ticket(self) -> Result<Ticket, RowDecodeError> {
        let status: TicketStatus = self
            .status
            .parse()
            .map_err(|err| RowDecodeError::new("status", err))?;
        Ok(Ticket {
            id: TicketId::from_uuid(self.id),
            owner_id: UserId::from_uuid(self.owner_id),
            title: self.title,
            description: self.description,
            category: self.category,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<&Ticket> for TicketRow {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: *ticket.id.as_uuid(),
            owner_id: *ticket.owner_id.as_uuid(),
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            category: ticket.category.clone(),
            status: ticket.status.label().to_owned(),
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }
}

/// Comment joined with its author's username. Loaded positionally from
/// either comment table.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct CommentRow {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub author_username: String,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            ticket_id: TicketId::from_uuid(row.ticket_id),
            author_id: UserId::from_uuid(row.author_id),
            author_username: row.author_username,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = event_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventLogRow {
    pub id: Uuid,
    pub level: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl EventLogRow {
    pub(crate) fn into_entry(self) -> Result<LogEntry, RowDecodeError> {
        let level = self
            .level
            .parse()
            .map_err(|err: String| RowDecodeError::new("level", err))?;
        Ok(LogEntry {
            id: self.id,
            level,
            message: self.message,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = event_logs)]
pub(crate) struct NewEventLogRow<'a> {
    pub id: Uuid,
    pub level: &'a str,
    pub message: &'a str,
    pub created_at: DateTime<Utc>,
}
