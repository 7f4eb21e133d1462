//! PostgreSQL-backed `TicketRepository` implementation using Diesel ORM.
//!
//! Search terms are bound as parameters to `ILIKE` with wildcards escaped,
//! and owner scoping is a `WHERE` clause on the same statement as the id
//! lookup.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NewComment, TicketPersistenceError, TicketRepository, TicketScope};
use crate::domain::{
    Comment, CommentKind, SearchTerm, Ticket, TicketId, TicketOverview, TicketStatus, UserId,
};

use super::diesel_error_mapping::{map_basic_diesel_error, map_pool_error};
use super::models::{CommentRow, TicketRow};
use super::pool::DbPool;
use super::schema::{admin_comments, tickets, user_comments, users};

#[derive(Clone)]
pub struct DieselTicketRepository {
    pool: DbPool,
}

impl DieselTicketRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> TicketPersistenceError {
    map_basic_diesel_error(
        error,
        TicketPersistenceError::query,
        TicketPersistenceError::connection,
    )
}

fn map_connection_error(error: super::pool::PoolError) -> TicketPersistenceError {
    map_pool_error(error, TicketPersistenceError::connection)
}

fn decode(row: TicketRow) -> Result<Ticket, TicketPersistenceError> {
    row.into_ticket()
        .map_err(|err| TicketPersistenceError::query(err.to_string()))
}

fn decode_overview(
    (row, owner_username): (TicketRow, String),
) -> Result<TicketOverview, TicketPersistenceError> {
    Ok(TicketOverview {
        ticket: decode(row)?,
        owner_username,
    })
}

/// Comment queries are identical for both tables apart from the table itself.
macro_rules! comment_table_ops {
    ($insert_fn:ident, $list_fn:ident, $table:ident) => {
        async fn $insert_fn<C>(conn: &mut C, comment: &NewComment) -> QueryResult<usize>
        where
            C: diesel_async::AsyncConnection<Backend = diesel::pg::Pg> + Send,
        {
            diesel::insert_into($table::table)
                .values((
                    $table::id.eq(comment.id),
                    $table::ticket_id.eq(*comment.ticket_id.as_uuid()),
                    $table::author_id.eq(*comment.author_id.as_uuid()),
                    $table::body.eq(&comment.body),
                    $table::created_at.eq(comment.created_at),
                ))
                .execute(conn)
                .await
        }

        async fn $list_fn<C>(conn: &mut C, ticket: &TicketId) -> QueryResult<Vec<CommentRow>>
        where
            C: diesel_async::AsyncConnection<Backend = diesel::pg::Pg> + Send,
        {
            $table::table
                .inner_join(users::table)
                .filter($table::ticket_id.eq(*ticket.as_uuid()))
                .order(($table::created_at.asc(), $table::id.asc()))
                .select((
                    $table::id,
                    $table::ticket_id,
                    $table::author_id,
                    $table::body,
                    $table::created_at,
                    users::username,
                ))
                .load::<CommentRow>(conn)
                .await
        }
    };
}

comment_table_ops!(insert_user_comment, list_user_comments, user_comments);
comment_table_ops!(insert_admin_comment, list_admin_comments, admin_comments);

#[async_trait]
impl TicketRepository for DieselTicketRepository {
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_connection_error)?;
        diesel::insert_into(tickets::table)
            .values(&TicketRow::from(ticket))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
        search: &SearchTerm,
    ) -> Result<Vec<Ticket>, TicketPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_connection_error)?;

        let mut query = tickets::table
            .filter(tickets::owner_id.eq(*owner.as_uuid()))
            .select(TicketRow::as_select())
            .into_boxed();
        if !search.is_empty() {
            query = query.filter(tickets::title.ilike(search.like_pattern()));
        }

        let rows = query
            .order((tickets::created_at.desc(), tickets::id.desc()))
            .load::<TicketRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(decode).collect()
    }

    async fn list_all(&self) -> Result<Vec<TicketOverview>, TicketPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_connection_error)?;
        let rows = tickets::table
            .inner_join(users::table)
            .order((tickets::created_at.desc(), tickets::id.desc()))
            .select((TicketRow::as_select(), users::username))
            .load::<(TicketRow, String)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(decode_overview).collect()
    }

    async fn find_visible(
        &self,
        id: &TicketId,
        scope: &TicketScope,
    ) -> Result<Option<TicketOverview>, TicketPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_connection_error)?;

        let mut query = tickets::table
            .inner_join(users::table)
            .filter(tickets::id.eq(*id.as_uuid()))
            .select((TicketRow::as_select(), users::username))
            .into_boxed();
        if let TicketScope::OwnedBy(owner) = scope {
            query = query.filter(tickets::owner_id.eq(*owner.as_uuid()));
        }

        let row = query
            .first::<(TicketRow, String)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(decode_overview).transpose()
    }

    async fn update_status(
        &self,
        id: &TicketId,
        status: TicketStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, TicketPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_connection_error)?;
        let affected = diesel::update(tickets::table.find(*id.as_uuid()))
            .set((
                tickets::status.eq(status.label()),
                tickets::updated_at.eq(updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn insert_comment(
        &self,
        kind: CommentKind,
        comment: &NewComment,
    ) -> Result<(), TicketPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_connection_error)?;
        let result = match kind {
            CommentKind::User => insert_user_comment(&mut conn, comment).await,
            CommentKind::Admin => insert_admin_comment(&mut conn, comment).await,
        };
        result.map(|_| ()).map_err(map_diesel_error)
    }

    async fn list_comments(
        &self,
        ticket: &TicketId,
        kind: CommentKind,
    ) -> Result<Vec<Comment>, TicketPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_connection_error)?;
        let rows = match kind {
            CommentKind::User => list_user_comments(&mut conn, ticket).await,
            CommentKind::Admin => list_admin_comments(&mut conn, ticket).await,
        }
        .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }
}
