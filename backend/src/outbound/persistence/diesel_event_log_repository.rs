//! PostgreSQL-backed operational log.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::LogEntry;
use crate::domain::ports::{EventLogError, EventLogRepository};

use super::diesel_error_mapping::{map_basic_diesel_error, map_pool_error};
use super::models::{EventLogRow, NewEventLogRow};
use super::pool::DbPool;
use super::schema::event_logs;

#[derive(Clone)]
pub struct DieselEventLogRepository {
    pool: DbPool,
}

impl DieselEventLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> EventLogError {
    map_basic_diesel_error(error, EventLogError::query, EventLogError::connection)
}

#[async_trait]
impl EventLogRepository for DieselEventLogRepository {
    async fn append(&self, entry: &LogEntry) -> Result<(), EventLogError> {
        let mut conn = self
            .pool
            .checkout()
            .await
            .map_err(|err| map_pool_error(err, EventLogError::connection))?;
        let row = NewEventLogRow {
            id: entry.id,
            level: entry.level.as_str(),
            message: &entry.message,
            created_at: entry.created_at,
        };
        diesel::insert_into(event_logs::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn tail(&self, limit: usize) -> Result<Vec<LogEntry>, EventLogError> {
        let mut conn = self
            .pool
            .checkout()
            .await
            .map_err(|err| map_pool_error(err, EventLogError::connection))?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = event_logs::table
            .order((event_logs::created_at.desc(), event_logs::seq.desc()))
            .limit(limit)
            .select(EventLogRow::as_select())
            .load::<EventLogRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| {
                row.into_entry()
                    .map_err(|err| EventLogError::query(err.to_string()))
            })
            .collect()
    }
}
