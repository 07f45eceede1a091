//! PostgreSQL-backed `ComplaintRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ComplaintPersistenceError, ComplaintRepository};
use crate::domain::{Complaint, ComplaintId, UserId, Username};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ComplaintRow, NewComplaintRow};
use super::pool::{DbPool, PoolError};
use super::schema::complaints;

/// Diesel-backed implementation of the `ComplaintRepository` port.
#[derive(Clone)]
pub struct DieselComplaintRepository {
    pool: DbPool,
}

impl DieselComplaintRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ComplaintPersistenceError {
    map_basic_pool_error(error, ComplaintPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ComplaintPersistenceError {
    map_basic_diesel_error(
        error,
        ComplaintPersistenceError::query,
        ComplaintPersistenceError::connection,
    )
}

fn row_to_complaint(row: ComplaintRow) -> Result<Complaint, ComplaintPersistenceError> {
    let submitter = Username::new(&row.submitter_username).map_err(|err| {
        ComplaintPersistenceError::query(format!("stored complaint {} is invalid: {err}", row.id))
    })?;
    Ok(Complaint::from_parts(
        ComplaintId::from(row.id),
        UserId::from(row.submitted_by),
        submitter,
        row.contact,
        row.description,
        row.created_at,
    ))
}

#[async_trait]
impl ComplaintRepository for DieselComplaintRepository {
    async fn insert(&self, complaint: &Complaint) -> Result<(), ComplaintPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewComplaintRow {
            id: *complaint.id().as_uuid(),
            submitted_by: *complaint.submitted_by().as_uuid(),
            submitter_username: complaint.submitter().as_ref(),
            contact: complaint.contact(),
            description: complaint.description(),
            created_at: complaint.created_at(),
        };
        diesel::insert_into(complaints::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(drop)
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &ComplaintId,
    ) -> Result<Option<Complaint>, ComplaintPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        complaints::table
            .filter(complaints::id.eq(*id.as_uuid()))
            .select(ComplaintRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_complaint)
            .transpose()
    }

    async fn list_recent(&self) -> Result<Vec<Complaint>, ComplaintPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ComplaintRow> = complaints::table
            .order(complaints::created_at.desc())
            .select(ComplaintRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_complaint).collect()
    }
}
