//! PostgreSQL-backed `AssignmentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{AssignmentPersistenceError, AssignmentRepository};
use crate::domain::{Assignment, AssignmentId, ComplaintId, Username};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AssignmentRow, NewAssignmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::assignments;

/// Diesel-backed implementation of the `AssignmentRepository` port.
#[derive(Clone)]
pub struct DieselAssignmentRepository {
    pool: DbPool,
}

impl DieselAssignmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AssignmentPersistenceError {
    map_basic_pool_error(error, AssignmentPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AssignmentPersistenceError {
    map_basic_diesel_error(
        error,
        AssignmentPersistenceError::query,
        AssignmentPersistenceError::connection,
    )
}

fn row_to_assignment(row: AssignmentRow) -> Result<Assignment, AssignmentPersistenceError> {
    let engineer = Username::new(&row.engineer_username).map_err(|err| {
        AssignmentPersistenceError::query(format!("stored assignment {} is invalid: {err}", row.id))
    })?;
    Ok(Assignment::new(
        AssignmentId::from(row.id),
        ComplaintId::from(row.complaint_id),
        engineer,
        row.created_at,
    ))
}

fn rows_to_assignments(
    rows: Vec<AssignmentRow>,
) -> Result<Vec<Assignment>, AssignmentPersistenceError> {
    rows.into_iter().map(row_to_assignment).collect()
}

#[async_trait]
impl AssignmentRepository for DieselAssignmentRepository {
    async fn insert(&self, assignment: &Assignment) -> Result<(), AssignmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAssignmentRow {
            id: *assignment.id().as_uuid(),
            complaint_id: *assignment.complaint_id().as_uuid(),
            engineer_username: assignment.engineer().as_ref(),
            created_at: assignment.created_at(),
        };
        diesel::insert_into(assignments::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(drop)
            .map_err(map_diesel_error)
    }

    async fn list_for_engineer(
        &self,
        engineer: &Username,
    ) -> Result<Vec<Assignment>, AssignmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = assignments::table
            .filter(assignments::engineer_username.eq(engineer.as_ref()))
            .order(assignments::created_at.desc())
            .select(AssignmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_assignments(rows)
    }

    async fn list_for_complaints(
        &self,
        complaint_ids: &[ComplaintId],
    ) -> Result<Vec<Assignment>, AssignmentPersistenceError> {
        if complaint_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = complaint_ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = assignments::table
            .filter(assignments::complaint_id.eq_any(ids))
            .order(assignments::created_at.asc())
            .select(AssignmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_assignments(rows)
    }
}
