//! Port for assignment persistence.
use async_trait::async_trait;

use crate::domain::{Assignment, ComplaintId, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by assignment repository adapters.
    pub enum AssignmentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "assignment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "assignment repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Append an assignment. Duplicated pairs are stored as separate records.
    async fn insert(&self, assignment: &Assignment) -> Result<(), AssignmentPersistenceError>;

    /// Assignments naming `engineer`, newest first.
    async fn list_for_engineer(
        &self,
        engineer: &Username,
    ) -> Result<Vec<Assignment>, AssignmentPersistenceError>;

    /// Assignments referencing any of `complaint_ids`, oldest first.
    async fn list_for_complaints(
        &self,
        complaint_ids: &[ComplaintId],
    ) -> Result<Vec<Assignment>, AssignmentPersistenceError>;
}
