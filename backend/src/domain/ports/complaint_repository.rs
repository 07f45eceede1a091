//! Port for complaint persistence.
use async_trait::async_trait;

use crate::domain::{Complaint, ComplaintId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by complaint repository adapters.
    pub enum ComplaintPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "complaint repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "complaint repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    /// Persist a new complaint.
    async fn insert(&self, complaint: &Complaint) -> Result<(), ComplaintPersistenceError>;

    async fn find_by_id(
        &self,
        id: &ComplaintId,
    ) -> Result<Option<Complaint>, ComplaintPersistenceError>;

    /// Every complaint, newest first.
    async fn list_recent(&self) -> Result<Vec<Complaint>, ComplaintPersistenceError>;
}
