//! Driving port for the admin board and the engineer worklist.

use async_trait::async_trait;

use crate::domain::{AssignedComplaint, AssignmentBoard, Error, Identity};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentQuery: Send + Sync {
    /// Assignments for the engineer behind `engineer`, newest first.
    async fn worklist(&self, engineer: &Identity) -> Result<Vec<AssignedComplaint>, Error>;

    /// All complaints with their status, plus the engineers available.
    async fn board(&self) -> Result<AssignmentBoard, Error>;
}
