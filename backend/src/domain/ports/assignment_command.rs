//! Driving port for assigning complaints to engineers.

use async_trait::async_trait;

use crate::domain::{Assignment, AssignmentRequest, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentCommand: Send + Sync {
    /// Validate that the complaint and engineer exist, then record a new
    /// assignment.
    async fn assign(&self, request: &AssignmentRequest) -> Result<Assignment, Error>;
}
