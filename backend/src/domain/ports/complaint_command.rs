//! Driving port for submitting complaints.

use async_trait::async_trait;

use crate::domain::{Complaint, ComplaintSubmission, Error, Identity};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintCommand: Send + Sync {
    /// Record a complaint on behalf of `submitter`.
    async fn submit(
        &self,
        submitter: &Identity,
        submission: &ComplaintSubmission,
    ) -> Result<Complaint, Error>;
}
