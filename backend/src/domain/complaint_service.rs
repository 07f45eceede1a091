//! Complaint submission service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{ComplaintCommand, ComplaintPersistenceError, ComplaintRepository};
use crate::domain::{Complaint, ComplaintId, ComplaintSubmission, Error, Identity};

/// Service implementing [`ComplaintCommand`].
#[derive(Clone)]
pub struct ComplaintService<C> {
    complaints: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<C> ComplaintService<C> {
    pub fn new(complaints: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self { complaints, clock }
    }
}

pub(crate) fn map_complaint_error(error: ComplaintPersistenceError) -> Error {
    match error {
        ComplaintPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("complaint repository unavailable: {message}"))
        }
        ComplaintPersistenceError::Query { message } => {
            Error::internal(format!("complaint repository error: {message}"))
        }
    }
}

#[async_trait]
impl<C> ComplaintCommand for ComplaintService<C>
where
    C: ComplaintRepository,
{
    async fn submit(
        &self,
        submitter: &Identity,
        submission: &ComplaintSubmission,
    ) -> Result<Complaint, Error> {
        let complaint = submission
            .validate(submitter)
            .map_err(Error::validation)?
            .into_complaint(ComplaintId::random(), self.clock.utc());
        self.complaints
            .insert(&complaint)
            .await
            .map_err(map_complaint_error)?;
        Ok(complaint)
    }
}
