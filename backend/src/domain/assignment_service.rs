//! Assignment workflow: assigning complaints and reading the resulting
//! board and worklists.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use futures_util::try_join;
use mockable::Clock;

use crate::domain::account_service::map_user_error;
use crate::domain::complaint_service::map_complaint_error;
use crate::domain::ports::{
    AssignmentCommand, AssignmentPersistenceError, AssignmentQuery, AssignmentRepository,
    ComplaintRepository, UserRepository,
};
use crate::domain::{
    AssignedComplaint, Assignment, AssignmentBoard, AssignmentId, AssignmentRequest, BoardEntry,
    COMPLAINT_FIELD, Complaint, ComplaintId, ComplaintStatus, ENGINEER_FIELD, EngineerSummary,
    Error, FieldErrors, Identity, Role, User, Username,
};

/// Service implementing [`AssignmentCommand`] and [`AssignmentQuery`].
#[derive(Clone)]
pub struct AssignmentService<U, C, A> {
    users: Arc<U>,
    complaints: Arc<C>,
    assignments: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<U, C, A> AssignmentService<U, C, A> {
    pub fn new(
        users: Arc<U>,
        complaints: Arc<C>,
        assignments: Arc<A>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            complaints,
            assignments,
            clock,
        }
    }
}

fn map_assignment_error(error: AssignmentPersistenceError) -> Error {
    match error {
        AssignmentPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("assignment repository unavailable: {message}"))
        }
        AssignmentPersistenceError::Query { message } => {
            Error::internal(format!("assignment repository error: {message}"))
        }
    }
}

impl<U, C, A> AssignmentService<U, C, A>
where
    U: UserRepository,
    C: ComplaintRepository,
    A: AssignmentRepository,
{
    async fn lookup_complaint(&self, raw_id: &str) -> Result<Option<Complaint>, Error> {
        let Some(id) = ComplaintId::parse(raw_id) else {
            return Ok(None);
        };
        self.complaints
            .find_by_id(&id)
            .await
            .map_err(map_complaint_error)
    }

    async fn lookup_engineer(&self, raw_name: &str) -> Result<Option<User>, Error> {
        let Ok(username) = Username::new(raw_name) else {
            return Ok(None);
        };
        let user = self
            .users
            .find_by_username(&username)
            .await
            .map_err(map_user_error)?;
        Ok(user.filter(|user| user.role() == Role::Engineer))
    }
}

#[async_trait]
impl<U, C, A> AssignmentCommand for AssignmentService<U, C, A>
where
    U: UserRepository,
    C: ComplaintRepository,
    A: AssignmentRepository,
{
    async fn assign(&self, request: &AssignmentRequest) -> Result<Assignment, Error> {
        let (complaint, engineer) = try_join!(
            self.lookup_complaint(request.complaint_id()),
            self.lookup_engineer(request.engineer_name()),
        )?;

        let mut errors = FieldErrors::default();
        if complaint.is_none() {
            errors.push(
                COMPLAINT_FIELD,
                format!("Unknown complaint {}", request.complaint_id()),
            );
        }
        if engineer.is_none() {
            errors.push(
                ENGINEER_FIELD,
                format!("Unknown engineer {}", request.engineer_name()),
            );
        }
        let (Some(complaint), Some(engineer)) = (complaint, engineer) else {
            return Err(Error::validation(errors));
        };

        let assignment = Assignment::new(
            AssignmentId::random(),
            *complaint.id(),
            engineer.username().clone(),
            self.clock.utc(),
        );
        self.assignments
            .insert(&assignment)
            .await
            .map_err(map_assignment_error)?;
        Ok(assignment)
    }
}

#[async_trait]
impl<U, C, A> AssignmentQuery for AssignmentService<U, C, A>
where
    U: UserRepository,
    C: ComplaintRepository,
    A: AssignmentRepository,
{
    async fn worklist(&self, engineer: &Identity) -> Result<Vec<AssignedComplaint>, Error> {
        let assignments = self
            .assignments
            .list_for_engineer(engineer.username())
            .await
            .map_err(map_assignment_error)?;

        try_join_all(assignments.into_iter().map(|assignment| async move {
            let complaint = self
                .complaints
                .find_by_id(assignment.complaint_id())
                .await
                .map_err(map_complaint_error)?;
            Ok::<_, Error>(AssignedComplaint {
                assignment,
                complaint,
            })
        }))
        .await
    }

    async fn board(&self) -> Result<AssignmentBoard, Error> {
        let (complaints, engineers) = try_join!(
            async { self.complaints.list_recent().await.map_err(map_complaint_error) },
            async {
                self.users
                    .list_by_role(Role::Engineer)
                    .await
                    .map_err(map_user_error)
            },
        )?;

        let ids: Vec<ComplaintId> = complaints.iter().map(|complaint| *complaint.id()).collect();
        let assignments = self
            .assignments
            .list_for_complaints(&ids)
            .await
            .map_err(map_assignment_error)?;

        let mut by_complaint: HashMap<ComplaintId, Vec<Assignment>> = HashMap::new();
        for assignment in assignments {
            by_complaint
                .entry(*assignment.complaint_id())
                .or_default()
                .push(assignment);
        }

        let entries = complaints
            .into_iter()
            .map(|complaint| {
                let status = ComplaintStatus::from_assignments(
                    by_complaint.get(complaint.id()).into_iter().flatten(),
                );
                BoardEntry { complaint, status }
            })
            .collect();
        let engineers = engineers
            .into_iter()
            .map(|user| EngineerSummary {
                username: user.username().clone(),
                display_name: user.display_name().clone(),
            })
            .collect();

        Ok(AssignmentBoard { entries, engineers })
    }
}

#[cfg(test)]
#[path = "assignment_service_tests.rs"]
mod tests;
