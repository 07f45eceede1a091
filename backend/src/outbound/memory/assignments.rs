//! In-memory [`AssignmentRepository`].

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{AssignmentPersistenceError, AssignmentRepository};
use crate::domain::{Assignment, ComplaintId, Username};

use super::poisoned;

/// Append-only assignment log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssignmentRepository {
    assignments: Arc<RwLock<Vec<Assignment>>>,
}

impl InMemoryAssignmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored assignments.
    pub fn len(&self) -> usize {
        self.assignments.read().map(|held| held.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignmentRepository {
    async fn insert(&self, assignment: &Assignment) -> Result<(), AssignmentPersistenceError> {
        self.assignments
            .write()
            .map_err(|err| AssignmentPersistenceError::query(poisoned(err)))?
            .push(assignment.clone());
        Ok(())
    }

    async fn list_for_engineer(
        &self,
        engineer: &Username,
    ) -> Result<Vec<Assignment>, AssignmentPersistenceError> {
        let assignments = self
            .assignments
            .read()
            .map_err(|err| AssignmentPersistenceError::query(poisoned(err)))?;
        let mut matching: Vec<Assignment> = assignments
            .iter()
            .rev()
            .filter(|assignment| assignment.engineer() == engineer)
            .cloned()
            .collect();
        matching.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(matching)
    }

    async fn list_for_complaints(
        &self,
        complaint_ids: &[ComplaintId],
    ) -> Result<Vec<Assignment>, AssignmentPersistenceError> {
        let assignments = self
            .assignments
            .read()
            .map_err(|err| AssignmentPersistenceError::query(poisoned(err)))?;
        let mut matching: Vec<Assignment> = assignments
            .iter()
            .filter(|assignment| complaint_ids.contains(assignment.complaint_id()))
            .cloned()
            .collect();
        matching.sort_by_key(Assignment::created_at);
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AssignmentId;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn assignment(complaint_id: ComplaintId, engineer: &str, minute: u32) -> Assignment {
        Assignment::new(
            AssignmentId::random(),
            complaint_id,
            Username::new(engineer).expect("username"),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, minute, 0)
                .single()
                .expect("timestamp"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_pairs_are_kept() {
        let repo = InMemoryAssignmentRepository::new();
        let complaint_id = ComplaintId::random();
        repo.insert(&assignment(complaint_id, "bob", 1))
            .await
            .expect("insert");
        repo.insert(&assignment(complaint_id, "bob", 2))
            .await
            .expect("insert");

        let bob = Username::new("bob").expect("username");
        let listed = repo.list_for_engineer(&bob).await.expect("list");
        assert_eq!(listed.len(), 2);
        assert!(listed[0].created_at() > listed[1].created_at());
    }

    #[rstest]
    #[tokio::test]
    async fn list_for_complaints_filters_by_id() {
        let repo = InMemoryAssignmentRepository::new();
        let wanted = ComplaintId::random();
        repo.insert(&assignment(wanted, "bob", 2))
            .await
            .expect("insert");
        repo.insert(&assignment(ComplaintId::random(), "carol", 1))
            .await
            .expect("insert");

        let listed = repo.list_for_complaints(&[wanted]).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].engineer().as_ref(), "bob");
    }
}
