//! In-memory [`ComplaintRepository`].

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{ComplaintPersistenceError, ComplaintRepository};
use crate::domain::{Complaint, ComplaintId};

use super::poisoned;

#[derive(Debug, Clone, Default)]
pub struct InMemoryComplaintRepository {
    complaints: Arc<RwLock<Vec<Complaint>>>,
}

impl InMemoryComplaintRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored complaints.
    pub fn len(&self) -> usize {
        self.complaints.read().map(|held| held.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ComplaintRepository for InMemoryComplaintRepository {
    async fn insert(&self, complaint: &Complaint) -> Result<(), ComplaintPersistenceError> {
        self.complaints
            .write()
            .map_err(|err| ComplaintPersistenceError::query(poisoned(err)))?
            .push(complaint.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ComplaintId,
    ) -> Result<Option<Complaint>, ComplaintPersistenceError> {
        let complaints = self
            .complaints
            .read()
            .map_err(|err| ComplaintPersistenceError::query(poisoned(err)))?;
        Ok(complaints
            .iter()
            .find(|complaint| complaint.id() == id)
            .cloned())
    }

    async fn list_recent(&self) -> Result<Vec<Complaint>, ComplaintPersistenceError> {
        let complaints = self
            .complaints
            .read()
            .map_err(|err| ComplaintPersistenceError::query(poisoned(err)))?;
        // Later inserts win ties on the timestamp.
        let mut recent: Vec<Complaint> = complaints.iter().rev().cloned().collect();
        recent.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(recent)
    }
}
