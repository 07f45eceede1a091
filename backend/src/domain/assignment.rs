//! Complaint-to-engineer assignments and the views built from them.
//!
//! A complaint is `Submitted` until the first assignment references it and
//! `Assigned` from then on. Assignments are append-only; assigning the same
//! pair twice records two assignments.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::complaint::{Complaint, ComplaintId};
use super::user::{DisplayName, Username};
use super::validation::FieldErrors;

/// Form field carrying the complaint identifier.
pub const COMPLAINT_FIELD: &str = "complaintID";
/// Form field carrying the engineer username.
pub const ENGINEER_FIELD: &str = "engineerName";

/// Identifier of a stored assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId(Uuid);

impl AssignmentId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for AssignmentId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Link between a complaint and the engineer expected to handle it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    id: AssignmentId,
    complaint_id: ComplaintId,
    engineer: Username,
    created_at: DateTime<Utc>,
}

impl Assignment {
    pub fn new(
        id: AssignmentId,
        complaint_id: ComplaintId,
        engineer: Username,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            complaint_id,
            engineer,
            created_at,
        }
    }

    pub fn id(&self) -> &AssignmentId {
        &self.id
    }

    pub fn complaint_id(&self) -> &ComplaintId {
        &self.complaint_id
    }

    pub fn engineer(&self) -> &Username {
        &self.engineer
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Admin request to assign a complaint, with both fields present.
///
/// Whether the complaint and engineer exist is checked by the assignment
/// service, which needs the stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRequest {
    complaint_id: String,
    engineer_name: String,
}

impl AssignmentRequest {
    /// Require both form fields, reporting every blank one.
    ///
    /// # Examples
    /// ```
    /// use complaints::domain::AssignmentRequest;
    ///
    /// let errors = AssignmentRequest::try_from_parts("", " ").unwrap_err();
    /// assert_eq!(errors.len(), 2);
    /// ```
    pub fn try_from_parts(complaint_id: &str, engineer_name: &str) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let complaint_id = complaint_id.trim();
        let engineer_name = engineer_name.trim();
        if complaint_id.is_empty() {
            errors.push(COMPLAINT_FIELD, "Complaint ID required");
        }
        if engineer_name.is_empty() {
            errors.push(ENGINEER_FIELD, "Engineer required");
        }
        errors.into_result(Self {
            complaint_id: complaint_id.to_owned(),
            engineer_name: engineer_name.to_owned(),
        })
    }

    /// Complaint identifier as submitted, trimmed.
    pub fn complaint_id(&self) -> &str {
        self.complaint_id.as_str()
    }

    /// Engineer username as submitted, trimmed.
    pub fn engineer_name(&self) -> &str {
        self.engineer_name.as_str()
    }
}

/// Progress of a complaint through the assignment workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplaintStatus {
    Submitted,
    Assigned { engineers: Vec<Username> },
}

impl ComplaintStatus {
    /// Derive the status from the assignments referencing one complaint.
    pub fn from_assignments<'a>(assignments: impl IntoIterator<Item = &'a Assignment>) -> Self {
        let mut engineers: Vec<Username> = Vec::new();
        for assignment in assignments {
            if !engineers.contains(assignment.engineer()) {
                engineers.push(assignment.engineer().clone());
            }
        }
        if engineers.is_empty() {
            Self::Submitted
        } else {
            Self::Assigned { engineers }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Assigned { .. } => "Assigned",
        }
    }
}

/// An engineer's assignment joined to its complaint.
///
/// `complaint` is `None` when the referenced complaint no longer resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedComplaint {
    pub assignment: Assignment,
    pub complaint: Option<Complaint>,
}

/// One row of the admin board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardEntry {
    pub complaint: Complaint,
    pub status: ComplaintStatus,
}

/// Engineer option offered by the assignment form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineerSummary {
    pub username: Username,
    pub display_name: DisplayName,
}

/// Everything the admin dashboard shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentBoard {
    /// Complaints, newest first.
    pub entries: Vec<BoardEntry>,
    pub engineers: Vec<EngineerSummary>,
}
