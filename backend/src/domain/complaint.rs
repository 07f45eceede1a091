//! Complaint records submitted by authenticated users.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::auth::Identity;
use super::user::{UserId, Username};
use super::validation::FieldErrors;

/// Identifier of a stored complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplaintId(Uuid);

impl ComplaintId {
    /// Parse the textual form submitted by the assignment form.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ComplaintId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Complaint contents as typed into the submission form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintSubmission {
    pub contact: String,
    pub description: String,
}

impl ComplaintSubmission {
    /// Check both fields, attributing the draft to `submitter`.
    ///
    /// The description is reported under `desc`, the form field name.
    pub fn validate(&self, submitter: &Identity) -> Result<ComplaintDraft, FieldErrors> {
        let mut errors = FieldErrors::default();
        let contact = self.contact.trim();
        let description = self.description.trim();
        if contact.is_empty() {
            errors.push("contact", "Contact is required");
        }
        if description.is_empty() {
            errors.push("desc", "Description is required");
        }
        errors.into_result(ComplaintDraft {
            submitted_by: *submitter.user_id(),
            submitter: submitter.username().clone(),
            contact: contact.to_owned(),
            description: description.to_owned(),
        })
    }
}

/// Validated complaint awaiting an identifier and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintDraft {
    submitted_by: UserId,
    submitter: Username,
    contact: String,
    description: String,
}

impl ComplaintDraft {
    /// Stamp the draft into an immutable [`Complaint`].
    pub fn into_complaint(self, id: ComplaintId, created_at: DateTime<Utc>) -> Complaint {
        Complaint {
            id,
            submitted_by: self.submitted_by,
            submitter: self.submitter,
            contact: self.contact,
            description: self.description,
            created_at,
        }
    }
}

/// Stored complaint. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complaint {
    id: ComplaintId,
    submitted_by: UserId,
    submitter: Username,
    contact: String,
    description: String,
    created_at: DateTime<Utc>,
}

impl Complaint {
    /// Rebuild a complaint from stored columns.
    pub fn from_parts(
        id: ComplaintId,
        submitted_by: UserId,
        submitter: Username,
        contact: String,
        description: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            submitted_by,
            submitter,
            contact,
            description,
            created_at,
        }
    }

    pub fn id(&self) -> &ComplaintId {
        &self.id
    }

    pub fn submitted_by(&self) -> &UserId {
        &self.submitted_by
    }

    /// Username of the submitter at the time of submission.
    pub fn submitter(&self) -> &Username {
        &self.submitter
    }

    pub fn contact(&self) -> &str {
        self.contact.as_str()
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use rstest::{fixture, rstest};

    #[fixture]
    fn alice() -> Identity {
        Identity::new(
            UserId::random(),
            Username::new("alice").expect("username"),
            Role::User,
        )
    }

    #[rstest]
    fn trims_and_attributes_submission(alice: Identity) {
        let submission = ComplaintSubmission {
            contact: " 555-0100 ".to_owned(),
            description: "broken sink\n".to_owned(),
        };
        let complaint = submission
            .validate(&alice)
            .expect("valid submission")
            .into_complaint(ComplaintId::random(), Utc::now());

        assert_eq!(complaint.contact(), "555-0100");
        assert_eq!(complaint.description(), "broken sink");
        assert_eq!(complaint.submitter().as_ref(), "alice");
        assert_eq!(complaint.submitted_by(), alice.user_id());
    }

    #[rstest]
    #[case("", "broken sink", &["contact"])]
    #[case("555-0100", "   ", &["desc"])]
    #[case("", "", &["contact", "desc"])]
    fn blank_fields_are_reported(
        alice: Identity,
        #[case] contact: &str,
        #[case] description: &str,
        #[case] expected: &[&str],
    ) {
        let submission = ComplaintSubmission {
            contact: contact.to_owned(),
            description: description.to_owned(),
        };
        let errors = submission.validate(&alice).expect_err("blank fields fail");
        assert_eq!(errors.len(), expected.len());
        for field in expected {
            assert!(errors.mentions(field));
        }
    }

    #[rstest]
    #[case("not-a-uuid", false)]
    #[case(" 67e55044-10b1-426f-9247-bb680e5fe0c8 ", true)]
    fn complaint_id_parsing(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(ComplaintId::parse(raw).is_some(), valid);
    }
}
