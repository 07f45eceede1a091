//! Form payloads accepted by the HTML endpoints.
//!
//! Every field defaults to empty so a missing input reaches domain
//! validation and is reported next to the field, rather than failing
//! deserialisation with a bare 400.

use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::{ComplaintSubmission, RegistrationRequest};

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: Zeroizing<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: Zeroizing<String>,
    pub password2: Zeroizing<String>,
    pub role: String,
}

impl From<RegisterForm> for RegistrationRequest {
    fn from(form: RegisterForm) -> Self {
        Self {
            name: form.name,
            email: form.email,
            username: form.username,
            password: form.password,
            password2: form.password2,
            role: form.role,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ComplaintForm {
    pub contact: String,
    pub desc: String,
}

impl From<ComplaintForm> for ComplaintSubmission {
    fn from(form: ComplaintForm) -> Self {
        Self {
            contact: form.contact,
            description: form.desc,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AssignForm {
    #[serde(rename = "complaintID")]
    pub complaint_id: String,
    #[serde(rename = "engineerName")]
    pub engineer_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn assign_form_uses_wire_names() {
        let form: AssignForm =
            serde_urlencoded::from_str("complaintID=abc&engineerName=bob").expect("decode");
        assert_eq!(form.complaint_id, "abc");
        assert_eq!(form.engineer_name, "bob");
    }

    #[rstest]
    fn missing_fields_default_to_empty() {
        let form: RegisterForm = serde_urlencoded::from_str("name=Alice").expect("decode");
        assert_eq!(form.name, "Alice");
        assert!(form.password.is_empty());
        assert!(form.role.is_empty());
    }

    #[rstest]
    fn complaint_form_maps_desc_to_description() {
        let form: ComplaintForm =
            serde_urlencoded::from_str("contact=555-0100&desc=broken+sink").expect("decode");
        let submission = ComplaintSubmission::from(form);
        assert_eq!(submission.description, "broken sink");
    }
}
