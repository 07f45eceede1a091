//! Stored-record builders shared by the Diesel adapter suites.
//!
//! Timestamps are whole seconds so they survive PostgreSQL's microsecond
//! precision unchanged.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use complaints::domain::{
    Assignment, AssignmentId, Complaint, ComplaintId, DisplayName, EmailAddress, Role, SecretHash,
    User, UserId, Username,
};

/// 09:00 on a fixed day, plus `minute` minutes.
pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, minute, 0)
        .single()
        .expect("valid timestamp")
}

pub fn username(name: &str) -> Username {
    Username::new(name).expect("valid username")
}

pub fn user(name: &str, email: &str, role: Role) -> User {
    User::new(
        UserId::random(),
        username(name),
        EmailAddress::new(email).expect("valid email"),
        DisplayName::new(name).expect("valid display name"),
        role,
        SecretHash::from_phc("$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA"),
        at(0),
    )
}

pub fn complaint(submitter: &User, description: &str, minute: u32) -> Complaint {
    Complaint::from_parts(
        ComplaintId::random(),
        *submitter.id(),
        submitter.username().clone(),
        "555-0100".to_owned(),
        description.to_owned(),
        at(minute),
    )
}

pub fn assignment(complaint: &Complaint, engineer: &str, minute: u32) -> Assignment {
    Assignment::new(
        AssignmentId::random(),
        *complaint.id(),
        username(engineer),
        at(minute),
    )
}
