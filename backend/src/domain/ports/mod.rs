//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`SessionStore`], [`SecretHasher`]) describe
//! what the domain needs from infrastructure. Driving ports (`*Service`,
//! `*Command`, `*Query`) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod assignment_command;
mod assignment_query;
mod assignment_repository;
mod complaint_command;
mod complaint_repository;
mod login_service;
mod registration_service;
mod secret_hasher;
mod session_store;
mod user_repository;

#[cfg(test)]
pub use assignment_command::MockAssignmentCommand;
pub use assignment_command::AssignmentCommand;
#[cfg(test)]
pub use assignment_query::MockAssignmentQuery;
pub use assignment_query::AssignmentQuery;
#[cfg(test)]
pub use assignment_repository::MockAssignmentRepository;
pub use assignment_repository::{AssignmentPersistenceError, AssignmentRepository};
#[cfg(test)]
pub use complaint_command::MockComplaintCommand;
pub use complaint_command::ComplaintCommand;
#[cfg(test)]
pub use complaint_repository::MockComplaintRepository;
pub use complaint_repository::{ComplaintPersistenceError, ComplaintRepository};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{INVALID_CREDENTIALS_MESSAGE, LoginService};
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::RegistrationService;
#[cfg(test)]
pub use secret_hasher::MockSecretHasher;
pub use secret_hasher::{SecretHashError, SecretHasher};
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::{SESSION_LIFETIME, SessionStore, SessionStoreError, SessionToken};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
