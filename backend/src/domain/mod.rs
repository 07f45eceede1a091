//! Domain primitives, ports, and services.
//!
//! Purpose: define the complaint desk's records (users, complaints,
//! assignments), the ports adapters implement, and the services inbound
//! adapters drive. Nothing here knows about HTTP or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: transport agnostic failures.
//! - User, Complaint, Assignment: the three persisted records.
//! - Identity: who a session belongs to.
//! - AccountService, ComplaintService, AssignmentService: driving port
//!   implementations.

pub mod account_service;
pub mod assignment;
pub mod assignment_service;
pub mod auth;
pub mod complaint;
pub mod complaint_service;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod validation;

pub use self::account_service::AccountService;
pub use self::assignment::{
    AssignedComplaint, Assignment, AssignmentBoard, AssignmentId, AssignmentRequest, BoardEntry,
    COMPLAINT_FIELD, ComplaintStatus, ENGINEER_FIELD, EngineerSummary,
};
pub use self::assignment_service::AssignmentService;
pub use self::auth::{
    Availability, Identity, LoginCredentials, LoginValidationError, MIN_PASSWORD_LEN,
    NOT_AUTHORISED_MESSAGE, RegistrationRequest,
};
pub use self::complaint::{Complaint, ComplaintDraft, ComplaintId, ComplaintSubmission};
pub use self::complaint_service::ComplaintService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DisplayName, EmailAddress, PlainSecret, Role, Secret, SecretHash, User, UserDraft, UserId,
    UserValidationError, Username,
};
pub use self::validation::{FieldError, FieldErrors};

/// Convenient handler result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use complaints::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("Please login to access this page"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
