//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AssignmentCommand, AssignmentQuery, ComplaintCommand, LoginService, RegistrationService,
    SessionStore,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub complaints: Arc<dyn ComplaintCommand>,
    pub assignments: Arc<dyn AssignmentCommand>,
    pub assignments_query: Arc<dyn AssignmentQuery>,
    pub sessions: Arc<dyn SessionStore>,
}

impl HttpState {
    /// Fan services that implement several ports out into their trait
    /// objects.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use complaints::domain::{AccountService, AssignmentService, ComplaintService};
    /// use complaints::inbound::http::state::HttpState;
    /// use complaints::outbound::memory::{
    ///     InMemoryAssignmentRepository, InMemoryComplaintRepository, InMemoryUserRepository,
    /// };
    /// use complaints::outbound::security::Argon2SecretHasher;
    /// use complaints::outbound::session::InMemorySessionStore;
    /// use mockable::DefaultClock;
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let users = Arc::new(InMemoryUserRepository::new());
    /// let complaints = Arc::new(InMemoryComplaintRepository::new());
    /// let hasher = Arc::new(Argon2SecretHasher::with_params(8, 1, 1).expect("params"));
    /// let state = HttpState::new(
    ///     Arc::new(AccountService::new(users.clone(), hasher, clock.clone())),
    ///     Arc::new(ComplaintService::new(complaints.clone(), clock.clone())),
    ///     Arc::new(AssignmentService::new(
    ///         users,
    ///         complaints,
    ///         Arc::new(InMemoryAssignmentRepository::new()),
    ///         clock.clone(),
    ///     )),
    ///     Arc::new(InMemorySessionStore::new(clock)),
    /// );
    /// # let _ = state;
    /// ```
    pub fn new<A, C, G>(
        accounts: Arc<A>,
        complaints: Arc<C>,
        assignments: Arc<G>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self
    where
        A: LoginService + RegistrationService + 'static,
        C: ComplaintCommand + 'static,
        G: AssignmentCommand + AssignmentQuery + 'static,
    {
        Self {
            login: accounts.clone(),
            registration: accounts,
            complaints,
            assignments: assignments.clone(),
            assignments_query: assignments,
            sessions,
        }
    }
}
