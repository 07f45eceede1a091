//! Wire repositories into the domain services behind [`HttpState`].

use std::sync::Arc;

use mockable::Clock;

use complaints::domain::ports::{
    AssignmentRepository, ComplaintRepository, SessionStore, UserRepository,
};
use complaints::domain::{AccountService, AssignmentService, ComplaintService};
use complaints::inbound::http::state::HttpState;
use complaints::outbound::memory::{
    InMemoryAssignmentRepository, InMemoryComplaintRepository, InMemoryUserRepository,
};
use complaints::outbound::persistence::{
    DbPool, DieselAssignmentRepository, DieselComplaintRepository, DieselUserRepository,
};
use complaints::outbound::security::Argon2SecretHasher;
use complaints::outbound::session::InMemorySessionStore;

fn wire<U, C, A>(
    users: Arc<U>,
    complaints: Arc<C>,
    assignments: Arc<A>,
    hasher: Arc<Argon2SecretHasher>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserRepository + 'static,
    C: ComplaintRepository + 'static,
    A: AssignmentRepository + 'static,
{
    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(clock.clone()));
    HttpState::new(
        Arc::new(AccountService::new(users.clone(), hasher, clock.clone())),
        Arc::new(ComplaintService::new(complaints.clone(), clock.clone())),
        Arc::new(AssignmentService::new(users, complaints, assignments, clock)),
        sessions,
    )
}

/// Diesel repositories when a pool is configured, process memory otherwise.
/// Sessions always live in memory.
pub(crate) fn build_http_state(
    pool: Option<&DbPool>,
    hasher: Arc<Argon2SecretHasher>,
    clock: Arc<dyn Clock>,
) -> HttpState {
    match pool {
        Some(pool) => wire(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselComplaintRepository::new(pool.clone())),
            Arc::new(DieselAssignmentRepository::new(pool.clone())),
            hasher,
            clock,
        ),
        None => wire(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryComplaintRepository::new()),
            Arc::new(InMemoryAssignmentRepository::new()),
            hasher,
            clock,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use complaints::domain::{ErrorCode, LoginCredentials, RegistrationRequest};
    use mockable::DefaultClock;
    use zeroize::Zeroizing;

    #[tokio::test]
    async fn memory_state_registers_and_authenticates() {
        let hasher = Arc::new(Argon2SecretHasher::with_params(8, 1, 1).expect("params"));
        let state = build_http_state(None, hasher, Arc::new(DefaultClock));

        let request = RegistrationRequest {
            name: "Alice Example".to_owned(),
            email: "alice@example.com".to_owned(),
            username: "alice".to_owned(),
            password: Zeroizing::new("hunter22".to_owned()),
            password2: Zeroizing::new("hunter22".to_owned()),
            role: "user".to_owned(),
        };
        state.registration.register(&request).await.expect("register");

        let good = LoginCredentials::try_from_parts("alice", "hunter22").expect("credentials");
        assert!(state.login.authenticate(&good).await.is_ok());
        let bad = LoginCredentials::try_from_parts("alice", "nope!!").expect("credentials");
        let err = state.login.authenticate(&bad).await.expect_err("wrong password");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
