//! Test utilities for the complaints crate.
//!
//! Shared by unit tests (in `src/`) and the integration suites under
//! `tests/`, which enable the `test-support` feature to reach them.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::test::{self, TestRequest};
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use zeroize::Zeroizing;

use crate::domain::ports::RegistrationService;
use crate::domain::{
    AccountService, AssignmentService, ComplaintService, RegistrationRequest, Role, User,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{
    InMemoryAssignmentRepository, InMemoryComplaintRepository, InMemoryUserRepository,
};
use crate::outbound::security::Argon2SecretHasher;
use crate::outbound::session::InMemorySessionStore;

/// Clock that only moves when a test tells it to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
            }
        };
        *self.lock_clock() += delta;
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Cookie session middleware for local HTTP tests: fresh key, cookie named
/// `session`, `Secure` disabled.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Name of the session cookie set by [`test_session_middleware`].
pub const SESSION_COOKIE: &str = "session";

/// Remembers the latest session cookie across test requests, the way a
/// browser would.
#[derive(Debug, Default, Clone)]
pub struct CookieJar {
    session: Option<Cookie<'static>>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the remembered cookie, if any.
    pub fn with_cookie(&self, request: TestRequest) -> TestRequest {
        match &self.session {
            Some(cookie) => request.cookie(cookie.clone()),
            None => request,
        }
    }

    /// Keep the session cookie a response sets.
    pub fn absorb<B>(&mut self, response: &ServiceResponse<B>) {
        if let Some(cookie) = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE)
        {
            self.session = Some(cookie.into_owned());
        }
    }

    /// The remembered cookie, for replaying it after the jar moves on.
    pub fn session(&self) -> Option<Cookie<'static>> {
        self.session.clone()
    }
}

/// `Location` header of a redirect.
pub fn location<B>(response: &ServiceResponse<B>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Response body decoded as UTF-8.
pub async fn body_text<B: MessageBody>(response: ServiceResponse<B>) -> String {
    let bytes = test::read_body(response).await;
    match String::from_utf8(bytes.to_vec()) {
        Ok(text) => text,
        Err(error) => panic!("response body is not UTF-8: {error}"),
    }
}

/// Argon2id with the smallest parameters the crate accepts.
pub fn fast_hasher() -> Argon2SecretHasher {
    match Argon2SecretHasher::with_params(8, 1, 1) {
        Ok(hasher) => hasher,
        Err(error) => panic!("test hasher params rejected: {error}"),
    }
}

type Accounts = AccountService<InMemoryUserRepository, Argon2SecretHasher>;

/// Every in-memory adapter wired into an [`HttpState`].
///
/// The repositories stay reachable so tests can seed or inspect them
/// directly.
pub struct InMemoryStack {
    pub clock: Arc<MutableClock>,
    pub users: Arc<InMemoryUserRepository>,
    pub complaints: Arc<InMemoryComplaintRepository>,
    pub assignments: Arc<InMemoryAssignmentRepository>,
    pub sessions: Arc<InMemorySessionStore>,
    accounts: Arc<Accounts>,
    state: HttpState,
}

impl InMemoryStack {
    pub fn new() -> Self {
        let clock = Arc::new(MutableClock::new(Utc::now()));
        let users = Arc::new(InMemoryUserRepository::new());
        let complaints = Arc::new(InMemoryComplaintRepository::new());
        let assignments = Arc::new(InMemoryAssignmentRepository::new());
        let sessions = Arc::new(InMemorySessionStore::new(clock.clone()));

        let accounts = Arc::new(AccountService::new(
            users.clone(),
            Arc::new(fast_hasher()),
            clock.clone(),
        ));
        let complaint_service = Arc::new(ComplaintService::new(complaints.clone(), clock.clone()));
        let assignment_service = Arc::new(AssignmentService::new(
            users.clone(),
            complaints.clone(),
            assignments.clone(),
            clock.clone(),
        ));
        let state = HttpState::new(
            accounts.clone(),
            complaint_service,
            assignment_service,
            sessions.clone(),
        );

        Self {
            clock,
            users,
            complaints,
            assignments,
            sessions,
            accounts,
            state,
        }
    }

    pub fn state(&self) -> HttpState {
        self.state.clone()
    }

    /// Register a user through the real registration path.
    pub async fn register(&self, username: &str, role: Role, password: &str) -> User {
        let request = RegistrationRequest {
            name: format!("{username} example"),
            email: format!("{username}@example.com"),
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
            password2: Zeroizing::new(password.to_owned()),
            role: role.as_str().to_owned(),
        };
        match self.accounts.register(&request).await {
            Ok(user) => user,
            Err(error) => panic!("seeding {username} failed: {error}"),
        }
    }
}

impl Default for InMemoryStack {
    fn default() -> Self {
        Self::new()
    }
}
