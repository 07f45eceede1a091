//! Account handlers: login, registration, logout.
//!
//! ```text
//! GET  /login      login form
//! POST /login      username, password -> redirect by role
//! GET  /register   registration form
//! POST /register   name, email, username, password, password2, role
//! POST /logout     end the session
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};
use tracing::{error, info, warn};

use super::auth::{CurrentUser, map_session_error};
use super::forms::{LoginForm, RegisterForm};
use super::redirect;
use super::session::{Flash, SessionContext};
use super::state::HttpState;
use super::views::{LoginView, RegisterView, html_response, login_page, register_page};
use crate::domain::{ApiResult, ErrorCode, FieldErrors, LoginCredentials, RegistrationRequest};

/// Flash for a login form submitted with a blank field.
pub const MISSING_CREDENTIALS_MESSAGE: &str = "Missing credentials";
pub const REGISTRATION_SUCCESS_MESSAGE: &str = "Registration successful! Please login";
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed";
pub const LOGOUT_MESSAGE: &str = "Logged out successfully";

#[get("/login")]
pub async fn login_form(session: SessionContext) -> HttpResponse {
    let flashes = session.take_flashes();
    html_response(
        StatusCode::OK,
        login_page(&LoginView {
            flashes: &flashes,
            username: "",
        }),
    )
}

/// Authenticate, bind a fresh session, and send the user to their role's
/// landing page. Unknown users and wrong passwords are indistinguishable.
/// Any session the cookie already carried is invalidated first.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    let Ok(credentials) = LoginCredentials::try_from_parts(&form.username, &form.password) else {
        session.push_flash(Flash::error(MISSING_CREDENTIALS_MESSAGE))?;
        return Ok(redirect("/login"));
    };

    let identity = match state.login.authenticate(&credentials).await {
        Ok(identity) => identity,
        Err(err) if err.code() == ErrorCode::Unauthorized => {
            info!(username = %credentials.username(), "login rejected");
            session.push_flash(Flash::error(err.message()))?;
            return Ok(redirect("/login"));
        }
        Err(err) => return Err(err),
    };

    if let Some(previous) = session.token()? {
        state
            .sessions
            .invalidate(&previous)
            .await
            .map_err(map_session_error)?;
    }
    let token = state
        .sessions
        .bind(&identity)
        .await
        .map_err(map_session_error)?;
    session.start(&token)?;
    info!(username = %identity.username(), role = %identity.role(), "login succeeded");
    Ok(redirect(identity.role().home_path()))
}

#[get("/register")]
pub async fn register_form(session: SessionContext) -> HttpResponse {
    let flashes = session.take_flashes();
    html_response(
        StatusCode::OK,
        register_page(&RegisterView {
            flashes: &flashes,
            errors: &FieldErrors::default(),
            name: "",
            email: "",
            username: "",
            role: "",
        }),
    )
}

/// Create an account. Validation failures re-render the form with every
/// violation; store failures flash and send the user back to the form.
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<RegisterForm>,
) -> ApiResult<HttpResponse> {
    let request = RegistrationRequest::from(form.into_inner());
    match state.registration.register(&request).await {
        Ok(user) => {
            info!(username = %user.username(), role = %user.role(), "user registered");
            session.push_flash(Flash::success(REGISTRATION_SUCCESS_MESSAGE))?;
            Ok(redirect("/login"))
        }
        Err(err) if err.code() == ErrorCode::InvalidRequest => {
            let errors = err.field_errors();
            let flashes = session.take_flashes();
            Ok(html_response(
                StatusCode::BAD_REQUEST,
                register_page(&RegisterView {
                    flashes: &flashes,
                    errors: &errors,
                    name: &request.name,
                    email: &request.email,
                    username: &request.username,
                    role: &request.role,
                }),
            ))
        }
        Err(err) => {
            if err.code() == ErrorCode::Conflict {
                warn!(username = %request.username.trim(), "registration lost a uniqueness race");
            } else {
                error!(code = ?err.code(), error = %err, "registration failed");
            }
            session.push_flash(Flash::error(REGISTRATION_FAILED_MESSAGE))?;
            Ok(redirect("/register"))
        }
    }
}

/// Invalidate the server-side session, then clear the cookie.
#[post("/logout")]
pub async fn logout(
    user: CurrentUser,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    if let Some(token) = session.token()? {
        state
            .sessions
            .invalidate(&token)
            .await
            .map_err(map_session_error)?;
    }
    session.end();
    session.push_flash(Flash::success(LOGOUT_MESSAGE))?;
    info!(username = %user.identity().username(), "logged out");
    Ok(redirect("/login"))
}
