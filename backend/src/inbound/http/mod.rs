//! HTTP inbound adapter: HTML pages, form posts, and session plumbing.
//!
//! ```text
//! GET  /login  POST /login  GET /register  POST /register  POST /logout
//! GET  /       GET  /complaint            POST /registerComplaint
//! GET  /admin  POST /assign               GET  /jeng
//! ```

pub mod admin;
pub mod auth;
pub mod complaints;
pub mod engineer;
pub mod error;
pub mod forms;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;
pub mod views;

use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, web};
use tracing::debug;

use crate::domain::Error;

/// Largest form body accepted.
pub const FORM_LIMIT_BYTES: usize = 10 * 1024;

/// Post/redirect/get: send the browser to `path` with a `303 See Other`.
pub(crate) fn redirect(path: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, path.to_owned()))
        .finish()
}

/// Register every page and form handler plus the form body limits.
///
/// The caller supplies `web::Data<HttpState>` and the session middleware.
///
/// # Examples
/// ```no_run
/// use actix_web::{App, web};
/// use complaints::inbound::http::{configure, state::HttpState};
///
/// fn app(state: HttpState) {
///     let _app = App::new()
///         .app_data(web::Data::new(state))
///         .configure(configure);
/// }
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::FormConfig::default()
            .limit(FORM_LIMIT_BYTES)
            .error_handler(|err, _req| {
                debug!(error = %err, "rejected form body");
                Error::invalid_request("Malformed form submission").into()
            }),
    )
    .service(users::login_form)
    .service(users::login)
    .service(users::register_form)
    .service(users::register)
    .service(users::logout)
    .service(complaints::dashboard)
    .service(complaints::complaint_form)
    .service(complaints::register_complaint)
    .service(admin::admin_board)
    .service(admin::assign)
    .service(engineer::engineer_worklist);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;

    use crate::domain::Role;
    use crate::inbound::http::test_utils::{CookieJar, body_text, login, send, test_app};
    use crate::test_support::InMemoryStack;

    #[rstest]
    fn redirect_is_see_other() {
        let res = redirect("/admin");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
            Some("/admin")
        );
    }

    #[actix_web::test]
    async fn oversized_forms_are_rejected() {
        let stack = InMemoryStack::new();
        stack.register("alice", Role::User, "hunter22").await;
        let app = test_app!(stack.state()).await;
        let mut jar = CookieJar::new();
        login!(app, jar, "alice", "hunter22");

        let desc = "x".repeat(FORM_LIMIT_BYTES + 1);
        let res = send!(
            app,
            jar,
            actix_test::TestRequest::post()
                .uri("/registerComplaint")
                .set_form([("contact", "555-0100"), ("desc", desc.as_str())])
        );
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(res).await.contains("Malformed form submission"));
        assert!(stack.complaints.is_empty());
    }
}
