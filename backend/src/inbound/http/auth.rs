//! Extractors that restore the caller's identity and gate routes by role.
//!
//! Handlers declare what they need in their signature: [`CurrentUser`] for
//! any signed-in user, [`AdminUser`] or [`EngineerUser`] for role-specific
//! pages. Rejections queue a flash message and surface as
//! [`ErrorCode::Unauthorized`](crate::domain::ErrorCode::Unauthorized),
//! which the error mapping turns into a redirect to the login form.

use std::marker::PhantomData;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

use super::session::{Flash, SessionContext};
use super::state::HttpState;
use crate::domain::ports::SessionStoreError;
use crate::domain::{Error, Identity, Role};

/// Flash shown when a protected page is requested without a session.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please login to access this page";

pub(crate) fn map_session_error(error: SessionStoreError) -> Error {
    match error {
        SessionStoreError::Storage { message } => {
            Error::service_unavailable(format!("session store unavailable: {message}"))
        }
        SessionStoreError::TokenGeneration { message } => {
            Error::internal(format!("session token generation failed: {message}"))
        }
    }
}

fn deny(session: &SessionContext, message: &str) -> Error {
    session.flash_or_log(Flash::error(message));
    Error::unauthorized(message)
}

async fn restore_identity(
    state: Option<web::Data<HttpState>>,
    session: SessionContext,
) -> Result<(Identity, SessionContext), Error> {
    let state = state.ok_or_else(|| Error::internal("HTTP state is not registered"))?;
    let Some(token) = session.token()? else {
        return Err(deny(&session, LOGIN_REQUIRED_MESSAGE));
    };
    match state.sessions.restore(&token).await {
        Ok(Some(identity)) => Ok((identity, session)),
        Ok(None) => {
            debug!("session token expired or invalidated");
            session.forget_token();
            Err(deny(&session, LOGIN_REQUIRED_MESSAGE))
        }
        Err(error) => Err(map_session_error(error)),
    }
}

fn restore_from_request(
    req: &HttpRequest,
    payload: &mut Payload,
) -> LocalBoxFuture<'static, Result<(Identity, SessionContext), Error>> {
    let state = req.app_data::<web::Data<HttpState>>().cloned();
    let session = SessionContext::from_request(req, payload);
    Box::pin(async move {
        let session = session.await.map_err(Error::from)?;
        restore_identity(state, session).await
    })
}

/// Identity of the signed-in caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(Identity);

impl CurrentUser {
    pub fn identity(&self) -> &Identity {
        &self.0
    }

    pub fn into_inner(self) -> Identity {
        self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let restored = restore_from_request(req, payload);
        Box::pin(async move { restored.await.map(|(identity, _)| Self(identity)) })
    }
}

/// Role a [`Gated`] extractor insists on.
pub trait RoleGate: 'static {
    const ROLE: Role;
}

/// Gate for `/admin` and `/assign`.
#[derive(Debug)]
pub enum AdminOnly {}

impl RoleGate for AdminOnly {
    const ROLE: Role = Role::Admin;
}

/// Gate for `/jeng`.
#[derive(Debug)]
pub enum EngineerOnly {}

impl RoleGate for EngineerOnly {
    const ROLE: Role = Role::Engineer;
}

/// Identity of a signed-in caller holding `G::ROLE`. Any other role fails
/// closed.
#[derive(Debug)]
pub struct Gated<G> {
    identity: Identity,
    _gate: PhantomData<G>,
}

pub type AdminUser = Gated<AdminOnly>;
pub type EngineerUser = Gated<EngineerOnly>;

impl<G> Gated<G> {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}

impl<G: RoleGate> FromRequest for Gated<G> {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let restored = restore_from_request(req, payload);
        Box::pin(async move {
            let (identity, session) = restored.await?;
            if let Err(error) = identity.require_role(G::ROLE) {
                warn!(
                    user = %identity.username(),
                    role = %identity.role(),
                    required = %G::ROLE,
                    "role gate rejected request"
                );
                session.flash_or_log(Flash::error(error.message()));
                return Err(error);
            }
            Ok(Self {
                identity,
                _gate: PhantomData,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::dev::ServiceResponse;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, HttpResponse, test};
    use rstest::rstest;

    use crate::domain::{NOT_AUTHORISED_MESSAGE, UserId, Username};
    use crate::test_support::{InMemoryStack, test_session_middleware};

    fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .map(Cookie::into_owned)
    }

    async fn sign_in(
        path: web::Path<String>,
        state: web::Data<HttpState>,
        session: SessionContext,
    ) -> Result<HttpResponse, Error> {
        let role: Role = path
            .parse()
            .map_err(|_| Error::invalid_request("unknown role"))?;
        let identity = Identity::new(
            UserId::random(),
            Username::new(format!("test-{}", role.as_str())).map_err(|_| Error::internal("name"))?,
            role,
        );
        let token = state.sessions.bind(&identity).await.map_err(map_session_error)?;
        session.start(&token)?;
        Ok(HttpResponse::Ok().finish())
    }

    async fn sign_out(
        state: web::Data<HttpState>,
        session: SessionContext,
    ) -> Result<HttpResponse, Error> {
        if let Some(token) = session.token()? {
            state.sessions.invalidate(&token).await.map_err(map_session_error)?;
        }
        Ok(HttpResponse::Ok().finish())
    }

    async fn flashes(session: SessionContext) -> HttpResponse {
        let messages: Vec<String> = session
            .take_flashes()
            .into_iter()
            .map(|flash| flash.message)
            .collect();
        HttpResponse::Ok().body(messages.join("|"))
    }

    macro_rules! gate_app {
        ($stack:expr) => {
            test::init_service(
                App::new()
                    .wrap(test_session_middleware())
                    .app_data(web::Data::new($stack.state()))
                    .route("/as/{role}", web::get().to(sign_in))
                    .route("/out", web::get().to(sign_out))
                    .route("/flashes", web::get().to(flashes))
                    .route(
                        "/me",
                        web::get().to(|user: CurrentUser| async move {
                            HttpResponse::Ok().body(user.identity().username().to_string())
                        }),
                    )
                    .route(
                        "/admin",
                        web::get().to(|user: AdminUser| async move {
                            HttpResponse::Ok().body(user.identity().role().to_string())
                        }),
                    )
                    .route(
                        "/jeng",
                        web::get().to(|user: EngineerUser| async move {
                            HttpResponse::Ok().body(user.identity().role().to_string())
                        }),
                    ),
            )
            .await
        };
    }

    fn location<B>(res: &ServiceResponse<B>) -> Option<&str> {
        res.headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    #[actix_web::test]
    async fn anonymous_request_redirects_with_flash() {
        let stack = InMemoryStack::new();
        let app = gate_app!(stack);

        let res = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), Some("/login"));
        let cookie = session_cookie(&res).expect("flash stored in cookie");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/flashes")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body = test::read_body(res).await;
        assert_eq!(body.as_ref(), LOGIN_REQUIRED_MESSAGE.as_bytes());
    }

    #[actix_web::test]
    async fn bound_session_restores_identity() {
        let stack = InMemoryStack::new();
        let app = gate_app!(stack);

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/as/user").to_request()).await;
        let cookie = session_cookie(&res).expect("session cookie");

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/me").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body.as_ref(), b"test-user");
    }

    #[rstest]
    #[case("user", "/admin")]
    #[case("engineer", "/admin")]
    #[case("user", "/jeng")]
    #[case("admin", "/jeng")]
    #[actix_web::test]
    async fn wrong_role_fails_closed(#[case] role: &str, #[case] path: &str) {
        let stack = InMemoryStack::new();
        let app = gate_app!(stack);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/as/{role}"))
                .to_request(),
        )
        .await;
        let cookie = session_cookie(&res).expect("session cookie");

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri(path).cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), Some("/login"));
        let cookie = session_cookie(&res).expect("flash stored in cookie");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/flashes")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body = test::read_body(res).await;
        assert_eq!(body.as_ref(), NOT_AUTHORISED_MESSAGE.as_bytes());
    }

    #[rstest]
    #[case("admin", "/admin")]
    #[case("engineer", "/jeng")]
    #[actix_web::test]
    async fn matching_role_passes(#[case] role: &str, #[case] path: &str) {
        let stack = InMemoryStack::new();
        let app = gate_app!(stack);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/as/{role}"))
                .to_request(),
        )
        .await;
        let cookie = session_cookie(&res).expect("session cookie");
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri(path).cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body.as_ref(), role.as_bytes());
    }

    #[actix_web::test]
    async fn invalidated_token_is_rejected() {
        let stack = InMemoryStack::new();
        let app = gate_app!(stack);

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/as/user").to_request()).await;
        let cookie = session_cookie(&res).expect("session cookie");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/out")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        // The old cookie still carries the token; the store no longer knows it.
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/me").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert!(stack.sessions.is_empty());
    }
}
