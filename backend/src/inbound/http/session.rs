//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie carries two things: the opaque token minted by the
//! [`SessionStore`](crate::domain::ports::SessionStore) and a queue of
//! one-shot flash messages. Identities never travel in the cookie.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::Error;
use crate::domain::ports::SessionToken;

pub(crate) const TOKEN_KEY: &str = "session_token";
pub(crate) const FLASH_KEY: &str = "flash";

/// Visual weight of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Message shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

fn session_error(action: &str, error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to {action} session: {error}"))
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Rotate the cookie and remember `token`.
    pub fn start(&self, token: &SessionToken) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(TOKEN_KEY, token.as_str())
            .map_err(|error| session_error("persist", error))
    }

    /// Token presented by the client, if it is well formed.
    pub fn token(&self) -> Result<Option<SessionToken>, Error> {
        let raw = self
            .0
            .get::<String>(TOKEN_KEY)
            .map_err(|error| session_error("read", error))?;
        Ok(raw.and_then(|raw| {
            let token = SessionToken::parse(&raw);
            if token.is_none() {
                warn!("malformed session token in cookie");
            }
            token
        }))
    }

    /// Forget a token the store no longer recognises.
    pub fn forget_token(&self) {
        self.0.remove(TOKEN_KEY);
    }

    /// Drop everything held in the cookie and rotate it.
    ///
    /// Flash messages pushed afterwards survive, unlike after
    /// [`Session::purge`].
    pub fn end(&self) {
        self.0.clear();
        self.0.renew();
    }

    /// Queue a flash message for the next page.
    pub fn push_flash(&self, flash: Flash) -> Result<(), Error> {
        let mut queued = self.peek_flashes()?;
        queued.push(flash);
        self.0
            .insert(FLASH_KEY, queued)
            .map_err(|error| session_error("persist", error))
    }

    /// Queue a flash message, logging instead of failing when the cookie
    /// cannot be written.
    pub fn flash_or_log(&self, flash: Flash) {
        if let Err(error) = self.push_flash(flash) {
            warn!(%error, "dropping flash message");
        }
    }

    /// Remove and return every queued flash message.
    pub fn take_flashes(&self) -> Vec<Flash> {
        match self.0.remove_as::<Vec<Flash>>(FLASH_KEY) {
            Some(Ok(flashes)) => flashes,
            Some(Err(raw)) => {
                warn!(len = raw.len(), "discarding unreadable flash payload");
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    fn peek_flashes(&self) -> Result<Vec<Flash>, Error> {
        Ok(self
            .0
            .get::<Vec<Flash>>(FLASH_KEY)
            .map_err(|error| session_error("read", error))?
            .unwrap_or_default())
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    use crate::test_support::test_session_middleware;

    fn token() -> SessionToken {
        SessionToken::from_bytes(&[7_u8; 32])
    }

    #[actix_web::test]
    async fn round_trips_token() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        session.start(&token())?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let stored = session.token()?;
                        let body = stored.map(|t| t.as_str().to_owned()).unwrap_or_default();
                        Ok::<_, Error>(HttpResponse::Ok().body(body))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body = test::read_body(get_res).await;
        assert_eq!(body.as_ref(), token().as_str().as_bytes());
    }

    #[actix_web::test]
    async fn flashes_are_read_once() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/push",
                    web::get().to(|session: SessionContext| async move {
                        session.push_flash(Flash::success("first"))?;
                        session.push_flash(Flash::error("second"))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/take",
                    web::get().to(|session: SessionContext| async move {
                        let messages: Vec<String> = session
                            .take_flashes()
                            .into_iter()
                            .map(|flash| format!("{}:{}", flash.level.as_str(), flash.message))
                            .collect();
                        HttpResponse::Ok().body(messages.join(","))
                    }),
                ),
        )
        .await;

        let push_res =
            test::call_service(&app, test::TestRequest::get().uri("/push").to_request()).await;
        let cookie = push_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let take_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/take")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body = test::read_body(take_res).await;
        assert_eq!(body.as_ref(), b"success:first,error:second");
    }

    #[actix_web::test]
    async fn malformed_token_reads_as_absent() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set",
                    web::get().to(|session: actix_session::Session| async move {
                        session
                            .insert(TOKEN_KEY, "not-a-token")
                            .map_err(actix_web::error::ErrorInternalServerError)?;
                        Ok::<_, actix_web::Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let present = session.token()?.is_some();
                        Ok::<_, Error>(HttpResponse::Ok().body(present.to_string()))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();
        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body = test::read_body(get_res).await;
        assert_eq!(body.as_ref(), b"false");
    }
}
