//! Test helpers for inbound HTTP components.
//!
//! The macros drive a fully configured app the way a browser would: each
//! request carries the session cookie the previous response set.

pub(crate) use crate::test_support::{CookieJar, body_text, location};

/// Initialise the full route table over `state` with a test cookie session.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap($crate::test_support::test_session_middleware())
                .app_data(actix_web::web::Data::new($state))
                .configure($crate::inbound::http::configure),
        )
    };
}

/// Send a request through `app`, replaying and then updating `jar`.
macro_rules! send {
    ($app:expr, $jar:expr, $req:expr) => {{
        let res = actix_web::test::call_service(&$app, $jar.with_cookie($req).to_request()).await;
        $jar.absorb(&res);
        res
    }};
}

macro_rules! get {
    ($app:expr, $jar:expr, $path:expr) => {
        $crate::inbound::http::test_utils::send!(
            $app,
            $jar,
            actix_web::test::TestRequest::get().uri($path)
        )
    };
}

macro_rules! post_form {
    ($app:expr, $jar:expr, $path:expr, $form:expr) => {
        $crate::inbound::http::test_utils::send!(
            $app,
            $jar,
            actix_web::test::TestRequest::post().uri($path).set_form($form)
        )
    };
}

/// Log in and assert the redirect that follows.
macro_rules! login {
    ($app:expr, $jar:expr, $username:expr, $password:expr) => {{
        let res = $crate::inbound::http::test_utils::post_form!(
            $app,
            $jar,
            "/login",
            &[("username", $username), ("password", $password)]
        );
        assert_eq!(res.status(), actix_web::http::StatusCode::SEE_OTHER);
        res
    }};
}

pub(crate) use {get, login, post_form, send, test_app};
