//! Browser-like drivers for the full route table.
//!
//! Each request replays the session cookie the previous response set, so a
//! test reads like a user clicking through the site.

#![allow(unused_macros, unused_imports)]

pub use complaints::test_support::{CookieJar, InMemoryStack, body_text, location};

macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .configure(complaints::inbound::http::configure)
                .wrap(complaints::test_support::test_session_middleware())
                .wrap(complaints::Trace),
        )
    };
}

macro_rules! send {
    ($app:expr, $jar:expr, $req:expr) => {{
        let res = actix_web::test::call_service(&$app, $jar.with_cookie($req).to_request()).await;
        $jar.absorb(&res);
        res
    }};
}

macro_rules! get {
    ($app:expr, $jar:expr, $path:expr) => {
        send!($app, $jar, actix_web::test::TestRequest::get().uri($path))
    };
}

macro_rules! post_form {
    ($app:expr, $jar:expr, $path:expr, $form:expr) => {
        send!(
            $app,
            $jar,
            actix_web::test::TestRequest::post().uri($path).set_form($form)
        )
    };
}

macro_rules! login {
    ($app:expr, $jar:expr, $username:expr, $password:expr) => {
        post_form!(
            $app,
            $jar,
            "/login",
            &[("username", $username), ("password", $password)]
        )
    };
}

pub(crate) use {get, login, post_form, send, test_app};
