//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while turning domain
//! failures into the responses a browser expects: a redirect to the login
//! form for authentication failures, an HTML error page for the rest.

use actix_web::http::header::{ContentType, LOCATION};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use super::views::error_page;
use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Where unauthenticated and unauthorised requests are sent.
pub const LOGIN_PATH: &str = "/login";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::SEE_OTHER,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable | ErrorCode::InternalError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Text safe to show the client; store and internal failures say nothing.
fn client_detail(error: &Error) -> Option<&str> {
    match error.code() {
        ErrorCode::InternalError | ErrorCode::ServiceUnavailable => None,
        _ => Some(error.message()),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        if self.code() == ErrorCode::Unauthorized {
            return builder.insert_header((LOCATION, LOGIN_PATH)).finish();
        }
        if status.is_server_error() {
            error!(
                code = ?self.code(),
                message = %self.message(),
                trace_id = self.trace_id().unwrap_or("-"),
                "request failed"
            );
        }
        builder
            .content_type(ContentType::html())
            .body(error_page(client_detail(self), self.trace_id()))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}
