//! Dashboard and complaint submission.
//!
//! ```text
//! GET  /                    dashboard
//! GET  /complaint           submission form
//! POST /registerComplaint   contact, desc
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};
use tracing::{error, info};

use super::auth::CurrentUser;
use super::forms::ComplaintForm;
use super::redirect;
use super::session::{Flash, SessionContext};
use super::state::HttpState;
use super::views::{ComplaintView, complaint_page, dashboard_page, html_response};
use crate::domain::{ApiResult, ComplaintSubmission, ErrorCode, FieldErrors};

pub const COMPLAINT_SUCCESS_MESSAGE: &str = "Complaint registered successfully";
pub const COMPLAINT_FAILED_MESSAGE: &str = "Failed to register complaint";

#[get("/")]
pub async fn dashboard(user: CurrentUser, session: SessionContext) -> HttpResponse {
    let flashes = session.take_flashes();
    html_response(StatusCode::OK, dashboard_page(user.identity(), &flashes))
}

#[get("/complaint")]
pub async fn complaint_form(user: CurrentUser, session: SessionContext) -> HttpResponse {
    let flashes = session.take_flashes();
    html_response(
        StatusCode::OK,
        complaint_page(&ComplaintView {
            identity: user.identity(),
            flashes: &flashes,
            errors: &FieldErrors::default(),
            contact: "",
            desc: "",
        }),
    )
}

#[post("/registerComplaint")]
pub async fn register_complaint(
    user: CurrentUser,
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<ComplaintForm>,
) -> ApiResult<HttpResponse> {
    let submission = ComplaintSubmission::from(form.into_inner());
    match state.complaints.submit(user.identity(), &submission).await {
        Ok(complaint) => {
            info!(
                complaint_id = %complaint.id(),
                submitter = %complaint.submitter(),
                "complaint registered"
            );
            session.push_flash(Flash::success(COMPLAINT_SUCCESS_MESSAGE))?;
            Ok(redirect("/"))
        }
        Err(err) if err.code() == ErrorCode::InvalidRequest => {
            let errors = err.field_errors();
            let flashes = session.take_flashes();
            Ok(html_response(
                StatusCode::BAD_REQUEST,
                complaint_page(&ComplaintView {
                    identity: user.identity(),
                    flashes: &flashes,
                    errors: &errors,
                    contact: &submission.contact,
                    desc: &submission.description,
                }),
            ))
        }
        Err(err) => {
            error!(code = ?err.code(), error = %err, "complaint submission failed");
            session.push_flash(Flash::error(COMPLAINT_FAILED_MESSAGE))?;
            Ok(redirect("/complaint"))
        }
    }
}
