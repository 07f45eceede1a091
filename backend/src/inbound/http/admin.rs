//! Admin assignment board.
//!
//! ```text
//! GET  /admin    complaints newest first, with status and engineers
//! POST /assign   complaintID, engineerName
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};
use tracing::{error, info};

use super::auth::AdminUser;
use super::forms::AssignForm;
use super::redirect;
use super::session::{Flash, SessionContext};
use super::state::HttpState;
use super::views::{AdminView, admin_page, html_response};
use crate::domain::{ApiResult, AssignmentRequest, ErrorCode, FieldErrors};

pub const ADMIN_LOAD_FAILED_MESSAGE: &str = "Failed to load admin dashboard";
pub const ASSIGN_SUCCESS_MESSAGE: &str = "Complaint assigned successfully";
pub const ASSIGN_FAILED_MESSAGE: &str = "Failed to assign complaint";

#[get("/admin")]
pub async fn admin_board(
    admin: AdminUser,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let board = match state.assignments_query.board().await {
        Ok(board) => board,
        Err(err) => {
            error!(code = ?err.code(), error = %err, "loading admin board failed");
            session.push_flash(Flash::error(ADMIN_LOAD_FAILED_MESSAGE))?;
            return Ok(redirect("/"));
        }
    };
    let flashes = session.take_flashes();
    Ok(html_response(
        StatusCode::OK,
        admin_page(&AdminView {
            identity: admin.identity(),
            flashes: &flashes,
            board: &board,
            errors: &FieldErrors::default(),
            complaint_id: "",
            engineer_name: "",
        }),
    ))
}

/// Re-render the board with the rejected selection and its errors.
async fn rerender_with_errors(
    admin: &AdminUser,
    state: &HttpState,
    session: &SessionContext,
    form: &AssignForm,
    errors: &FieldErrors,
) -> ApiResult<HttpResponse> {
    let board = match state.assignments_query.board().await {
        Ok(board) => board,
        Err(err) => {
            error!(code = ?err.code(), error = %err, "reloading admin board failed");
            session.push_flash(Flash::error(ASSIGN_FAILED_MESSAGE))?;
            return Ok(redirect("/admin"));
        }
    };
    let flashes = session.take_flashes();
    Ok(html_response(
        StatusCode::BAD_REQUEST,
        admin_page(&AdminView {
            identity: admin.identity(),
            flashes: &flashes,
            board: &board,
            errors,
            complaint_id: &form.complaint_id,
            engineer_name: &form.engineer_name,
        }),
    ))
}

#[post("/assign")]
pub async fn assign(
    admin: AdminUser,
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<AssignForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    let request = match AssignmentRequest::try_from_parts(&form.complaint_id, &form.engineer_name)
    {
        Ok(request) => request,
        Err(errors) => {
            return rerender_with_errors(&admin, &state, &session, &form, &errors).await;
        }
    };

    match state.assignments.assign(&request).await {
        Ok(assignment) => {
            info!(
                assignment_id = %assignment.id(),
                complaint_id = %assignment.complaint_id(),
                engineer = %assignment.engineer(),
                admin = %admin.identity().username(),
                "complaint assigned"
            );
            session.push_flash(Flash::success(ASSIGN_SUCCESS_MESSAGE))?;
            Ok(redirect("/admin"))
        }
        Err(err) if err.code() == ErrorCode::InvalidRequest => {
            let errors = err.field_errors();
            rerender_with_errors(&admin, &state, &session, &form, &errors).await
        }
        Err(err) => {
            error!(code = ?err.code(), error = %err, "assignment failed");
            session.push_flash(Flash::error(ASSIGN_FAILED_MESSAGE))?;
            Ok(redirect("/admin"))
        }
    }
}
