//! Engineer worklist at `GET /jeng`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, web};
use tracing::error;

use super::auth::EngineerUser;
use super::redirect;
use super::session::{Flash, SessionContext};
use super::state::HttpState;
use super::views::{engineer_page, html_response};
use crate::domain::ApiResult;

pub const WORKLIST_LOAD_FAILED_MESSAGE: &str = "Failed to load engineer dashboard";

#[get("/jeng")]
pub async fn engineer_worklist(
    engineer: EngineerUser,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    match state.assignments_query.worklist(engineer.identity()).await {
        Ok(worklist) => {
            let flashes = session.take_flashes();
            Ok(html_response(
                StatusCode::OK,
                engineer_page(engineer.identity(), &flashes, &worklist),
            ))
        }
        Err(err) => {
            error!(
                code = ?err.code(),
                error = %err,
                engineer = %engineer.identity().username(),
                "loading worklist failed"
            );
            session.push_flash(Flash::error(WORKLIST_LOAD_FAILED_MESSAGE))?;
            Ok(redirect("/"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::MockAssignmentQuery;
    use crate::domain::{Error, Role};
    use crate::inbound::http::test_utils::{
        CookieJar, body_text, get, location, login, post_form, test_app,
    };
    use crate::test_support::InMemoryStack;

    #[actix_web::test]
    async fn empty_worklist_says_so() {
        let stack = InMemoryStack::new();
        stack.register("bob", Role::Engineer, "hunter22").await;
        let app = test_app!(stack.state()).await;
        let mut jar = CookieJar::new();
        login!(app, jar, "bob", "hunter22");

        let res = get!(app, jar, "/jeng");
        assert_eq!(res.status(), StatusCode::OK);
        assert!(body_text(res).await.contains("Nothing assigned to you."));
    }

    #[actix_web::test]
    async fn shows_only_complaints_assigned_to_the_caller() {
        let stack = InMemoryStack::new();
        stack.register("alice", Role::User, "hunter22").await;
        stack.register("root", Role::Admin, "hunter22").await;
        stack.register("bob", Role::Engineer, "hunter22").await;
        stack.register("carol", Role::Engineer, "hunter22").await;
        let app = test_app!(stack.state()).await;

        let mut alice = CookieJar::new();
        login!(app, alice, "alice", "hunter22");
        post_form!(
            app,
            alice,
            "/registerComplaint",
            &[("contact", "555-0100"), ("desc", "Boiler is leaking")]
        );
        post_form!(
            app,
            alice,
            "/registerComplaint",
            &[("contact", "555-0100"), ("desc", "Window will not close")]
        );
        assert_eq!(stack.complaints.len(), 2);

        let mut root = CookieJar::new();
        login!(app, root, "root", "hunter22");
        let board = body_text(get!(app, root, "/admin")).await;
        let ids: Vec<String> = board
            .match_indices("data-complaint=\"")
            .map(|(start, marker)| {
                let rest = &board[start + marker.len()..];
                rest.chars().take_while(|c| *c != '"').collect()
            })
            .collect();
        assert_eq!(ids.len(), 2);
        let res = post_form!(
            app,
            root,
            "/assign",
            &[("complaintID", ids[0].as_str()), ("engineerName", "bob")]
        );
        assert_eq!(location(&res).as_deref(), Some("/admin"));
        post_form!(
            app,
            root,
            "/assign",
            &[("complaintID", ids[1].as_str()), ("engineerName", "carol")]
        );

        let mut bob = CookieJar::new();
        login!(app, bob, "bob", "hunter22");
        let page = body_text(get!(app, bob, "/jeng")).await;
        assert!(page.contains(&ids[0]));
        assert!(!page.contains(&ids[1]));
    }

    #[actix_web::test]
    async fn load_failure_sends_engineer_home() {
        let stack = InMemoryStack::new();
        stack.register("bob", Role::Engineer, "hunter22").await;
        let mut query = MockAssignmentQuery::new();
        query
            .expect_worklist()
            .times(1)
            .returning(|_| Err(Error::service_unavailable("assignment store offline")));
        let mut state = stack.state();
        state.assignments_query = Arc::new(query);

        let app = test_app!(state).await;
        let mut jar = CookieJar::new();
        login!(app, jar, "bob", "hunter22");
        let res = get!(app, jar, "/jeng");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res).as_deref(), Some("/"));
        let page = body_text(get!(app, jar, "/")).await;
        assert!(page.contains(WORKLIST_LOAD_FAILED_MESSAGE));
    }

    #[actix_web::test]
    async fn admins_are_turned_away() {
        let stack = InMemoryStack::new();
        stack.register("root", Role::Admin, "hunter22").await;
        let app = test_app!(stack.state()).await;
        let mut jar = CookieJar::new();
        login!(app, jar, "root", "hunter22");

        let res = get!(app, jar, "/jeng");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res).as_deref(), Some("/login"));
        let page = body_text(get!(app, jar, "/login")).await;
        assert!(page.contains("You are not authorised to view that page"));
    }
}
