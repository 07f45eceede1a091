//! Dashboard and complaint submission form.

use super::{Field, Layout, escape, field, field_error};
use crate::domain::{FieldErrors, Identity, Role};
use crate::inbound::http::session::Flash;

pub fn dashboard_page(identity: &Identity, flashes: &[Flash]) -> String {
    let mut body = format!(
        "<h1>Welcome, {}</h1>\n<ul class=\"actions\">\n\
         <li><a href=\"/complaint\">Register a complaint</a></li>\n",
        escape(identity.username().as_ref())
    );
    match identity.role() {
        Role::Admin => body.push_str("<li><a href=\"/admin\">Assign complaints</a></li>\n"),
        Role::Engineer => {
            body.push_str("<li><a href=\"/jeng\">View assigned complaints</a></li>\n");
        }
        Role::User => {}
    }
    body.push_str("</ul>");
    Layout {
        title: "Dashboard",
        identity: Some(identity),
        flashes,
    }
    .render(&body)
}

pub struct ComplaintView<'a> {
    pub identity: &'a Identity,
    pub flashes: &'a [Flash],
    pub errors: &'a FieldErrors,
    pub contact: &'a str,
    pub desc: &'a str,
}

pub fn complaint_page(view: &ComplaintView<'_>) -> String {
    let mut body =
        String::from("<h1>Register a complaint</h1>\n<form method=\"post\" action=\"/registerComplaint\">\n");
    field(
        &mut body,
        &Field {
            name: "contact",
            label: "Contact number",
            kind: "text",
            value: view.contact,
        },
        view.errors,
    );
    body.push_str(&format!(
        "<p>\n<label for=\"desc\">Description</label>\n\
         <textarea id=\"desc\" name=\"desc\" rows=\"5\">{}</textarea>\n",
        escape(view.desc)
    ));
    field_error(&mut body, "desc", view.errors);
    body.push_str("</p>\n<button type=\"submit\">Submit</button>\n</form>");
    Layout {
        title: "Register a complaint",
        identity: Some(view.identity),
        flashes: view.flashes,
    }
    .render(&body)
}
