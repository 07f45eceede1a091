//! Server-rendered HTML views.
//!
//! Pages are assembled with `std::fmt::Write` into a shared layout. Every
//! value that originates from a user passes through [`escape`].

mod account;
mod board;
mod complaints;
mod error;

pub use account::{LoginView, RegisterView, login_page, register_page};
pub use board::{AdminView, admin_page, engineer_page};
pub use complaints::{ComplaintView, complaint_page, dashboard_page};
pub use error::{GENERIC_ERROR_MESSAGE, error_page};

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;

use crate::domain::{FieldErrors, Identity, Role};
use crate::inbound::http::session::Flash;

/// Escape text for safe inclusion in element content and quoted attributes.
///
/// # Examples
/// ```
/// use complaints::inbound::http::views::escape;
///
/// assert_eq!(escape("<b>\"Tom\" & 'Jerry'</b>"),
///     "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
/// ```
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Chrome shared by every page.
pub(crate) struct Layout<'a> {
    pub title: &'a str,
    pub identity: Option<&'a Identity>,
    pub flashes: &'a [Flash],
}

impl Layout<'_> {
    pub(crate) fn render(&self, body: &str) -> String {
        let mut html = String::with_capacity(body.len() + 1024);
        html.push_str(&format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{} | Complaint Desk</title>\n</head>\n<body>\n",
            escape(self.title)
        ));
        self.render_nav(&mut html);
        html.push_str("<main>\n");
        for flash in self.flashes {
            html.push_str(&format!(
                "<div class=\"flash flash-{}\" role=\"status\">{}</div>\n",
                flash.level.as_str(),
                escape(&flash.message)
            ));
        }
        html.push_str(body);
        html.push_str("\n</main>\n</body>\n</html>\n");
        html
    }

    fn render_nav(&self, html: &mut String) {
        html.push_str("<nav>\n<a href=\"/\">Complaint Desk</a>\n");
        match self.identity {
            Some(identity) => {
                html.push_str("<a href=\"/complaint\">New complaint</a>\n");
                match identity.role() {
                    Role::Admin => html.push_str("<a href=\"/admin\">Assignments</a>\n"),
                    Role::Engineer => html.push_str("<a href=\"/jeng\">My work</a>\n"),
                    Role::User => {}
                }
                html.push_str(&format!(
                    "<span class=\"whoami\">{}</span>\n",
                    escape(identity.username().as_ref())
                ));
                html.push_str(
                    "<form method=\"post\" action=\"/logout\" class=\"inline\">\
                     <button type=\"submit\">Logout</button></form>\n",
                );
            }
            None => {
                html.push_str("<a href=\"/login\">Login</a>\n<a href=\"/register\">Register</a>\n");
            }
        }
        html.push_str("</nav>\n");
    }
}

/// Input description for [`field`].
pub(crate) struct Field<'a> {
    pub name: &'a str,
    pub label: &'a str,
    pub kind: &'a str,
    pub value: &'a str,
}

/// Labelled input followed by the first error recorded for it.
pub(crate) fn field(html: &mut String, input: &Field<'_>, errors: &FieldErrors) {
    html.push_str(&format!(
        "<p>\n<label for=\"{name}\">{label}</label>\n\
         <input id=\"{name}\" name=\"{name}\" type=\"{kind}\" value=\"{value}\">\n",
        name = input.name,
        label = escape(input.label),
        kind = input.kind,
        value = escape(input.value),
    ));
    field_error(html, input.name, errors);
    html.push_str("</p>\n");
}

pub(crate) fn field_error(html: &mut String, name: &str, errors: &FieldErrors) {
    if let Some(message) = errors.message_for(name) {
        html.push_str(&format!(
            "<span class=\"field-error\" data-field=\"{name}\">{}</span>\n",
            escape(message)
        ));
    }
}

/// Wrap rendered HTML in a response with the right content type.
pub fn html_response(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body)
}
