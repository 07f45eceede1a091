//! Error page rendered for failures the user cannot fix.

use super::{Layout, escape};

/// Headline of the generic error page.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong!";

/// Page shown for unexpected failures. `detail` is shown verbatim (escaped),
/// so callers must pass only client-safe text.
pub fn error_page(detail: Option<&str>, trace_id: Option<&str>) -> String {
    let mut body = format!("<h1>{GENERIC_ERROR_MESSAGE}</h1>\n");
    if let Some(detail) = detail {
        body.push_str(&format!("<p>{}</p>\n", escape(detail)));
    }
    if let Some(trace_id) = trace_id {
        body.push_str(&format!(
            "<p class=\"trace\">Reference: <code>{}</code></p>\n",
            escape(trace_id)
        ));
    }
    body.push_str("<p><a href=\"/\">Back to the dashboard</a></p>");
    Layout {
        title: "Error",
        identity: None,
        flashes: &[],
    }
    .render(&body)
}
