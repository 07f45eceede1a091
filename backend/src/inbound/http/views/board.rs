//! Admin assignment board and engineer worklist.

use chrono::{DateTime, Utc};

use super::{Layout, escape, field_error};
use crate::domain::{
    AssignedComplaint, AssignmentBoard, COMPLAINT_FIELD, ComplaintStatus, ENGINEER_FIELD,
    FieldErrors, Identity,
};
use crate::inbound::http::session::Flash;

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn status_cell(status: &ComplaintStatus) -> String {
    match status {
        ComplaintStatus::Submitted => status.label().to_owned(),
        ComplaintStatus::Assigned { engineers } => {
            let names: Vec<String> = engineers.iter().map(|name| escape(name.as_ref())).collect();
            format!("{} to {}", status.label(), names.join(", "))
        }
    }
}

pub struct AdminView<'a> {
    pub identity: &'a Identity,
    pub flashes: &'a [Flash],
    pub board: &'a AssignmentBoard,
    pub errors: &'a FieldErrors,
    pub complaint_id: &'a str,
    pub engineer_name: &'a str,
}

pub fn admin_page(view: &AdminView<'_>) -> String {
    let mut body = String::from("<h1>Complaints</h1>\n");
    if view.board.entries.is_empty() {
        body.push_str("<p class=\"empty\">No complaints yet.</p>\n");
    } else {
        body.push_str(
            "<table class=\"complaints\">\n<thead><tr><th>ID</th><th>Received</th>\
             <th>From</th><th>Contact</th><th>Description</th><th>Status</th></tr></thead>\n<tbody>\n",
        );
        for entry in &view.board.entries {
            let complaint = &entry.complaint;
            body.push_str(&format!(
                "<tr data-complaint=\"{id}\"><td>{id}</td><td>{at}</td><td>{from}</td>\
                 <td>{contact}</td><td>{desc}</td><td>{status}</td></tr>\n",
                id = complaint.id(),
                at = timestamp(complaint.created_at()),
                from = escape(complaint.submitter().as_ref()),
                contact = escape(complaint.contact()),
                desc = escape(complaint.description()),
                status = status_cell(&entry.status),
            ));
        }
        body.push_str("</tbody>\n</table>\n");
    }

    body.push_str("<h2>Assign a complaint</h2>\n<form method=\"post\" action=\"/assign\">\n");
    body.push_str(&format!(
        "<p>\n<label for=\"{COMPLAINT_FIELD}\">Complaint</label>\n\
         <select id=\"{COMPLAINT_FIELD}\" name=\"{COMPLAINT_FIELD}\">\n\
         <option value=\"\">Choose a complaint</option>\n"
    ));
    for entry in &view.board.entries {
        let id = entry.complaint.id().to_string();
        let selected = if id == view.complaint_id { " selected" } else { "" };
        body.push_str(&format!(
            "<option value=\"{id}\"{selected}>{} ({})</option>\n",
            escape(entry.complaint.description()),
            escape(entry.complaint.submitter().as_ref()),
        ));
    }
    body.push_str("</select>\n");
    field_error(&mut body, COMPLAINT_FIELD, view.errors);
    body.push_str(&format!(
        "</p>\n<p>\n<label for=\"{ENGINEER_FIELD}\">Engineer</label>\n\
         <select id=\"{ENGINEER_FIELD}\" name=\"{ENGINEER_FIELD}\">\n\
         <option value=\"\">Choose an engineer</option>\n"
    ));
    for engineer in &view.board.engineers {
        let username = engineer.username.as_ref();
        let selected = if username == view.engineer_name { " selected" } else { "" };
        body.push_str(&format!(
            "<option value=\"{value}\"{selected}>{name} ({value})</option>\n",
            value = escape(username),
            name = escape(engineer.display_name.as_ref()),
        ));
    }
    body.push_str("</select>\n");
    field_error(&mut body, ENGINEER_FIELD, view.errors);
    body.push_str("</p>\n<button type=\"submit\">Assign</button>\n</form>");

    Layout {
        title: "Admin",
        identity: Some(view.identity),
        flashes: view.flashes,
    }
    .render(&body)
}

pub fn engineer_page(
    identity: &Identity,
    flashes: &[Flash],
    worklist: &[AssignedComplaint],
) -> String {
    let mut body = String::from("<h1>Assigned complaints</h1>\n");
    if worklist.is_empty() {
        body.push_str("<p class=\"empty\">Nothing assigned to you.</p>");
    } else {
        body.push_str(
            "<table class=\"worklist\">\n<thead><tr><th>Assigned</th><th>Complaint</th>\
             <th>From</th><th>Contact</th><th>Description</th></tr></thead>\n<tbody>\n",
        );
        for item in worklist {
            let assigned = timestamp(item.assignment.created_at());
            let id = item.assignment.complaint_id();
            match &item.complaint {
                Some(complaint) => body.push_str(&format!(
                    "<tr data-complaint=\"{id}\"><td>{assigned}</td><td>{id}</td><td>{}</td>\
                     <td>{}</td><td>{}</td></tr>\n",
                    escape(complaint.submitter().as_ref()),
                    escape(complaint.contact()),
                    escape(complaint.description()),
                )),
                None => body.push_str(&format!(
                    "<tr data-complaint=\"{id}\" class=\"missing\"><td>{assigned}</td><td>{id}</td>\
                     <td colspan=\"3\">Complaint no longer available</td></tr>\n"
                )),
            }
        }
        body.push_str("</tbody>\n</table>");
    }
    Layout {
        title: "My work",
        identity: Some(identity),
        flashes,
    }
    .render(&body)
}
