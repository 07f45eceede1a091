//! Login and registration forms.

use super::{Field, Layout, escape, field, field_error};
use crate::domain::{FieldErrors, Role};
use crate::inbound::http::session::Flash;

pub struct LoginView<'a> {
    pub flashes: &'a [Flash],
    pub username: &'a str,
}

pub fn login_page(view: &LoginView<'_>) -> String {
    let mut body = String::from(
        "<h1>Login</h1>\n<form method=\"post\" action=\"/login\">\n",
    );
    let none = FieldErrors::default();
    field(
        &mut body,
        &Field {
            name: "username",
            label: "Username",
            kind: "text",
            value: view.username,
        },
        &none,
    );
    field(
        &mut body,
        &Field {
            name: "password",
            label: "Password",
            kind: "password",
            value: "",
        },
        &none,
    );
    body.push_str(
        "<button type=\"submit\">Login</button>\n</form>\n\
         <p>No account yet? <a href=\"/register\">Register</a></p>",
    );
    Layout {
        title: "Login",
        identity: None,
        flashes: view.flashes,
    }
    .render(&body)
}

/// Previously entered non-secret registration values plus their errors.
pub struct RegisterView<'a> {
    pub flashes: &'a [Flash],
    pub errors: &'a FieldErrors,
    pub name: &'a str,
    pub email: &'a str,
    pub username: &'a str,
    pub role: &'a str,
}

pub fn register_page(view: &RegisterView<'_>) -> String {
    let mut body = String::from("<h1>Register</h1>\n");
    if !view.errors.is_empty() {
        body.push_str("<ul class=\"errors\">\n");
        for error in view.errors {
            body.push_str(&format!("<li>{}</li>\n", escape(error.message())));
        }
        body.push_str("</ul>\n");
    }
    body.push_str("<form method=\"post\" action=\"/register\">\n");
    for (name, label, kind, value) in [
        ("name", "Name", "text", view.name),
        ("email", "Email", "email", view.email),
        ("username", "Username", "text", view.username),
        ("password", "Password", "password", ""),
        ("password2", "Confirm password", "password", ""),
    ] {
        field(
            &mut body,
            &Field {
                name,
                label,
                kind,
                value,
            },
            view.errors,
        );
    }

    body.push_str("<p>\n<label for=\"role\">Role</label>\n<select id=\"role\" name=\"role\">\n");
    body.push_str("<option value=\"\">Choose a role</option>\n");
    let chosen = view.role.parse::<Role>().ok();
    for role in Role::ALL {
        let selected = if chosen == Some(role) { " selected" } else { "" };
        body.push_str(&format!(
            "<option value=\"{value}\"{selected}>{value}</option>\n",
            value = role.as_str(),
        ));
    }
    body.push_str("</select>\n");
    field_error(&mut body, "role", view.errors);
    body.push_str(
        "</p>\n<button type=\"submit\">Register</button>\n</form>\n\
         <p>Already registered? <a href=\"/login\">Login</a></p>",
    );

    Layout {
        title: "Register",
        identity: None,
        flashes: view.flashes,
    }
    .render(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn register_keeps_values_but_not_passwords() {
        let mut errors = FieldErrors::default();
        errors.push("password2", "Passwords do not match");
        let html = register_page(&RegisterView {
            flashes: &[],
            errors: &errors,
            name: "Alice",
            email: "alice@example.com",
            username: "alice",
            role: "jeng",
        });
        assert!(html.contains("value=\"alice@example.com\""));
        assert!(html.contains("Passwords do not match"));
        assert!(html.contains("<option value=\"engineer\" selected>"));
        assert!(!html.contains("value=\"hunter"));
    }

    #[rstest]
    fn login_prefills_username() {
        let html = login_page(&LoginView {
            flashes: &[Flash::error("Invalid credentials")],
            username: "bob",
        });
        assert!(html.contains("value=\"bob\""));
        assert!(html.contains("Invalid credentials"));
    }
}
