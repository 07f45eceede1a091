//! Field-level validation failures collected across a whole form.
//!
//! Forms report every violated field at once, so validation code pushes into
//! a [`FieldErrors`] accumulator and converts it into a domain
//! [`Error`](crate::domain::Error) only when it is non-empty.

use serde::{Deserialize, Serialize};

/// A single violated field and the message shown next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    field: String,
    message: String,
}

impl FieldError {
    /// Name of the offending form field, as submitted by the client.
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Human-readable explanation.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Ordered collection of field errors.
///
/// # Examples
/// ```
/// use complaints::domain::FieldErrors;
///
/// let mut errors = FieldErrors::default();
/// errors.push("username", "Username is required");
/// errors.push("password", "Password must be at least 6 characters");
/// assert!(errors.mentions("username"));
/// assert_eq!(errors.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Record a violation for `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the violations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// True when at least one violation names `field`.
    pub fn mentions(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }

    /// First message recorded for `field`.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(FieldError::message)
    }

    /// Return `value` when no violations were recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn message_for_returns_first_match() {
        let mut errors = FieldErrors::default();
        errors.push("email", "Valid email is required");
        errors.push("email", "Email already in use");
        assert_eq!(errors.message_for("email"), Some("Valid email is required"));
        assert_eq!(errors.message_for("name"), None);
    }

    #[rstest]
    fn into_result_passes_value_through_when_clean() {
        let errors = FieldErrors::default();
        assert_eq!(errors.into_result(7), Ok(7));
    }

    #[rstest]
    fn into_result_fails_when_dirty() {
        let mut errors = FieldErrors::default();
        errors.push("desc", "Description is required");
        let err = errors.into_result(()).expect_err("violations must fail");
        assert!(err.mentions("desc"));
    }
}
