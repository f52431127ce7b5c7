//! Contact form values and the field rules shared by the browser-side form
//! and the delivery endpoint.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const NAME_MIN_CHARS: usize = 2;
pub const MESSAGE_MIN_CHARS: usize = 10;

pub const NAME_TOO_SHORT: &str = "Name must be at least 2 characters.";
pub const EMAIL_INVALID: &str = "Please enter a valid email address.";
pub const MESSAGE_TOO_SHORT: &str = "Message must be at least 10 characters.";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+'-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
        .expect("email regex")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFormValues {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Email,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: ContactField,
    pub message: &'static str,
}

impl ContactFormValues {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    /// Applies every field rule and returns all violations, in form order.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.name.trim().chars().count() < NAME_MIN_CHARS {
            errors.push(FieldError {
                field: ContactField::Name,
                message: NAME_TOO_SHORT,
            });
        }
        if !is_valid_email(&self.email) {
            errors.push(FieldError {
                field: ContactField::Email,
                message: EMAIL_INVALID,
            });
        }
        if self.message.trim().chars().count() < MESSAGE_MIN_CHARS {
            errors.push(FieldError {
                field: ContactField::Message,
                message: MESSAGE_TOO_SHORT,
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.email.clear();
        self.message.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.message.is_empty()
    }
}

pub fn is_valid_email(email: &str) -> bool {
    !email.contains("..") && EMAIL_RE.is_match(email.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(errors: &[FieldError]) -> Vec<ContactField> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn test_valid_submission_passes() {
        let values = ContactFormValues::new(
            "Jane Doe",
            "jane@example.com",
            "This is a sufficiently long message.",
        );
        assert!(values.validate().is_ok());
    }

    #[test]
    fn test_short_name_and_message_are_both_reported() {
        let values = ContactFormValues::new("A", "x@y.com", "short");
        let errors = values.validate().unwrap_err();
        assert_eq!(fields(&errors), vec![ContactField::Name, ContactField::Message]);
        assert_eq!(errors[1].message, MESSAGE_TOO_SHORT);
    }

    #[test]
    fn test_whitespace_padding_does_not_count() {
        let values = ContactFormValues::new(" J ", "j@example.com", "         ok         ");
        let errors = values.validate().unwrap_err();
        assert_eq!(fields(&errors), vec![ContactField::Name, ContactField::Message]);
    }

    #[test]
    fn test_message_length_counts_characters_not_bytes() {
        let values = ContactFormValues::new("Zoë", "zoe@example.com", "héllo wörld");
        assert!(values.validate().is_ok());
    }

    #[test]
    fn test_email_syntax() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co.uk"));
        assert!(is_valid_email("x@y.com"));
        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane doe@example.com"));
        assert!(!is_valid_email("jane@@example.com"));
        assert!(!is_valid_email("jane..doe@example.com"));
        assert!(!is_valid_email("jane@-example.com"));
    }

    #[test]
    fn test_clear_empties_all_fields() {
        let mut values = ContactFormValues::new("Jane", "jane@example.com", "hello there!");
        values.clear();
        assert!(values.is_empty());
    }
}
