//! Form validation run synchronously on submit.
//!
//! Validators are pure: proposed field values in, a field → message map out.
//! An empty map means the form may be submitted.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::entity::contact;

/// Error message per field name, ordered by field name.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

pub const NAME_REQUIRED: &str = "Name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Invalid email format";

// local@domain.tld: no whitespace or extra `@`, at least one dot after the `@`.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Name and email are required, email must look like an address. Phone and
/// company are free.
pub fn validate_contact(form: &contact::Draft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if form.name.trim().is_empty() {
        errors.insert("name", NAME_REQUIRED);
    }
    if form.email.trim().is_empty() {
        errors.insert("email", EMAIL_REQUIRED);
    } else if !is_valid_email(&form.email) {
        errors.insert("email", EMAIL_INVALID);
    }
    errors
}

/// Task titles must have content. Returns the trimmed title.
pub fn require_title(title: &str) -> Option<&str> {
    let title = title.trim();
    (!title.is_empty()).then_some(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str) -> contact::Draft {
        contact::Draft {
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_contact_has_no_errors() {
        assert!(validate_contact(&form("Ada", "ada@example.com")).is_empty());
    }

    #[test]
    fn test_bad_email_only_flags_email() {
        let errors = validate_contact(&form("Ada", "not-an-email"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some(&EMAIL_INVALID));
    }

    #[test]
    fn test_empty_name_flagged_regardless_of_email() {
        let errors = validate_contact(&form("   ", "ada@example.com"));
        assert_eq!(errors.get("name"), Some(&NAME_REQUIRED));
        assert!(!errors.contains_key("email"));

        let errors = validate_contact(&form("", "nope"));
        assert_eq!(errors.get("name"), Some(&NAME_REQUIRED));
        assert_eq!(errors.get("email"), Some(&EMAIL_INVALID));
    }

    #[test]
    fn test_blank_email_is_required_not_invalid() {
        let errors = validate_contact(&form("Ada", "  "));
        assert_eq!(errors.get("email"), Some(&EMAIL_REQUIRED));
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email(" a@b.co"));
    }

    #[test]
    fn test_phone_and_company_are_optional() {
        let draft = contact::Draft {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: String::new(),
            company: String::new(),
        };
        assert!(validate_contact(&draft).is_empty());
    }

    #[test]
    fn test_require_title_trims() {
        assert_eq!(require_title("  Ship report "), Some("Ship report"));
        assert_eq!(require_title(" \t "), None);
    }
}
