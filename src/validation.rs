//! Field rules for users and posts, applied before anything reaches the store.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub const NAME_MIN_LENGTH: usize = 2;
pub const EMAIL_MIN_LENGTH: usize = 5;
pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const TITLE_MIN_LENGTH: usize = 2;
pub const CONTENT_MIN_LENGTH: usize = 5;

const PASSWORD_RULES: &str = "Invalid password. It must be at least 8 characters long and include an uppercase letter, a lowercase letter, a number, and a special character (e.g., @, $, !, %, *)";

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() < NAME_MIN_LENGTH {
        return Err(ValidationError::new(format!(
            "User name must be at least {} characters",
            NAME_MIN_LENGTH
        )));
    }
    Ok(())
}

/// Basic `local@domain.tld` shape check.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::new("The email address is incorrect. Enter a valid one");
    let email = email.trim();

    if email.len() < EMAIL_MIN_LENGTH || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= PASSWORD_MIN_LENGTH;
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if long_enough && has_upper && has_lower && has_digit && has_special {
        Ok(())
    } else {
        Err(ValidationError::new(PASSWORD_RULES))
    }
}

pub fn validate_post_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().chars().count() < TITLE_MIN_LENGTH {
        return Err(ValidationError::new(format!(
            "Title must be at least {} characters",
            TITLE_MIN_LENGTH
        )));
    }
    Ok(())
}

pub fn validate_post_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().chars().count() < CONTENT_MIN_LENGTH {
        return Err(ValidationError::new(format!(
            "Content must be at least {} characters",
            CONTENT_MIN_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_emails() {
        assert!(validate_email("john@example.com").is_ok());
        assert!(validate_email("  a.b+tag@mail.example.org ").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in ["", "john", "john@", "@example.com", "john@example", "jo hn@example.com", "a@b@c.com", "john@example..com"] {
            assert!(validate_email(email).is_err(), "accepted {:?}", email);
        }
    }

    #[test]
    fn password_needs_every_character_class() {
        assert!(validate_password("StrongP@ss123!").is_ok());
        assert!(validate_password("Sh0rt!").is_err());
        assert!(validate_password("alllower1!").is_err());
        assert!(validate_password("ALLUPPER1!").is_err());
        assert!(validate_password("NoDigits!!").is_err());
        assert!(validate_password("NoSpecial123").is_err());
    }

    #[test]
    fn name_and_post_lengths_are_trimmed() {
        assert!(validate_name(" J ").is_err());
        assert!(validate_name("Jo").is_ok());
        assert!(validate_post_title("A").is_err());
        assert!(validate_post_title("Hi").is_ok());
        assert!(validate_post_content("  abcd  ").is_err());
        assert!(validate_post_content("abcde").is_ok());
    }
}
