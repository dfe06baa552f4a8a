//! User validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("User ID is not a valid UUID: '{0}'")]
    InvalidId(String),

    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Email exceeds maximum length of {0} characters")]
    EmailTooLong(usize),

    #[error("Email '{0}' is not a valid address")]
    InvalidEmail(String),

    #[error("{0} cannot be empty")]
    EmptyName(&'static str),

    #[error("{0} exceeds maximum length of {1} characters")]
    NameTooLong(&'static str, usize),

    #[error("Password is too short. Minimum length is {0} characters")]
    PasswordTooShort(usize),

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),
}

impl UserValidationError {
    /// Request field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId(_) => "id",
            Self::EmptyEmail | Self::EmailTooLong(_) | Self::InvalidEmail(_) => "email",
            Self::EmptyName(field) | Self::NameTooLong(field, _)
                if field.eq_ignore_ascii_case("surname") =>
            {
                "surname"
            }
            Self::EmptyName(_) | Self::NameTooLong(_, _) => "name",
            Self::PasswordTooShort(_) | Self::PasswordTooLong(_) => "password",
        }
    }
}

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_NAME_LENGTH: usize = 100;
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+$").expect("Invalid email regex"));

/// Validate an email address used as login identifier
///
/// Only the shape `local@domain` is checked; deliverability is not.
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(UserValidationError::InvalidEmail(email.to_string()));
    }

    Ok(())
}

/// Validate a display name component (`field` is used in the error message)
pub fn validate_name(field: &'static str, value: &str) -> Result<(), UserValidationError> {
    if value.trim().is_empty() {
        return Err(UserValidationError::EmptyName(field));
    }

    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(UserValidationError::NameTooLong(field, MAX_NAME_LENGTH));
    }

    Ok(())
}

/// Validate a password
///
/// Rules:
/// - Minimum 8 characters
/// - Maximum 128 characters
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("u@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());
        assert!(validate_email("email@email").is_ok());
    }

    #[test]
    fn test_empty_email() {
        assert_eq!(validate_email(""), Err(UserValidationError::EmptyEmail));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(matches!(
            validate_email("no-at-sign"),
            Err(UserValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("two@@example.com"),
            Err(UserValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("spaced name@example.com"),
            Err(UserValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_email_too_long() {
        let email = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            validate_email(&email),
            Err(UserValidationError::EmailTooLong(254))
        );
    }

    #[test]
    fn test_names() {
        assert!(validate_name("name", "Maurizio").is_ok());
        assert_eq!(
            validate_name("surname", "   "),
            Err(UserValidationError::EmptyName("surname"))
        );
        assert_eq!(
            validate_name("name", &"x".repeat(101)),
            Err(UserValidationError::NameTooLong("name", 100))
        );
    }

    #[test]
    fn test_error_field() {
        assert_eq!(UserValidationError::EmptyEmail.field(), "email");
        assert_eq!(UserValidationError::EmptyName("Surname").field(), "surname");
        assert_eq!(UserValidationError::NameTooLong("Name", 100).field(), "name");
        assert_eq!(UserValidationError::PasswordTooShort(8).field(), "password");
    }

    #[test]
    fn test_valid_passwords() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("P@ssw0rd!").is_ok());
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn test_password_too_short() {
        assert_eq!(
            validate_password("1234567"),
            Err(UserValidationError::PasswordTooShort(8))
        );
    }

    #[test]
    fn test_password_too_long() {
        let long_password = "a".repeat(129);
        assert_eq!(
            validate_password(&long_password),
            Err(UserValidationError::PasswordTooLong(128))
        );
    }
}
