use thiserror::Error;

use crate::domain::user::UserValidationError;

/// Failures outside the token layer: user input, the user store and
/// startup configuration
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    InvalidUser(#[from] UserValidationError),

    #[error("Email '{email}' is already registered")]
    EmailTaken { email: String },

    #[error("User store error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn email_taken(email: impl Into<String>) -> Self {
        Self::EmailTaken {
            email: email.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
