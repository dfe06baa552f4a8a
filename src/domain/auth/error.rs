//! Authentication error taxonomy

use thiserror::Error;

/// Typed authentication failures
///
/// Token-level kinds carry detail for logs only; what a client sees is
/// decided by [`AuthError::public_message`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Malformed token: {reason}")]
    MalformedToken { reason: String },

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Token subject does not match the expected principal")]
    SubjectMismatch,

    #[error("No principal matches the token subject")]
    UnknownPrincipal,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing or malformed Authorization header")]
    MissingOrMalformedHeader,

    #[error("Backing store unavailable: {message}")]
    BackingStoreUnavailable { message: String },

    #[error("Failed to encode token: {message}")]
    Encoding { message: String },
}

impl AuthError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedToken {
            reason: reason.into(),
        }
    }

    pub fn backing_store(message: impl Into<String>) -> Self {
        Self::BackingStoreUnavailable {
            message: message.into(),
        }
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Stable snake_case name, used for metric labels and error codes
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedToken { .. } => "malformed_token",
            Self::InvalidSignature => "invalid_signature",
            Self::ExpiredToken => "expired_token",
            Self::SubjectMismatch => "subject_mismatch",
            Self::UnknownPrincipal => "unknown_principal",
            Self::InvalidCredentials => "invalid_credentials",
            Self::MissingOrMalformedHeader => "missing_token",
            Self::BackingStoreUnavailable { .. } => "backing_store_unavailable",
            Self::Encoding { .. } => "encoding_error",
        }
    }

    /// Message safe to return to clients
    ///
    /// Signature, format and subject failures collapse into one generic
    /// message so a caller cannot tell which check failed.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MalformedToken { .. }
            | Self::InvalidSignature
            | Self::SubjectMismatch
            | Self::UnknownPrincipal => "Invalid token",
            Self::ExpiredToken => "Token expired",
            Self::InvalidCredentials => "Invalid email or password",
            Self::MissingOrMalformedHeader => "Authentication required",
            Self::BackingStoreUnavailable { .. } => "Authentication service unavailable",
            Self::Encoding { .. } => "Failed to issue token",
        }
    }

    /// Error code safe to return to clients, with the same collapsing as
    /// [`AuthError::public_message`]
    pub fn public_code(&self) -> &'static str {
        match self {
            Self::MalformedToken { .. }
            | Self::InvalidSignature
            | Self::SubjectMismatch
            | Self::UnknownPrincipal => "invalid_token",
            _ => self.kind(),
        }
    }

    /// Whether the failure comes from infrastructure rather than the caller
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::BackingStoreUnavailable { .. } | Self::Encoding { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_token_message() {
        assert_eq!(AuthError::malformed("x").public_message(), "Invalid token");
        assert_eq!(AuthError::InvalidSignature.public_message(), "Invalid token");
        assert_eq!(AuthError::SubjectMismatch.public_message(), "Invalid token");
        assert_eq!(AuthError::UnknownPrincipal.public_message(), "Invalid token");
    }

    #[test]
    fn test_public_code_hides_token_detail() {
        assert_eq!(AuthError::InvalidSignature.public_code(), "invalid_token");
        assert_eq!(AuthError::SubjectMismatch.public_code(), "invalid_token");
        assert_eq!(AuthError::InvalidSignature.kind(), "invalid_signature");
        assert_eq!(AuthError::ExpiredToken.public_code(), "expired_token");
    }

    #[test]
    fn test_distinct_messages() {
        assert_eq!(AuthError::ExpiredToken.public_message(), "Token expired");
        assert_eq!(
            AuthError::InvalidCredentials.public_message(),
            "Invalid email or password"
        );
    }

    #[test]
    fn test_detail_stays_in_display() {
        let err = AuthError::malformed("expected 3 segments, found 2");
        assert_eq!(err.to_string(), "Malformed token: expected 3 segments, found 2");
        assert!(!err.public_message().contains("segments"));
    }

    #[test]
    fn test_infrastructure_classification() {
        assert!(AuthError::backing_store("timeout").is_infrastructure());
        assert!(!AuthError::ExpiredToken.is_infrastructure());
        assert!(!AuthError::InvalidCredentials.is_infrastructure());
    }
}
