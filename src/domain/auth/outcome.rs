//! Request-scoped authentication result

use super::error::AuthError;
use crate::domain::user::User;

/// Result of authenticating one request
///
/// Attached to the request extensions by the authentication middleware and
/// read by the access policy and handlers. Never persisted.
#[derive(Debug, Clone)]
pub enum AuthenticationOutcome {
    Authenticated(User),
    Unauthenticated(AuthError),
}

impl AuthenticationOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn principal(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Unauthenticated(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&AuthError> {
        match self {
            Self::Authenticated(_) => None,
            Self::Unauthenticated(reason) => Some(reason),
        }
    }
}

impl From<Result<User, AuthError>> for AuthenticationOutcome {
    fn from(result: Result<User, AuthError>) -> Self {
        match result {
            Ok(user) => Self::Authenticated(user),
            Err(reason) => Self::Unauthenticated(reason),
        }
    }
}
