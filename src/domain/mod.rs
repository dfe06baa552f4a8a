//! Domain layer - principals, token claims and authentication outcomes

pub mod auth;
pub mod error;
pub mod user;

pub use auth::{
    AuthError, AuthenticationOutcome, Claims, ClaimError, Clock, CredentialVerifier,
    ManualClock, SystemClock,
};
pub use error::DomainError;
pub use user::{User, UserId, UserRepository};
