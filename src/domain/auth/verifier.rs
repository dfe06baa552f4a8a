//! Credential verification capability provided by the user store

use async_trait::async_trait;

use crate::domain::user::User;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Looks up principals and checks their secrets
///
/// Implementations must compare secrets with a slow, salted hash.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Find the principal for a login identifier
    async fn lookup_by_identifier(&self, identifier: &str) -> Result<Option<User>, DomainError>;

    /// Check a plaintext secret against the principal's stored hash
    fn verify_secret(&self, principal: &User, secret: &str) -> bool;
}
