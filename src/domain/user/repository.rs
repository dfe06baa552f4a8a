//! User repository trait

use async_trait::async_trait;

use super::entity::{User, UserId};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository trait for user storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by their ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by their email (login identifier)
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user; fails with a conflict if the email is taken
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Delete a user
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;

    /// List all users
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Count users
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_get_by_email() {
        let user = User::new("Ada", "Lovelace", "ada@example.com", "hash");
        let expected = user.clone();

        let mut mock = MockUserRepository::new();
        mock.expect_get_by_email()
            .withf(|email| email == "ada@example.com")
            .returning(move |_| Ok(Some(user.clone())));

        let found = mock.get_by_email("ada@example.com").await.unwrap();
        assert_eq!(found, Some(expected));
    }

    #[tokio::test]
    async fn test_mock_storage_failure() {
        let mut mock = MockUserRepository::new();
        mock.expect_count()
            .returning(|| Err(DomainError::storage("connection refused")));

        assert!(mock.count().await.is_err());
    }
}
