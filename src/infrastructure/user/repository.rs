//! In-memory user store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// Users keyed by id, with a unique email index kept under the same lock
#[derive(Debug, Default)]
struct Directory {
    by_id: HashMap<UserId, User>,
    by_email: HashMap<String, UserId>,
}

impl Directory {
    fn insert(&mut self, user: User) -> Result<(), DomainError> {
        if self.by_id.contains_key(user.id()) {
            return Err(DomainError::storage(format!(
                "user id {} already exists",
                user.id()
            )));
        }
        if self.by_email.contains_key(user.email()) {
            return Err(DomainError::email_taken(user.email()));
        }

        self.by_email.insert(user.email().to_string(), *user.id());
        self.by_id.insert(*user.id(), user);
        Ok(())
    }
}

/// Process-local `UserRepository`; contents are lost on restart
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    directory: RwLock<Directory>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.directory.read().await.by_id.get(id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let directory = self.directory.read().await;

        Ok(directory
            .by_email
            .get(email)
            .and_then(|id| directory.by_id.get(id))
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        self.directory.write().await.insert(user.clone())?;
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut directory = self.directory.write().await;

        match directory.by_id.remove(id) {
            Some(user) => {
                directory.by_email.remove(user.email());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Oldest first; ties broken by email so the order is stable
    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let mut users: Vec<User> = self.directory.read().await.by_id.values().cloned().collect();
        users.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.email().cmp(b.email()))
        });
        Ok(users)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.directory.read().await.by_id.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User::new("Grace", "Hopper", email, "$argon2id$stub")
    }

    #[tokio::test]
    async fn test_lookup_by_id_and_email() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(user("grace@example.com")).await.unwrap();

        assert_eq!(repo.get(created.id()).await.unwrap(), Some(created.clone()));
        assert_eq!(
            repo.get_by_email("grace@example.com").await.unwrap(),
            Some(created)
        );
        assert!(repo.get_by_email("other@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_email_is_unique() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("grace@example.com")).await.unwrap();

        let err = repo.create(user("grace@example.com")).await.unwrap_err();

        assert!(matches!(err, DomainError::EmailTaken { ref email } if email == "grace@example.com"));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reused_id_is_a_storage_error() {
        let repo = InMemoryUserRepository::new();
        let first = user("grace@example.com");
        repo.create(first.clone()).await.unwrap();

        let result = repo.create(first).await;

        assert!(matches!(result, Err(DomainError::Storage(_))));
    }

    #[tokio::test]
    async fn test_delete_frees_the_email() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(user("grace@example.com")).await.unwrap();

        assert!(repo.delete(created.id()).await.unwrap());
        assert!(!repo.delete(created.id()).await.unwrap());
        assert!(!repo.email_exists("grace@example.com").await.unwrap());

        repo.create(user("grace@example.com")).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_creation() {
        let at = |minute| {
            chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 1, 12, minute, 0).unwrap()
        };
        let stored = |email: &str, minute| {
            User::from_parts(
                UserId::generate(),
                "Grace".to_string(),
                "Hopper".to_string(),
                email.to_string(),
                "$argon2id$stub".to_string(),
                at(minute),
            )
        };

        let repo = InMemoryUserRepository::new();
        repo.create(stored("late@example.com", 30)).await.unwrap();
        repo.create(stored("b@example.com", 5)).await.unwrap();
        repo.create(stored("a@example.com", 5)).await.unwrap();

        let emails: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .iter()
            .map(|u| u.email().to_string())
            .collect();

        assert_eq!(emails, ["a@example.com", "b@example.com", "late@example.com"]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }
}
