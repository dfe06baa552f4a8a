//! User service for registration, lookup and credential checks

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::auth::CredentialVerifier;
use crate::domain::user::{
    validate_email, validate_name, validate_password, User, UserId, UserRepository,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Fields submitted to register a user
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
}

/// User service for registration and management
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new user
    pub async fn register(&self, request: Registration) -> Result<User, DomainError> {
        let email = request.email.trim();

        validate_name("Name", &request.name)?;
        validate_name("Surname", &request.surname)?;
        validate_email(email)?;
        validate_password(&request.password)?;

        if self.repository.email_exists(email).await? {
            return Err(DomainError::email_taken(email));
        }

        let hasher = Arc::clone(&self.hasher);
        let password = request.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::internal(format!("password hashing aborted: {}", e)))??;

        let user = User::new(
            request.name.trim(),
            request.surname.trim(),
            email,
            password_hash,
        );

        self.repository.create(user).await
    }

    /// Store a user whose password is already hashed
    ///
    /// Returns `Ok(None)` when the email is already registered.
    pub async fn import(&self, user: User) -> Result<Option<User>, DomainError> {
        validate_email(user.email())?;

        if self.repository.email_exists(user.email()).await? {
            return Ok(None);
        }

        self.repository.create(user).await.map(Some)
    }

    /// Register a user unless the email is already taken
    pub async fn ensure(&self, request: Registration) -> Result<Option<User>, DomainError> {
        if self.repository.email_exists(request.email.trim()).await? {
            return Ok(None);
        }

        self.register(request).await.map(Some)
    }

    /// Get a user by ID
    pub async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        let user_id = UserId::parse(id)?;
        self.repository.get(&user_id).await
    }

    /// Get a user by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.repository.get_by_email(email).await
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repository.list().await
    }

    /// Count users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    /// Delete a user
    pub async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let user_id = UserId::parse(id)?;
        self.repository.delete(&user_id).await
    }
}

#[async_trait]
impl<R, H> CredentialVerifier for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn lookup_by_identifier(&self, identifier: &str) -> Result<Option<User>, DomainError> {
        self.repository.get_by_email(identifier).await
    }

    fn verify_secret(&self, principal: &User, secret: &str) -> bool {
        self.hasher.verify(secret, principal.password_hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{MockUserRepository, UserValidationError};
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn test_service() -> UserService<InMemoryUserRepository, Argon2Hasher> {
        let repository = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(Argon2Hasher::new());
        UserService::new(repository, hasher)
    }

    fn registration(email: &str, password: &str) -> Registration {
        Registration {
            name: "Ada".to_string(),
            surname: "Lovelace".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register() {
        let service = test_service();

        let user = service
            .register(registration("ada@example.com", "secure_password123"))
            .await
            .unwrap();

        assert_eq!(user.email(), "ada@example.com");
        assert_eq!(user.display_name(), "Ada Lovelace");
        assert_ne!(user.password_hash(), "secure_password123");
    }

    #[tokio::test]
    async fn test_register_invalid_email() {
        let service = test_service();

        let result = service
            .register(registration("not-an-email", "secure_password123"))
            .await;
        assert!(matches!(result, Err(DomainError::InvalidUser(_))));
    }

    #[tokio::test]
    async fn test_register_invalid_password() {
        let service = test_service();

        let result = service.register(registration("ada@example.com", "short")).await;
        assert!(matches!(result, Err(DomainError::InvalidUser(_))));
    }

    #[tokio::test]
    async fn test_register_blank_name() {
        let service = test_service();
        let mut request = registration("ada@example.com", "secure_password123");
        request.name = "  ".to_string();

        let result = service.register(request).await;
        assert!(matches!(result, Err(DomainError::InvalidUser(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = test_service();

        service
            .register(registration("ada@example.com", "secure_password123"))
            .await
            .unwrap();

        let result = service
            .register(registration("ada@example.com", "another_password"))
            .await;
        assert!(matches!(result, Err(DomainError::EmailTaken { .. })));
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let service = test_service();

        let first = service
            .ensure(registration("ada@example.com", "secure_password123"))
            .await
            .unwrap();
        let second = service
            .ensure(registration("ada@example.com", "secure_password123"))
            .await
            .unwrap();

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_import_prehashed_user() {
        let service = test_service();
        let hash = Argon2Hasher::new().hash("secure_password123").unwrap();
        let user = User::new("Ada", "Lovelace", "ada@example.com", hash);

        assert!(service.import(user.clone()).await.unwrap().is_some());
        assert!(service.import(user.clone()).await.unwrap().is_none());

        let stored = service.get_by_email("ada@example.com").await.unwrap().unwrap();
        assert!(service.verify_secret(&stored, "secure_password123"));
    }

    #[tokio::test]
    async fn test_verifier_lookup_and_secret() {
        let service = test_service();
        service
            .register(registration("ada@example.com", "secure_password123"))
            .await
            .unwrap();

        let user = service
            .lookup_by_identifier("ada@example.com")
            .await
            .unwrap()
            .unwrap();

        assert!(service.verify_secret(&user, "secure_password123"));
        assert!(!service.verify_secret(&user, "wrong_password"));
        assert!(service
            .lookup_by_identifier("nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_get_with_invalid_id() {
        let service = test_service();

        let result = service.get("not-a-uuid").await;
        assert!(matches!(
            result,
            Err(DomainError::InvalidUser(UserValidationError::InvalidId(_)))
        ));
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let service = test_service();
        let user = service
            .register(registration("ada@example.com", "secure_password123"))
            .await
            .unwrap();
        let id = user.id().to_string();

        assert_eq!(service.get(&id).await.unwrap(), Some(user));
        assert!(service.delete(&id).await.unwrap());
        assert!(service.get(&id).await.unwrap().is_none());
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_propagates_storage_errors() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_get_by_email()
            .returning(|_| Err(DomainError::storage("connection refused")));
        let service = UserService::new(Arc::new(repository), Arc::new(Argon2Hasher::new()));

        let result = service.lookup_by_identifier("ada@example.com").await;
        assert!(matches!(result, Err(DomainError::Storage(_))));
    }
}
