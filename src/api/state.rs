//! Shared application state

use std::sync::Arc;

use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::{AccessPolicy, Authenticator};
use crate::infrastructure::user::{PasswordHasher, Registration, UserService};

/// Application state handed to every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserDirectory>,
    pub authenticator: Arc<Authenticator>,
    pub access_policy: Arc<AccessPolicy>,
}

impl AppState {
    pub fn new(
        user_service: Arc<dyn UserDirectory>,
        authenticator: Arc<Authenticator>,
        access_policy: Arc<AccessPolicy>,
    ) -> Self {
        Self {
            user_service,
            authenticator,
            access_policy,
        }
    }
}

/// User operations exposed to handlers
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    async fn register(&self, request: Registration) -> Result<User, DomainError>;
    async fn get(&self, id: &str) -> Result<Option<User>, DomainError>;
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    async fn list(&self) -> Result<Vec<User>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;
}

#[async_trait::async_trait]
impl<R, H> UserDirectory for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(&self, request: Registration) -> Result<User, DomainError> {
        UserService::register(self, request).await
    }

    async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        UserService::get_by_email(self, email).await
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        UserService::list(self).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        UserService::delete(self, id).await
    }
}
