//! todo-auth
//!
//! Stateless bearer-token authentication for the todo backend:
//! - HS256 token issuance with strict canonical decoding
//! - Per-request authentication that reloads the principal from the user store
//! - Path-based access policy separating public and protected routes
//! - In-memory or PostgreSQL user storage with Argon2 password hashes

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use api::state::AppState;
use crate::config::{SeedUser, StorageBackend};
use domain::{User, UserRepository};
use infrastructure::auth::{
    AccessPolicy, Authenticator, PublicRule, SigningKey, TokenCodec, TokenService,
};
use infrastructure::user::{
    Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, Registration, UserService,
};

/// Create the application state from configuration
///
/// Fails when the signing key is missing or too short, when the token
/// TTL is out of range, or when the configured store cannot be reached.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let key = SigningKey::from_secret(config.auth.resolve_secret().as_deref())
        .context("Invalid token signing configuration")?;
    info!(fingerprint = %key.fingerprint(), "Loaded token signing key");

    let ttl = token_ttl(config.auth.token_ttl_seconds)?;
    let tokens = Arc::new(TokenService::new(TokenCodec::new(key), ttl));

    let mut access_policy = AccessPolicy::default();
    if config.observability.metrics.enabled {
        access_policy =
            access_policy.with_rule(PublicRule::exact(config.observability.metrics.route()));
    }

    let lookup_timeout = lookup_timeout(config.auth.lookup_timeout_ms)?;

    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory user store");
            let repository = Arc::new(InMemoryUserRepository::new());
            build_state(repository, tokens, lookup_timeout, access_policy, &config.seed_users).await
        }
        StorageBackend::Postgres => {
            let url = config.storage.resolve_database_url().context(
                "storage.backend is postgres but no database URL is configured \
                 (storage.database_url or DATABASE_URL)",
            )?;

            let pool = PgPoolOptions::new()
                .max_connections(config.storage.max_connections)
                .connect(&url)
                .await
                .context("Failed to connect to PostgreSQL")?;

            let repository = Arc::new(PostgresUserRepository::new(pool));
            repository.ensure_schema().await?;
            info!("Using PostgreSQL user store");

            build_state(repository, tokens, lookup_timeout, access_policy, &config.seed_users).await
        }
    }
}

async fn build_state<R>(
    repository: Arc<R>,
    tokens: Arc<TokenService>,
    lookup_timeout: Duration,
    access_policy: AccessPolicy,
    seed_users: &[SeedUser],
) -> anyhow::Result<AppState>
where
    R: UserRepository + 'static,
{
    let user_service = Arc::new(UserService::new(repository, Arc::new(Argon2Hasher::new())));

    seed(&user_service, seed_users).await?;

    let authenticator =
        Authenticator::new(tokens, user_service.clone()).with_lookup_timeout(lookup_timeout);

    Ok(AppState::new(
        user_service,
        Arc::new(authenticator),
        Arc::new(access_policy),
    ))
}

fn token_ttl(seconds: u64) -> anyhow::Result<chrono::Duration> {
    if seconds == 0 {
        anyhow::bail!("auth.token_ttl_seconds must be greater than zero");
    }

    i64::try_from(seconds)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .with_context(|| format!("auth.token_ttl_seconds {} is out of range", seconds))
}

fn lookup_timeout(millis: u64) -> anyhow::Result<Duration> {
    if millis == 0 {
        anyhow::bail!("auth.lookup_timeout_ms must be greater than zero");
    }

    Ok(Duration::from_millis(millis))
}

/// Create configured users that do not exist yet
async fn seed<R>(
    service: &UserService<R, Argon2Hasher>,
    seed_users: &[SeedUser],
) -> anyhow::Result<()>
where
    R: UserRepository + 'static,
{
    for seed_user in seed_users {
        let created = match (&seed_user.password_hash, &seed_user.password) {
            (Some(hash), None) => {
                service
                    .import(User::new(
                        seed_user.name.as_str(),
                        seed_user.surname.as_str(),
                        seed_user.email.as_str(),
                        hash.as_str(),
                    ))
                    .await?
            }
            (None, Some(password)) => {
                service
                    .ensure(Registration {
                        name: seed_user.name.clone(),
                        surname: seed_user.surname.clone(),
                        email: seed_user.email.clone(),
                        password: password.clone(),
                    })
                    .await?
            }
            _ => anyhow::bail!(
                "Seed user '{}' needs exactly one of password or password_hash",
                seed_user.email
            ),
        };

        match created {
            Some(user) => info!(email = %user.email(), "Seeded user"),
            None => info!(email = %seed_user.email, "Seed user already exists"),
        }
    }

    Ok(())
}
