//! Bearer token authentication and the login flow

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use super::service::{IssuedToken, TokenService};
use crate::domain::auth::{AuthError, AuthenticationOutcome, CredentialVerifier};
use crate::domain::user::User;
use crate::infrastructure::observability::{record_login, record_token_validation};

/// Scheme prefix expected in the Authorization header
pub const BEARER_PREFIX: &str = "Bearer ";

/// Default upper bound for a principal lookup
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// Argon2id hash at the default cost that no secret matches; checked
/// against when the identifier is unknown so both rejections cost the same
const DECOY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$wB5s6lHAvXdSDr1ciDmFjA$jyNnHCc58asaZ2fITvtlWA+kxcp0SLl1qIFcuJ/0eNk";

/// Successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub principal: User,
    pub issued: IssuedToken,
}

/// Pull the token out of an `Authorization` header value
///
/// Returns `None` when the header is absent, lacks the `Bearer ` prefix or
/// carries nothing after it.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let token = header?.strip_prefix(BEARER_PREFIX)?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Resolves bearer tokens to principals and exchanges credentials for tokens
#[derive(Clone)]
pub struct Authenticator {
    tokens: Arc<TokenService>,
    verifier: Arc<dyn CredentialVerifier>,
    lookup_timeout: Duration,
}

impl Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("tokens", &self.tokens)
            .field("lookup_timeout", &self.lookup_timeout)
            .finish()
    }
}

impl Authenticator {
    pub fn new(tokens: Arc<TokenService>, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            tokens,
            verifier,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn lookup_timeout(&self) -> Duration {
        self.lookup_timeout
    }

    /// Authenticate a request from its raw `Authorization` header
    ///
    /// Never fails: every problem becomes `Unauthenticated` with a reason.
    pub async fn authenticate_header(&self, header: Option<&str>) -> AuthenticationOutcome {
        let Some(token) = bearer_token(header) else {
            return AuthenticationOutcome::Unauthenticated(AuthError::MissingOrMalformedHeader);
        };

        let result = self.authenticate_token(token).await;

        match &result {
            Ok(principal) => {
                record_token_validation("authenticated");
                tracing::debug!(subject = %principal.email(), "Request authenticated");
            }
            Err(e) if e.is_infrastructure() => {
                record_token_validation(e.kind());
                tracing::warn!(error = %e, "Token authentication failed on infrastructure fault");
            }
            Err(e) => {
                record_token_validation(e.kind());
                tracing::debug!(error = %e, kind = e.kind(), "Token rejected");
            }
        }

        AuthenticationOutcome::from(result)
    }

    /// Resolve a bare token to its principal
    ///
    /// Reads the subject, reloads the principal from the store and then runs
    /// full validation against the stored identifier.
    pub async fn authenticate_token(&self, token: &str) -> Result<User, AuthError> {
        let identifier = self.tokens.extract_identifier(token)?;

        let principal = self
            .lookup(&identifier)
            .await?
            .ok_or(AuthError::UnknownPrincipal)?;

        self.tokens.validate(token, principal.email())?;

        Ok(principal)
    }

    /// Exchange an identifier and secret for a token
    ///
    /// Unknown identifier and wrong secret are indistinguishable to the caller.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<LoginResult, AuthError> {
        let result = self.try_login(identifier, secret).await;

        match &result {
            Ok(login) => {
                record_login("success");
                tracing::info!(subject = %login.principal.email(), "Login succeeded");
            }
            Err(e) => {
                record_login(e.kind());
                if e.is_infrastructure() {
                    tracing::warn!(error = %e, "Login failed on infrastructure fault");
                } else {
                    tracing::info!(kind = e.kind(), "Login rejected");
                }
            }
        }

        result
    }

    async fn try_login(&self, identifier: &str, secret: &str) -> Result<LoginResult, AuthError> {
        let Some(principal) = self.lookup(identifier).await? else {
            let decoy = User::new("", "", identifier, DECOY_PASSWORD_HASH);
            self.check_secret(decoy, secret).await?;
            return Err(AuthError::InvalidCredentials);
        };

        let (principal, matches) = self.check_secret(principal, secret).await?;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.tokens.issue(&principal)?;

        Ok(LoginResult { principal, issued })
    }

    /// Run the slow secret comparison off the async workers
    async fn check_secret(&self, principal: User, secret: &str) -> Result<(User, bool), AuthError> {
        let verifier = Arc::clone(&self.verifier);
        let secret = secret.to_owned();

        tokio::task::spawn_blocking(move || {
            let matches = verifier.verify_secret(&principal, &secret);
            (principal, matches)
        })
        .await
        .map_err(|e| AuthError::backing_store(format!("secret check aborted: {}", e)))
    }

    async fn lookup(&self, identifier: &str) -> Result<Option<User>, AuthError> {
        match tokio::time::timeout(
            self.lookup_timeout,
            self.verifier.lookup_by_identifier(identifier),
        )
        .await
        {
            Ok(Ok(principal)) => Ok(principal),
            Ok(Err(e)) => Err(AuthError::backing_store(e.to_string())),
            Err(_) => Err(AuthError::backing_store(format!(
                "principal lookup timed out after {}ms",
                self.lookup_timeout.as_millis()
            ))),
        }
    }
}
