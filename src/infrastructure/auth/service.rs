//! Token issuance and validation

use std::fmt::Debug;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::codec::TokenCodec;
use crate::domain::auth::{AuthError, Claims, Clock, SystemClock};
use crate::domain::user::User;

/// Default token lifetime (24 hours)
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 86_400;

/// A freshly signed token and the instant it stops being valid
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues tokens for principals and checks presented tokens
#[derive(Clone)]
pub struct TokenService {
    codec: TokenCodec,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("codec", &self.codec)
            .field("ttl_seconds", &self.ttl.num_seconds())
            .finish()
    }
}

impl TokenService {
    /// Create a service on the system clock
    pub fn new(codec: TokenCodec, ttl: Duration) -> Self {
        Self {
            codec,
            ttl,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token for `principal`, valid for the configured TTL
    ///
    /// The subject is the principal's email. `id`, `name`, `surname` and
    /// `email` ride along as informational claims.
    pub fn issue(&self, principal: &User) -> Result<IssuedToken, AuthError> {
        let issued_at = self.clock.now();
        let expires_at = issued_at + self.ttl;

        let claims = Claims::for_period(principal.email(), issued_at, expires_at)
            .with_claim("id", principal.id().to_string())
            .and_then(|c| c.with_claim("name", principal.name()))
            .and_then(|c| c.with_claim("surname", principal.surname()))
            .and_then(|c| c.with_claim("email", principal.email()))
            .map_err(|e| AuthError::encoding(e.to_string()))?;

        let token = self.codec.encode(&claims)?;

        tracing::debug!(
            subject = %principal.email(),
            expires_at = %expires_at,
            "Issued token"
        );

        Ok(IssuedToken {
            token,
            // exp is stored in whole seconds
            expires_at: DateTime::from_timestamp(claims.expires_at(), 0).unwrap_or(expires_at),
        })
    }

    /// Check signature, expiry and subject binding
    pub fn validate(&self, token: &str, expected_identifier: &str) -> Result<Claims, AuthError> {
        let claims = self.codec.decode(token)?;

        if claims.is_expired_at(self.clock.now()) {
            return Err(AuthError::ExpiredToken);
        }

        if claims.subject() != expected_identifier {
            return Err(AuthError::SubjectMismatch);
        }

        Ok(claims)
    }

    /// Read the subject of a correctly signed token
    ///
    /// Expiry and subject binding are not checked here.
    pub fn extract_identifier(&self, token: &str) -> Result<String, AuthError> {
        self.codec
            .decode(token)
            .map(|claims| claims.subject().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::ManualClock;
    use crate::infrastructure::auth::SigningKey;

    const SECRET: &str = "test-signing-key-0123456789abcdefghij";

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn service_with_clock(ttl: Duration) -> (TokenService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let codec = TokenCodec::new(SigningKey::new(SECRET).unwrap());
        let service = TokenService::new(codec, ttl).with_clock(clock.clone());
        (service, clock)
    }

    fn user(email: &str) -> User {
        User::new("Ada", "Lovelace", email, "hash")
    }

    #[test]
    fn test_issue_sets_claims() {
        let (service, _) = service_with_clock(Duration::hours(1));
        let principal = user("u@example.com");

        let issued = service.issue(&principal).unwrap();
        let claims = service.validate(&issued.token, "u@example.com").unwrap();

        assert_eq!(claims.subject(), "u@example.com");
        assert_eq!(claims.issued_at(), start().timestamp());
        assert_eq!(claims.expires_at(), start().timestamp() + 3600);
        assert_eq!(issued.expires_at, start() + Duration::hours(1));
        assert_eq!(
            claims.claim("id").and_then(|v| v.as_str()),
            Some(principal.id().to_string().as_str())
        );
        assert_eq!(claims.claim("name").and_then(|v| v.as_str()), Some("Ada"));
        assert_eq!(claims.claim("surname").and_then(|v| v.as_str()), Some("Lovelace"));
        assert_eq!(
            claims.claim("email").and_then(|v| v.as_str()),
            Some("u@example.com")
        );
    }

    #[test]
    fn test_one_hour_token_lifecycle() {
        let (service, clock) = service_with_clock(Duration::hours(1));
        let issued = service.issue(&user("u@example.com")).unwrap();

        assert!(service.validate(&issued.token, "u@example.com").is_ok());
        assert_eq!(
            service.validate(&issued.token, "other@example.com"),
            Err(AuthError::SubjectMismatch)
        );

        clock.advance(Duration::hours(1) + Duration::seconds(1));
        assert_eq!(
            service.validate(&issued.token, "u@example.com"),
            Err(AuthError::ExpiredToken)
        );
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let (service, clock) = service_with_clock(Duration::seconds(60));
        let issued = service.issue(&user("u@example.com")).unwrap();

        clock.advance(Duration::seconds(59));
        assert!(service.validate(&issued.token, "u@example.com").is_ok());

        clock.advance(Duration::seconds(1));
        assert_eq!(
            service.validate(&issued.token, "u@example.com"),
            Err(AuthError::ExpiredToken)
        );
    }

    #[test]
    fn test_expired_wins_over_subject_mismatch() {
        let (service, clock) = service_with_clock(Duration::minutes(5));
        let issued = service.issue(&user("a@example.com")).unwrap();

        clock.advance(Duration::minutes(10));
        assert_eq!(
            service.validate(&issued.token, "b@example.com"),
            Err(AuthError::ExpiredToken)
        );
    }

    #[test]
    fn test_extract_identifier_ignores_expiry() {
        let (service, clock) = service_with_clock(Duration::minutes(1));
        let issued = service.issue(&user("u@example.com")).unwrap();

        clock.advance(Duration::days(30));
        assert_eq!(
            service.extract_identifier(&issued.token),
            Ok("u@example.com".to_string())
        );
    }

    #[test]
    fn test_extract_identifier_rejects_bad_tokens() {
        let (service, _) = service_with_clock(Duration::minutes(1));

        assert!(matches!(
            service.extract_identifier("not-a-token"),
            Err(AuthError::MalformedToken { .. })
        ));

        let issued = service.issue(&user("u@example.com")).unwrap();
        let other = TokenService::new(
            TokenCodec::new(SigningKey::new("another-signing-key-0123456789abcdef").unwrap()),
            Duration::minutes(1),
        );
        assert_eq!(
            other.extract_identifier(&issued.token),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_debug_omits_key() {
        let (service, _) = service_with_clock(Duration::hours(1));
        let debug = format!("{:?}", service);

        assert!(!debug.contains(SECRET));
        assert!(debug.contains("ttl_seconds: 3600"));
    }
}
