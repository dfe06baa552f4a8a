//! Token claim set

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Claim names managed by the token layer itself
pub const RESERVED_CLAIMS: [&str; 3] = ["sub", "iat", "exp"];

/// Errors when adding application claims
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClaimError {
    #[error("Claim '{0}' is reserved")]
    Reserved(String),

    #[error("Claim '{0}' must be a scalar value")]
    NotScalar(String),
}

/// Claims carried inside a token
///
/// `sub`, `iat` and `exp` are always present. Application claims live in a
/// key-sorted map next to them and are informational only: authorization
/// decisions must reload the principal from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the principal's login identifier
    #[serde(rename = "sub")]
    subject: String,
    /// Issued at timestamp (Unix epoch seconds)
    #[serde(rename = "iat")]
    issued_at: i64,
    /// Expiration timestamp (Unix epoch seconds)
    #[serde(rename = "exp")]
    expires_at: i64,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Claims {
    /// Create claims for `subject` valid between `issued_at` and `expires_at`
    pub fn new(subject: impl Into<String>, issued_at: i64, expires_at: i64) -> Self {
        Self {
            subject: subject.into(),
            issued_at,
            expires_at,
            extra: Map::new(),
        }
    }

    /// Create claims from wall-clock instants (truncated to whole seconds)
    pub fn for_period(
        subject: impl Into<String>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self::new(subject, issued_at.timestamp(), expires_at.timestamp())
    }

    /// Add an application claim
    pub fn with_claim(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, ClaimError> {
        let key = key.into();
        let value = value.into();

        if RESERVED_CLAIMS.contains(&key.as_str()) {
            return Err(ClaimError::Reserved(key));
        }

        if value.is_array() || value.is_object() {
            return Err(ClaimError::NotScalar(key));
        }

        self.extra.insert(key, value);
        Ok(self)
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn issued_at(&self) -> i64 {
        self.issued_at
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Look up an application claim
    pub fn claim(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// All application claims, sorted by key
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Whether the claims are expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expires_at
    }
}
