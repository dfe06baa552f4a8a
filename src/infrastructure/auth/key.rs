//! Signing key material

use std::fmt::Debug;
use std::sync::Arc;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::domain::DomainError;

pub(crate) type HmacSha256 = Hmac<Sha256>;

/// Minimum key length for HMAC-SHA-256 (256 bits)
pub const MIN_KEY_LENGTH: usize = 32;

/// Immutable symmetric key shared by all token operations
///
/// Loaded once at startup. Rotating it invalidates every token issued
/// under the previous key.
#[derive(Clone)]
pub struct SigningKey {
    bytes: Arc<[u8]>,
    mac: HmacSha256,
    fingerprint: String,
}

impl SigningKey {
    /// Create a key from raw bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, DomainError> {
        let bytes: Vec<u8> = bytes.into();

        if bytes.is_empty() {
            return Err(DomainError::configuration("Signing key is empty"));
        }

        if bytes.len() < MIN_KEY_LENGTH {
            return Err(DomainError::configuration(format!(
                "Signing key must be at least {} bytes, got {}",
                MIN_KEY_LENGTH,
                bytes.len()
            )));
        }

        let mac = HmacSha256::new_from_slice(&bytes)
            .map_err(|e| DomainError::configuration(format!("Invalid signing key: {}", e)))?;
        let digest = Sha256::digest(&bytes);

        Ok(Self {
            bytes: bytes.into(),
            mac,
            fingerprint: hex::encode(&digest[..4]),
        })
    }

    /// Create a key from a configured secret; absence is a startup error
    pub fn from_secret(secret: Option<&str>) -> Result<Self, DomainError> {
        let secret = secret.ok_or_else(|| {
            DomainError::configuration(
                "Signing key is not configured. Set auth.jwt_secret (APP__AUTH__JWT_SECRET) or JWT_SECRET",
            )
        })?;

        Self::new(secret.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Short non-reversible identifier, safe to log
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Fresh keyed MAC instance
    pub(crate) fn mac(&self) -> HmacSha256 {
        self.mac.clone()
    }
}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("fingerprint", &self.fingerprint)
            .field("bytes", &"[hidden]")
            .finish()
    }
}
