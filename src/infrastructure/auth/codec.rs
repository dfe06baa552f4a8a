//! Compact HS256 token codec
//!
//! Wire format: `base64url(header).base64url(payload).base64url(signature)`,
//! every segment without padding. Tokens are plain HS256 JWTs.

use base64::{
    alphabet,
    engine::{general_purpose::URL_SAFE_NO_PAD, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use hmac::Mac;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::key::SigningKey;
use crate::domain::auth::{AuthError, Claims};

/// Algorithm identifier written to and required in every header
pub const ALGORITHM: &str = "HS256";

const TOKEN_TYPE: &str = "JWT";

/// Accepts padded input and non-zero trailing bits. Only used to read the
/// signature before the canonical comparison in [`canonical_signature`].
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

/// Encodes claims into signed tokens and back
#[derive(Debug, Clone)]
pub struct TokenCodec {
    key: SigningKey,
    encoded_header: String,
}

impl TokenCodec {
    pub fn new(key: SigningKey) -> Self {
        let header = TokenHeader {
            alg: ALGORITHM.to_string(),
            typ: Some(TOKEN_TYPE.to_string()),
        };
        // A two-string struct always serializes
        let header_json = serde_json::to_vec(&header).unwrap_or_default();

        Self {
            key,
            encoded_header: URL_SAFE_NO_PAD.encode(header_json),
        }
    }

    /// Serialize and sign `claims`
    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        let payload = serde_json::to_vec(claims).map_err(|e| AuthError::encoding(e.to_string()))?;
        let signing_input = format!("{}.{}", self.encoded_header, URL_SAFE_NO_PAD.encode(payload));
        let signature = self.sign(signing_input.as_bytes());

        Ok(format!(
            "{}.{}",
            signing_input,
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    /// Verify and deserialize a token
    ///
    /// Order: segment count, canonical signature form, HMAC, header, payload.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let segments: Vec<&str> = token.split('.').collect();

        let [header, payload, signature] = segments.as_slice() else {
            return Err(AuthError::malformed(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        };

        let signature = canonical_signature(signature)?;
        self.verify(header, payload, &signature)?;

        let header: TokenHeader = decode_segment(header, "header")?;
        if header.alg != ALGORITHM {
            return Err(AuthError::malformed(format!(
                "unsupported algorithm '{}'",
                header.alg
            )));
        }

        decode_segment(payload, "payload")
    }

    fn sign(&self, input: &[u8]) -> Vec<u8> {
        let mut mac = self.key.mac();
        mac.update(input);
        mac.finalize().into_bytes().to_vec()
    }

    fn verify(&self, header: &str, payload: &str, signature: &[u8]) -> Result<(), AuthError> {
        let mut mac = self.key.mac();
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.verify_slice(signature)
            .map_err(|_| AuthError::InvalidSignature)
    }
}

/// Decode the signature segment, rejecting any non-canonical spelling
///
/// Base64 padding characters and the unused low bits of the last symbol do
/// not change the decoded bytes, so several strings map to one signature.
/// Only the unpadded, zero-trailing-bit form is accepted.
fn canonical_signature(segment: &str) -> Result<Vec<u8>, AuthError> {
    let bytes = LENIENT_URL_SAFE
        .decode(segment)
        .map_err(|e| AuthError::malformed(format!("signature is not base64url: {}", e)))?;

    if URL_SAFE_NO_PAD.encode(&bytes) != segment {
        return Err(AuthError::InvalidSignature);
    }

    Ok(bytes)
}

fn decode_segment<T: DeserializeOwned>(segment: &str, name: &str) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| AuthError::malformed(format!("{} is not base64url: {}", name, e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::malformed(format!("{} is not valid JSON: {}", name, e)))
}
