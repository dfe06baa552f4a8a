//! Authentication infrastructure module
//!
//! Signing key, HS256 token codec, token service, the bearer-token
//! authenticator and the path access policy.

mod authenticator;
mod codec;
mod key;
mod policy;
mod service;

pub use authenticator::{
    bearer_token, Authenticator, LoginResult, BEARER_PREFIX, DEFAULT_LOOKUP_TIMEOUT,
};
pub use codec::{TokenCodec, ALGORITHM};
pub use key::{SigningKey, MIN_KEY_LENGTH};
pub use policy::{Access, AccessPolicy, PathPattern, PublicRule};
pub use service::{IssuedToken, TokenService, DEFAULT_TOKEN_TTL_SECONDS};
