//! Authentication domain
//!
//! Claims, the error taxonomy, the per-request outcome and the seams
//! (clock, credential verifier) the token layer depends on.

mod claims;
mod clock;
mod error;
mod outcome;
mod verifier;

pub use claims::{ClaimError, Claims, RESERVED_CLAIMS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::AuthError;
pub use outcome::AuthenticationOutcome;
pub use verifier::CredentialVerifier;

#[cfg(test)]
pub use verifier::MockCredentialVerifier;
