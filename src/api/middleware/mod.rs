//! API middleware components
//!
//! Layer order, outermost first: request id, trace, metrics, security
//! headers, path validation, authentication, logging, access policy.

pub mod access_policy;
pub mod authentication;
pub mod logging;
pub mod metrics;
pub mod security;

pub use access_policy::access_policy_middleware;
pub use authentication::{authentication_middleware, authorization_header, CurrentUser};
pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use security::{path_validation_middleware, security_headers_middleware};
