//! Infrastructure layer - token machinery, user storage and observability

pub mod auth;
pub mod observability;
pub mod user;
