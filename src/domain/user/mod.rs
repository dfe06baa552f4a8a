//! User domain
//!
//! The principal type the authentication core operates on, its validation
//! rules and the storage trait behind it.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId};
pub use repository::UserRepository;
pub use validation::{validate_email, validate_name, validate_password, UserValidationError};

#[cfg(test)]
pub use repository::MockUserRepository;
