//! Domain layer - Business abstractions
//!
//! Repository traits, domain error types and input validation.
//! Implementations live in the infrastructure layer.

pub mod errors;
pub mod repositories;
pub mod validation;

pub use errors::DomainError;
pub use repositories::*;
