//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use sea_orm::{DbErr, SqlErr};

use crate::models::InvalidChoice;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Row not found, named by entity
    #[error("{0} not found")]
    NotFound(&'static str),
    /// Rejected input
    #[error("Validation error: {0}")]
    Validation(String),
    /// Unique constraint violation
    #[error("Duplicate value: {0}")]
    Duplicate(String),
    /// Unknown agent or wrong password
    #[error("Invalid credential")]
    InvalidCredential,
    /// Database/persistence error
    #[error("Database error: {0}")]
    Database(String),
    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, DomainError::Duplicate(_))
    }
}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => DomainError::Duplicate(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                DomainError::Validation(format!("unknown reference: {}", msg))
            }
            _ => match e {
                DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => {
                    DomainError::NotFound("record")
                }
                other => DomainError::Database(other.to_string()),
            },
        }
    }
}

impl From<InvalidChoice> for DomainError {
    fn from(e: InvalidChoice) -> Self {
        DomainError::Validation(e.to_string())
    }
}
