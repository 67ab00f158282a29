//! The module contains the errors the engine can throw.
//!
//! The variants mirror the outcomes of the reservation lifecycle:
//!
//! - [`Validation`] for malformed caller input, raised before any store access.
//! - [`NotFound`] when a referenced parcel/reservation/payment is absent.
//! - [`Conflict`] when a state-machine precondition fails (parcel already
//!   reserved, reservation already cancelled, no installments remaining).
//! - [`Unauthorized`] for failed admin credential checks.
//! - [`Database`] wraps the underlying store error; raising it inside a
//!   transaction scope rolls the transaction back.
//!
//! [`Validation`]: EngineError::Validation
//! [`NotFound`]: EngineError::NotFound
//! [`Conflict`]: EngineError::Conflict
//! [`Unauthorized`]: EngineError::Unauthorized
//! [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
