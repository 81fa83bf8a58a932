use thiserror::Error;

use crate::book::errors::BookError;
use crate::principal::errors::PrincipalError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BorrowIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Error)]
pub enum BorrowError {
    #[error("Invalid borrow ID: {0}")]
    InvalidBorrowId(#[from] BorrowIdError),

    #[error("Borrow record not found: {0}")]
    NotFound(String),

    #[error("Borrow record {0} has already been returned")]
    AlreadyReturned(String),

    #[error("Borrow record {0} belongs to another principal")]
    NotBorrower(String),

    #[error("Principal not found: {0}")]
    PrincipalNotFound(String),

    #[error(transparent)]
    Book(#[from] BookError),

    #[error("Principal lookup failed: {0}")]
    Principal(#[from] PrincipalError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
