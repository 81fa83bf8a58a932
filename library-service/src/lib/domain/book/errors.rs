use thiserror::Error;

/// Error for BookId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BookIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Error)]
pub enum BookError {
    #[error("Invalid book ID: {0}")]
    InvalidBookId(#[from] BookIdError),

    #[error("Invalid book: {0}")]
    InvalidBook(String),

    #[error("Book not found: {0}")]
    NotFound(String),

    #[error("The book \"{0}\" is out of stock")]
    OutOfStock(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
