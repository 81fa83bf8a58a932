use std::fmt;

use uuid::Uuid;

use crate::book::errors::BookError;
use crate::book::errors::BookIdError;

/// Catalogue entry with its available stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    pub author: String,
    pub genre: String,
    pub copies: i32,
}

impl Book {
    /// Take one copy out of stock.
    ///
    /// # Errors
    /// * `OutOfStock` - No copies left
    pub fn borrow_copy(&mut self) -> Result<(), BookError> {
        if self.copies <= 0 {
            return Err(BookError::OutOfStock(self.name.clone()));
        }
        self.copies -= 1;
        Ok(())
    }

    /// Put one copy back into stock.
    pub fn return_copy(&mut self) {
        self.copies += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BookId(pub Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, BookIdError> {
        Uuid::parse_str(s)
            .map(BookId)
            .map_err(|e| BookIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated book fields, used for both creation and full updates.
#[derive(Debug, Clone)]
pub struct BookDetails {
    pub name: String,
    pub author: String,
    pub genre: String,
    pub copies: i32,
}

impl BookDetails {
    /// # Errors
    /// * `InvalidBook` - Blank name or author, or negative stock
    pub fn new(name: String, author: String, genre: String, copies: i32) -> Result<Self, BookError> {
        if name.trim().is_empty() {
            return Err(BookError::InvalidBook("name must not be empty".to_string()));
        }
        if author.trim().is_empty() {
            return Err(BookError::InvalidBook(
                "author must not be empty".to_string(),
            ));
        }
        if copies < 0 {
            return Err(BookError::InvalidBook(format!(
                "copies must not be negative, got {}",
                copies
            )));
        }

        Ok(Self {
            name: name.trim().to_string(),
            author: author.trim().to_string(),
            genre: genre.trim().to_string(),
            copies,
        })
    }
}
