use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::auth::models::AuthenticatedIdentity;
use crate::book::models::BookId;
use crate::borrow::errors::BorrowError;
use crate::borrow::models::Borrow;
use crate::borrow::models::BorrowId;
use crate::principal::models::PrincipalId;

/// Port for lending operations.
#[async_trait]
pub trait BorrowServicePort: Send + Sync + 'static {
    /// Lend one copy of a book.
    ///
    /// # Errors
    /// * `PrincipalNotFound` - Borrower does not exist
    /// * `Book(NotFound)` - Book does not exist
    /// * `Book(OutOfStock)` - No copies left
    async fn borrow_book(
        &self,
        principal_id: &PrincipalId,
        book_id: &BookId,
        now: DateTime<Utc>,
    ) -> Result<Borrow, BorrowError>;

    /// Take a lent copy back on behalf of `caller`.
    ///
    /// # Errors
    /// * `NotFound` - Borrow record does not exist
    /// * `NotBorrower` - Caller is neither the borrower nor an admin
    /// * `AlreadyReturned` - Copy was already returned
    async fn return_book(
        &self,
        id: &BorrowId,
        caller: &AuthenticatedIdentity,
        now: DateTime<Utc>,
    ) -> Result<Borrow, BorrowError>;

    async fn list_borrows(&self) -> Result<Vec<Borrow>, BorrowError>;

    async fn borrows_by_principal(
        &self,
        principal_id: &PrincipalId,
    ) -> Result<Vec<Borrow>, BorrowError>;

    async fn borrows_by_book(&self, book_id: &BookId) -> Result<Vec<Borrow>, BorrowError>;
}

/// Persistence operations for borrow records.
#[async_trait]
pub trait BorrowRepository: Send + Sync + 'static {
    async fn create(&self, borrow: Borrow) -> Result<Borrow, BorrowError>;

    async fn find_by_id(&self, id: &BorrowId) -> Result<Option<Borrow>, BorrowError>;

    async fn list_all(&self) -> Result<Vec<Borrow>, BorrowError>;

    async fn find_by_principal(
        &self,
        principal_id: &PrincipalId,
    ) -> Result<Vec<Borrow>, BorrowError>;

    async fn find_by_book(&self, book_id: &BookId) -> Result<Vec<Borrow>, BorrowError>;

    /// # Errors
    /// * `NotFound` - Borrow record does not exist
    async fn update(&self, borrow: Borrow) -> Result<Borrow, BorrowError>;
}
