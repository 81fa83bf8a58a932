use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::auth::models::AuthenticatedIdentity;
use crate::book::errors::BookError;
use crate::book::models::BookId;
use crate::book::ports::BookRepository;
use crate::borrow::errors::BorrowError;
use crate::borrow::models::Borrow;
use crate::borrow::models::BorrowId;
use crate::borrow::ports::BorrowRepository;
use crate::borrow::ports::BorrowServicePort;
use crate::principal::models::PrincipalId;
use crate::principal::models::Role;
use crate::principal::ports::PrincipalStore;

/// Lending rules over books, borrow records and principals.
///
/// Stock is checked and written back without any locking.
pub struct BorrowService<BwR, BR, PS>
where
    BwR: BorrowRepository,
    BR: BookRepository,
    PS: PrincipalStore,
{
    borrows: Arc<BwR>,
    books: Arc<BR>,
    principals: Arc<PS>,
}

impl<BwR, BR, PS> BorrowService<BwR, BR, PS>
where
    BwR: BorrowRepository,
    BR: BookRepository,
    PS: PrincipalStore,
{
    pub fn new(borrows: Arc<BwR>, books: Arc<BR>, principals: Arc<PS>) -> Self {
        Self {
            borrows,
            books,
            principals,
        }
    }
}

#[async_trait]
impl<BwR, BR, PS> BorrowServicePort for BorrowService<BwR, BR, PS>
where
    BwR: BorrowRepository,
    BR: BookRepository,
    PS: PrincipalStore,
{
    async fn borrow_book(
        &self,
        principal_id: &PrincipalId,
        book_id: &BookId,
        now: DateTime<Utc>,
    ) -> Result<Borrow, BorrowError> {
        let principal = self
            .principals
            .find_by_id(principal_id)
            .await?
            .ok_or(BorrowError::PrincipalNotFound(principal_id.to_string()))?;

        let mut book = self
            .books
            .find_by_id(book_id)
            .await?
            .ok_or(BookError::NotFound(book_id.to_string()))?;

        book.borrow_copy()?;

        // The loan record goes first so a failed write never loses a copy.
        let borrow = self
            .borrows
            .create(Borrow::issue(book.id, principal.id, now))
            .await?;
        let book = self.books.update(book).await?;

        tracing::info!(
            borrow_id = %borrow.id,
            principal = %principal.username,
            book = %book.name,
            copies_left = book.copies,
            "Book borrowed"
        );

        Ok(borrow)
    }

    async fn return_book(
        &self,
        id: &BorrowId,
        caller: &AuthenticatedIdentity,
        now: DateTime<Utc>,
    ) -> Result<Borrow, BorrowError> {
        let mut borrow = self
            .borrows
            .find_by_id(id)
            .await?
            .ok_or(BorrowError::NotFound(id.to_string()))?;

        if borrow.principal_id != caller.principal_id && !caller.has_role(&Role::admin()) {
            return Err(BorrowError::NotBorrower(id.to_string()));
        }

        borrow.mark_returned(now)?;

        let mut book = self
            .books
            .find_by_id(&borrow.book_id)
            .await?
            .ok_or(BookError::NotFound(borrow.book_id.to_string()))?;

        let borrow = self.borrows.update(borrow).await?;
        book.return_copy();
        let book = self.books.update(book).await?;

        tracing::info!(
            borrow_id = %borrow.id,
            returned_by = %caller.username,
            copies_left = book.copies,
            "Book returned"
        );

        Ok(borrow)
    }

    async fn list_borrows(&self) -> Result<Vec<Borrow>, BorrowError> {
        self.borrows.list_all().await
    }

    async fn borrows_by_principal(
        &self,
        principal_id: &PrincipalId,
    ) -> Result<Vec<Borrow>, BorrowError> {
        self.borrows.find_by_principal(principal_id).await
    }

    async fn borrows_by_book(&self, book_id: &BookId) -> Result<Vec<Borrow>, BorrowError> {
        self.borrows.find_by_book(book_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Duration;
    use mockall::mock;
    use mockall::Sequence;

    use super::*;
    use crate::book::models::Book;
    use crate::principal::errors::PrincipalError;
    use crate::principal::models::Principal;
    use crate::principal::models::Username;

    mock! {
        pub TestBorrowRepository {}

        #[async_trait]
        impl BorrowRepository for TestBorrowRepository {
            async fn create(&self, borrow: Borrow) -> Result<Borrow, BorrowError>;
            async fn find_by_id(&self, id: &BorrowId) -> Result<Option<Borrow>, BorrowError>;
            async fn list_all(&self) -> Result<Vec<Borrow>, BorrowError>;
            async fn find_by_principal(&self, principal_id: &PrincipalId) -> Result<Vec<Borrow>, BorrowError>;
            async fn find_by_book(&self, book_id: &BookId) -> Result<Vec<Borrow>, BorrowError>;
            async fn update(&self, borrow: Borrow) -> Result<Borrow, BorrowError>;
        }
    }

    mock! {
        pub TestBookRepository {}

        #[async_trait]
        impl BookRepository for TestBookRepository {
            async fn create(&self, book: Book) -> Result<Book, BookError>;
            async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, BookError>;
            async fn list_all(&self) -> Result<Vec<Book>, BookError>;
            async fn update(&self, book: Book) -> Result<Book, BookError>;
            async fn delete(&self, id: &BookId) -> Result<(), BookError>;
        }
    }

    mock! {
        pub TestPrincipalStore {}

        #[async_trait]
        impl PrincipalStore for TestPrincipalStore {
            async fn find_by_username(&self, username: &Username) -> Result<Option<Principal>, PrincipalError>;
            async fn find_by_id(&self, id: &PrincipalId) -> Result<Option<Principal>, PrincipalError>;
        }
    }

    fn reader(id: PrincipalId) -> Principal {
        Principal {
            id,
            username: Username::new("reader".to_string()).unwrap(),
            name: "Test User".to_string(),
            password_hash: "$argon2id$test_hash".to_string(),
            roles: BTreeSet::from([Role::user()]),
            created_at: Utc::now(),
        }
    }

    fn caller(id: PrincipalId, roles: &[Role]) -> AuthenticatedIdentity {
        AuthenticatedIdentity {
            principal_id: id,
            username: Username::new("caller".to_string()).unwrap(),
            roles: roles.iter().cloned().collect(),
        }
    }

    fn book(id: BookId, copies: i32) -> Book {
        Book {
            id,
            name: "Test Book".to_string(),
            author: "Author".to_string(),
            genre: "Genre".to_string(),
            copies,
        }
    }

    fn principals_with(principal_id: PrincipalId) -> MockTestPrincipalStore {
        let mut principals = MockTestPrincipalStore::new();
        principals
            .expect_find_by_id()
            .returning(move |id| {
                if *id == principal_id {
                    Ok(Some(reader(*id)))
                } else {
                    Ok(None)
                }
            });
        principals
    }

    #[tokio::test]
    async fn test_borrow_book_decrements_stock() {
        let principal_id = PrincipalId::new();
        let book_id = BookId::new();
        let now = Utc::now();

        let mut sequence = Sequence::new();

        let mut books = MockTestBookRepository::new();
        books
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(book(book_id, 3))));

        let mut borrows = MockTestBorrowRepository::new();
        borrows
            .expect_create()
            .withf(move |borrow| {
                borrow.book_id == book_id
                    && borrow.principal_id == principal_id
                    && borrow.issued_at == now
                    && borrow.due_at == now + Duration::days(7)
            })
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|borrow| Ok(borrow));

        books
            .expect_update()
            .withf(|book| book.copies == 2)
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|book| Ok(book));

        let service = BorrowService::new(
            Arc::new(borrows),
            Arc::new(books),
            Arc::new(principals_with(principal_id)),
        );

        let borrow = service
            .borrow_book(&principal_id, &book_id, now)
            .await
            .expect("Borrow failed");
        assert!(borrow.returned_at.is_none());
    }

    #[tokio::test]
    async fn test_borrow_book_out_of_stock() {
        let principal_id = PrincipalId::new();
        let book_id = BookId::new();

        let mut books = MockTestBookRepository::new();
        books
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(book(book_id, 0))));
        books.expect_update().times(0);

        let mut borrows = MockTestBorrowRepository::new();
        borrows.expect_create().times(0);

        let service = BorrowService::new(
            Arc::new(borrows),
            Arc::new(books),
            Arc::new(principals_with(principal_id)),
        );

        let result = service.borrow_book(&principal_id, &book_id, Utc::now()).await;
        assert!(matches!(
            result,
            Err(BorrowError::Book(BookError::OutOfStock(_)))
        ));
    }

    #[tokio::test]
    async fn test_borrow_book_unknown_principal() {
        let mut books = MockTestBookRepository::new();
        books.expect_find_by_id().times(0);

        let service = BorrowService::new(
            Arc::new(MockTestBorrowRepository::new()),
            Arc::new(books),
            Arc::new(principals_with(PrincipalId::new())),
        );

        let result = service
            .borrow_book(&PrincipalId::new(), &BookId::new(), Utc::now())
            .await;
        assert!(matches!(result, Err(BorrowError::PrincipalNotFound(_))));
    }

    #[tokio::test]
    async fn test_return_book_increments_stock() {
        let book_id = BookId::new();
        let issued = Utc::now() - Duration::days(2);
        let borrower = PrincipalId::new();
        let existing = Borrow::issue(book_id, borrower, issued);
        let borrow_id = existing.id;
        let now = Utc::now();

        let mut borrows = MockTestBorrowRepository::new();
        borrows
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        borrows
            .expect_update()
            .withf(move |borrow| borrow.returned_at == Some(now))
            .times(1)
            .returning(|borrow| Ok(borrow));

        let mut books = MockTestBookRepository::new();
        books
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(book(book_id, 3))));
        books
            .expect_update()
            .withf(|book| book.copies == 4)
            .times(1)
            .returning(|book| Ok(book));

        let service = BorrowService::new(
            Arc::new(borrows),
            Arc::new(books),
            Arc::new(MockTestPrincipalStore::new()),
        );

        let borrow = service
            .return_book(&borrow_id, &caller(borrower, &[Role::user()]), now)
            .await
            .unwrap();
        assert_eq!(borrow.id, borrow_id);
        assert_eq!(borrow.returned_at, Some(now));
    }

    #[tokio::test]
    async fn test_return_book_twice_is_rejected() {
        let borrower = PrincipalId::new();
        let mut existing = Borrow::issue(BookId::new(), borrower, Utc::now());
        existing.returned_at = Some(Utc::now());
        let borrow_id = existing.id;

        let mut borrows = MockTestBorrowRepository::new();
        borrows
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        borrows.expect_update().times(0);

        let mut books = MockTestBookRepository::new();
        books.expect_update().times(0);

        let service = BorrowService::new(
            Arc::new(borrows),
            Arc::new(books),
            Arc::new(MockTestPrincipalStore::new()),
        );

        let result = service
            .return_book(&borrow_id, &caller(borrower, &[Role::user()]), Utc::now())
            .await;
        assert!(matches!(result, Err(BorrowError::AlreadyReturned(_))));
    }

    #[tokio::test]
    async fn test_failed_loan_record_leaves_stock_untouched() {
        let principal_id = PrincipalId::new();
        let book_id = BookId::new();

        let mut books = MockTestBookRepository::new();
        books
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(book(book_id, 1))));
        books.expect_update().times(0);

        let mut borrows = MockTestBorrowRepository::new();
        borrows
            .expect_create()
            .times(1)
            .returning(|_| Err(BorrowError::DatabaseError("insert failed".to_string())));

        let service = BorrowService::new(
            Arc::new(borrows),
            Arc::new(books),
            Arc::new(principals_with(principal_id)),
        );

        let result = service.borrow_book(&principal_id, &book_id, Utc::now()).await;
        assert!(matches!(result, Err(BorrowError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_return_book_by_someone_else_is_rejected() {
        let existing = Borrow::issue(BookId::new(), PrincipalId::new(), Utc::now());
        let borrow_id = existing.id;

        let mut borrows = MockTestBorrowRepository::new();
        borrows
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        borrows.expect_update().times(0);

        let mut books = MockTestBookRepository::new();
        books.expect_find_by_id().times(0);
        books.expect_update().times(0);

        let service = BorrowService::new(
            Arc::new(borrows),
            Arc::new(books),
            Arc::new(MockTestPrincipalStore::new()),
        );

        let result = service
            .return_book(&borrow_id, &caller(PrincipalId::new(), &[Role::user()]), Utc::now())
            .await;
        assert!(matches!(result, Err(BorrowError::NotBorrower(_))));
    }

    #[tokio::test]
    async fn test_admin_may_return_any_borrow() {
        let book_id = BookId::new();
        let existing = Borrow::issue(book_id, PrincipalId::new(), Utc::now());
        let borrow_id = existing.id;

        let mut borrows = MockTestBorrowRepository::new();
        borrows
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        borrows
            .expect_update()
            .times(1)
            .returning(|borrow| Ok(borrow));

        let mut books = MockTestBookRepository::new();
        books
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(book(book_id, 0))));
        books
            .expect_update()
            .withf(|book| book.copies == 1)
            .times(1)
            .returning(|book| Ok(book));

        let service = BorrowService::new(
            Arc::new(borrows),
            Arc::new(books),
            Arc::new(MockTestPrincipalStore::new()),
        );

        let borrow = service
            .return_book(&borrow_id, &caller(PrincipalId::new(), &[Role::admin()]), Utc::now())
            .await
            .unwrap();
        assert!(borrow.returned_at.is_some());
    }
}
