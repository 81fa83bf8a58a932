use std::sync::Arc;

use async_trait::async_trait;

use crate::book::errors::BookError;
use crate::book::models::Book;
use crate::book::models::BookDetails;
use crate::book::models::BookId;
use crate::book::ports::BookRepository;
use crate::book::ports::BookServicePort;

pub struct BookService<BR>
where
    BR: BookRepository,
{
    repository: Arc<BR>,
}

impl<BR> BookService<BR>
where
    BR: BookRepository,
{
    pub fn new(repository: Arc<BR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<BR> BookServicePort for BookService<BR>
where
    BR: BookRepository,
{
    async fn list_books(&self) -> Result<Vec<Book>, BookError> {
        self.repository.list_all().await
    }

    async fn get_book(&self, id: &BookId) -> Result<Book, BookError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(BookError::NotFound(id.to_string()))
    }

    async fn create_book(&self, details: BookDetails) -> Result<Book, BookError> {
        let book = Book {
            id: BookId::new(),
            name: details.name,
            author: details.author,
            genre: details.genre,
            copies: details.copies,
        };

        self.repository.create(book).await
    }

    async fn update_book(&self, id: &BookId, details: BookDetails) -> Result<Book, BookError> {
        let mut book = self.get_book(id).await?;

        book.name = details.name;
        book.author = details.author;
        book.genre = details.genre;
        book.copies = details.copies;

        self.repository.update(book).await
    }

    async fn delete_book(&self, id: &BookId) -> Result<(), BookError> {
        self.repository.delete(id).await
    }
}
