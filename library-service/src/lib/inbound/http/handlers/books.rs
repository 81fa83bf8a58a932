use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::book::errors::BookError;
use crate::book::models::Book;
use crate::book::models::BookDetails;
use crate::book::models::BookId;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookData {
    pub id: String,
    pub name: String,
    pub author: String,
    pub genre: String,
    pub copies: i32,
}

impl From<&Book> for BookData {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.to_string(),
            name: book.name.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            copies: book.copies,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookRequest {
    name: String,
    author: String,
    genre: String,
    copies: i32,
}

impl BookRequest {
    fn try_into_details(self) -> Result<BookDetails, BookError> {
        BookDetails::new(self.name, self.author, self.genre, self.copies)
    }
}

fn parse_book_id(id: &str) -> Result<BookId, ApiError> {
    BookId::from_string(id).map_err(|e| ApiError::BadRequest(e.to_string()))
}

pub async fn list_books(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<BookData>>, ApiError> {
    state
        .book_service
        .list_books()
        .await
        .map_err(ApiError::from)
        .map(|books| ApiSuccess::new(StatusCode::OK, books.iter().map(BookData::from).collect()))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Result<ApiSuccess<BookData>, ApiError> {
    let book_id = parse_book_id(&book_id)?;

    state
        .book_service
        .get_book(&book_id)
        .await
        .map_err(ApiError::from)
        .map(|ref book| ApiSuccess::new(StatusCode::OK, book.into()))
}

pub async fn create_book(
    State(state): State<AppState>,
    Json(body): Json<BookRequest>,
) -> Result<ApiSuccess<BookData>, ApiError> {
    state
        .book_service
        .create_book(body.try_into_details()?)
        .await
        .map_err(ApiError::from)
        .map(|ref book| ApiSuccess::new(StatusCode::CREATED, book.into()))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    Json(body): Json<BookRequest>,
) -> Result<ApiSuccess<BookData>, ApiError> {
    let book_id = parse_book_id(&book_id)?;

    state
        .book_service
        .update_book(&book_id, body.try_into_details()?)
        .await
        .map_err(ApiError::from)
        .map(|ref book| ApiSuccess::new(StatusCode::OK, book.into()))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let book_id = parse_book_id(&book_id)?;

    state
        .book_service
        .delete_book(&book_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
