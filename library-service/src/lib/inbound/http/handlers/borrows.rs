use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::auth::models::AuthenticatedIdentity;
use crate::book::models::BookId;
use crate::borrow::models::Borrow;
use crate::borrow::models::BorrowId;
use crate::inbound::http::router::AppState;
use crate::principal::models::PrincipalId;
use crate::principal::models::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BorrowData {
    pub id: String,
    pub book_id: String,
    pub user_id: String,
    pub issued_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl From<&Borrow> for BorrowData {
    fn from(borrow: &Borrow) -> Self {
        Self {
            id: borrow.id.to_string(),
            book_id: borrow.book_id.to_string(),
            user_id: borrow.principal_id.to_string(),
            issued_at: borrow.issued_at,
            due_at: borrow.due_at,
            returned_at: borrow.returned_at,
        }
    }
}

fn into_list(borrows: Vec<Borrow>) -> ApiSuccess<Vec<BorrowData>> {
    ApiSuccess::new(StatusCode::OK, borrows.iter().map(BorrowData::from).collect())
}

/// Borrow request. `user_id` defaults to the caller; only admins may lend
/// on behalf of someone else.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BorrowRequest {
    book_id: String,
    user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReturnRequest {
    borrow_id: String,
}

pub async fn borrow_book(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    Json(body): Json<BorrowRequest>,
) -> Result<ApiSuccess<BorrowData>, ApiError> {
    let book_id =
        BookId::from_string(&body.book_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let principal_id = match body.user_id {
        Some(user_id) => {
            let principal_id = PrincipalId::from_string(&user_id)
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            if principal_id != identity.principal_id && !identity.has_role(&Role::admin()) {
                return Err(ApiError::Forbidden(
                    "Insufficient permissions".to_string(),
                ));
            }
            principal_id
        }
        None => identity.principal_id,
    };

    state
        .borrow_service
        .borrow_book(&principal_id, &book_id, Utc::now())
        .await
        .map_err(ApiError::from)
        .map(|ref borrow| ApiSuccess::new(StatusCode::CREATED, borrow.into()))
}

pub async fn return_book(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    Json(body): Json<ReturnRequest>,
) -> Result<ApiSuccess<BorrowData>, ApiError> {
    let borrow_id =
        BorrowId::from_string(&body.borrow_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .borrow_service
        .return_book(&borrow_id, &identity, Utc::now())
        .await
        .map_err(ApiError::from)
        .map(|ref borrow| ApiSuccess::new(StatusCode::OK, borrow.into()))
}

pub async fn list_borrows(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<BorrowData>>, ApiError> {
    state
        .borrow_service
        .list_borrows()
        .await
        .map_err(ApiError::from)
        .map(into_list)
}

pub async fn borrows_by_principal(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<Vec<BorrowData>>, ApiError> {
    let principal_id =
        PrincipalId::from_string(&user_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .borrow_service
        .borrows_by_principal(&principal_id)
        .await
        .map_err(ApiError::from)
        .map(into_list)
}

pub async fn borrows_by_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Result<ApiSuccess<Vec<BorrowData>>, ApiError> {
    let book_id =
        BookId::from_string(&book_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .borrow_service
        .borrows_by_book(&book_id)
        .await
        .map_err(ApiError::from)
        .map(into_list)
}
