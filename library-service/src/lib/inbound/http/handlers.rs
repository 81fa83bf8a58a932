use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::auth::errors::AuthError;
use crate::book::errors::BookError;
use crate::borrow::errors::BorrowError;
use crate::principal::errors::PrincipalError;

pub mod authenticate;
pub mod books;
pub mod borrows;
pub mod principals;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Forbidden => ApiError::Forbidden(err.to_string()),
            // Login failures are indistinguishable from the outside.
            AuthError::PrincipalNotFound(_) | AuthError::InvalidCredentials => {
                ApiError::Unauthorized(AuthError::InvalidCredentials.to_string())
            }
            // Rejected tokens never say why.
            AuthError::Unauthorized
            | AuthError::MalformedToken(_)
            | AuthError::SignatureInvalid
            | AuthError::TokenExpired => {
                ApiError::Unauthorized(AuthError::Unauthorized.to_string())
            }
            AuthError::TokenIssuance(_) | AuthError::StoreUnavailable(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<PrincipalError> for ApiError {
    fn from(err: PrincipalError) -> Self {
        match err {
            PrincipalError::NotFound(_) => ApiError::NotFound(err.to_string()),
            PrincipalError::UsernameAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            PrincipalError::InvalidUsername(_)
            | PrincipalError::InvalidPrincipalId(_)
            | PrincipalError::InvalidRole(_)
            | PrincipalError::InvalidName(_) => ApiError::UnprocessableEntity(err.to_string()),
            PrincipalError::Password(_) | PrincipalError::DatabaseError(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<BookError> for ApiError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::NotFound(_) => ApiError::NotFound(err.to_string()),
            BookError::OutOfStock(_) => ApiError::Conflict(err.to_string()),
            BookError::InvalidBookId(_) | BookError::InvalidBook(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            BookError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<BorrowError> for ApiError {
    fn from(err: BorrowError) -> Self {
        match err {
            BorrowError::NotFound(_) | BorrowError::PrincipalNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            BorrowError::AlreadyReturned(_) => ApiError::Conflict(err.to_string()),
            BorrowError::NotBorrower(_) => ApiError::Forbidden(AuthError::Forbidden.to_string()),
            BorrowError::InvalidBorrowId(_) => ApiError::UnprocessableEntity(err.to_string()),
            BorrowError::Book(e) => ApiError::from(e),
            BorrowError::Principal(e) => ApiError::from(e),
            BorrowError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}
