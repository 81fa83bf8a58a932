use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::book::models::BookId;
use crate::borrow::errors::BorrowError;
use crate::borrow::models::Borrow;
use crate::borrow::models::BorrowId;
use crate::borrow::ports::BorrowRepository;
use crate::principal::models::PrincipalId;

const SELECT_BORROWS: &str = r#"
    SELECT id, book_id, user_id, issued_at, due_at, returned_at
    FROM borrows
"#;

#[derive(sqlx::FromRow)]
struct BorrowRow {
    id: Uuid,
    book_id: Uuid,
    user_id: Uuid,
    issued_at: DateTime<Utc>,
    due_at: DateTime<Utc>,
    returned_at: Option<DateTime<Utc>>,
}

impl From<BorrowRow> for Borrow {
    fn from(row: BorrowRow) -> Self {
        Borrow {
            id: BorrowId(row.id),
            book_id: BookId(row.book_id),
            principal_id: PrincipalId(row.user_id),
            issued_at: row.issued_at,
            due_at: row.due_at,
            returned_at: row.returned_at,
        }
    }
}

pub struct PostgresBorrowRepository {
    pool: PgPool,
}

impl PostgresBorrowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_where_uuid(
        &self,
        condition: &str,
        value: Uuid,
    ) -> Result<Vec<Borrow>, BorrowError> {
        let query = format!("{} WHERE {} ORDER BY issued_at", SELECT_BORROWS, condition);

        let rows = sqlx::query_as::<_, BorrowRow>(&query)
            .bind(value)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BorrowError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Borrow::from).collect())
    }
}

#[async_trait]
impl BorrowRepository for PostgresBorrowRepository {
    async fn create(&self, borrow: Borrow) -> Result<Borrow, BorrowError> {
        sqlx::query(
            r#"
            INSERT INTO borrows (id, book_id, user_id, issued_at, due_at, returned_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(borrow.id.0)
        .bind(borrow.book_id.0)
        .bind(borrow.principal_id.0)
        .bind(borrow.issued_at)
        .bind(borrow.due_at)
        .bind(borrow.returned_at)
        .execute(&self.pool)
        .await
        .map_err(|e| BorrowError::DatabaseError(e.to_string()))?;

        Ok(borrow)
    }

    async fn find_by_id(&self, id: &BorrowId) -> Result<Option<Borrow>, BorrowError> {
        let query = format!("{} WHERE id = $1", SELECT_BORROWS);

        let row = sqlx::query_as::<_, BorrowRow>(&query)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BorrowError::DatabaseError(e.to_string()))?;

        Ok(row.map(Borrow::from))
    }

    async fn list_all(&self) -> Result<Vec<Borrow>, BorrowError> {
        let query = format!("{} ORDER BY issued_at", SELECT_BORROWS);

        let rows = sqlx::query_as::<_, BorrowRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BorrowError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Borrow::from).collect())
    }

    async fn find_by_principal(
        &self,
        principal_id: &PrincipalId,
    ) -> Result<Vec<Borrow>, BorrowError> {
        self.fetch_where_uuid("user_id = $1", principal_id.0).await
    }

    async fn find_by_book(&self, book_id: &BookId) -> Result<Vec<Borrow>, BorrowError> {
        self.fetch_where_uuid("book_id = $1", book_id.0).await
    }

    async fn update(&self, borrow: Borrow) -> Result<Borrow, BorrowError> {
        let result = sqlx::query(
            r#"
            UPDATE borrows
            SET due_at = $2, returned_at = $3
            WHERE id = $1
            "#,
        )
        .bind(borrow.id.0)
        .bind(borrow.due_at)
        .bind(borrow.returned_at)
        .execute(&self.pool)
        .await
        .map_err(|e| BorrowError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(BorrowError::NotFound(borrow.id.to_string()));
        }

        Ok(borrow)
    }
}
