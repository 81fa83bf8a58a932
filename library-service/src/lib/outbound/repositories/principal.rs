use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::Transaction;
use uuid::Uuid;

use crate::principal::errors::PrincipalError;
use crate::principal::models::Principal;
use crate::principal::models::PrincipalId;
use crate::principal::models::Role;
use crate::principal::models::Username;
use crate::principal::ports::PrincipalRepository;
use crate::principal::ports::PrincipalStore;

const SELECT_PRINCIPALS: &str = r#"
    SELECT u.id, u.username, u.name, u.password_hash, u.created_at,
           COALESCE(
               array_agg(r.role_name::TEXT) FILTER (WHERE r.role_name IS NOT NULL),
               '{}'::TEXT[]
           ) AS roles
    FROM users u
    LEFT JOIN user_roles r ON r.user_id = u.id
"#;

#[derive(sqlx::FromRow)]
struct PrincipalRow {
    id: Uuid,
    username: String,
    name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    roles: Vec<String>,
}

impl TryFrom<PrincipalRow> for Principal {
    type Error = PrincipalError;

    fn try_from(row: PrincipalRow) -> Result<Self, Self::Error> {
        let roles = row
            .roles
            .into_iter()
            .map(Role::new)
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Principal {
            id: PrincipalId(row.id),
            username: Username::new(row.username)?,
            name: row.name,
            password_hash: row.password_hash,
            roles,
            created_at: row.created_at,
        })
    }
}

pub struct PostgresPrincipalRepository {
    pool: PgPool,
}

impl PostgresPrincipalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn replace_roles(
        tx: &mut Transaction<'_, Postgres>,
        principal: &Principal,
    ) -> Result<(), PrincipalError> {
        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(principal.id.0)
            .execute(&mut **tx)
            .await
            .map_err(|e| PrincipalError::DatabaseError(e.to_string()))?;

        for role in &principal.roles {
            sqlx::query("INSERT INTO user_roles (user_id, role_name) VALUES ($1, $2)")
                .bind(principal.id.0)
                .bind(role.as_str())
                .execute(&mut **tx)
                .await
                .map_err(|e| PrincipalError::DatabaseError(e.to_string()))?;
        }

        Ok(())
    }
}

fn map_write_error(e: sqlx::Error, principal: &Principal) -> PrincipalError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some("users_username_key") {
            return PrincipalError::UsernameAlreadyExists(principal.username.as_str().to_string());
        }
    }
    PrincipalError::DatabaseError(e.to_string())
}

#[async_trait]
impl PrincipalStore for PostgresPrincipalRepository {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Principal>, PrincipalError> {
        let query = format!("{} WHERE u.username = $1 GROUP BY u.id", SELECT_PRINCIPALS);

        sqlx::query_as::<_, PrincipalRow>(&query)
            .bind(username.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PrincipalError::DatabaseError(e.to_string()))?
            .map(Principal::try_from)
            .transpose()
    }

    async fn find_by_id(&self, id: &PrincipalId) -> Result<Option<Principal>, PrincipalError> {
        let query = format!("{} WHERE u.id = $1 GROUP BY u.id", SELECT_PRINCIPALS);

        sqlx::query_as::<_, PrincipalRow>(&query)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PrincipalError::DatabaseError(e.to_string()))?
            .map(Principal::try_from)
            .transpose()
    }
}

#[async_trait]
impl PrincipalRepository for PostgresPrincipalRepository {
    async fn create(&self, principal: Principal) -> Result<Principal, PrincipalError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PrincipalError::DatabaseError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO users (id, username, name, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(principal.id.0)
        .bind(principal.username.as_str())
        .bind(&principal.name)
        .bind(&principal.password_hash)
        .bind(principal.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, &principal))?;

        Self::replace_roles(&mut tx, &principal).await?;

        tx.commit()
            .await
            .map_err(|e| PrincipalError::DatabaseError(e.to_string()))?;

        Ok(principal)
    }

    async fn list_all(&self) -> Result<Vec<Principal>, PrincipalError> {
        let query = format!("{} GROUP BY u.id ORDER BY u.created_at", SELECT_PRINCIPALS);

        sqlx::query_as::<_, PrincipalRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PrincipalError::DatabaseError(e.to_string()))?
            .into_iter()
            .map(Principal::try_from)
            .collect()
    }

    async fn update(&self, principal: Principal) -> Result<Principal, PrincipalError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PrincipalError::DatabaseError(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, name = $3, password_hash = $4
            WHERE id = $1
            "#,
        )
        .bind(principal.id.0)
        .bind(principal.username.as_str())
        .bind(&principal.name)
        .bind(&principal.password_hash)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, &principal))?;

        if result.rows_affected() == 0 {
            return Err(PrincipalError::NotFound(principal.id.to_string()));
        }

        Self::replace_roles(&mut tx, &principal).await?;

        tx.commit()
            .await
            .map_err(|e| PrincipalError::DatabaseError(e.to_string()))?;

        Ok(principal)
    }
}
