//! PostgreSQL implementation of UserRepository over the `users` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::account::{NewUser, User};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::UserRepository;

const USER_COLUMNS: &str = "id_usuario, email, password_hash, nombre, created_at";

/// PostgreSQL-backed account storage.
#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserStore {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (email, password_hash, nombre)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => DomainError::new(
                ErrorCode::EmailTaken,
                format!("Email already registered: {}", user.email),
            ),
            other => db_error("insert user", other),
        })?;

        row_to_user(&row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("fetch user by email", e))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE id_usuario = $1",
            USER_COLUMNS
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch user", e))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

fn db_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::database(format!("Failed to {}: {}", action, e))
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let id: i64 = row
        .try_get("id_usuario")
        .map_err(|e| db_error("read id_usuario", e))?;
    let email: String = row.try_get("email").map_err(|e| db_error("read email", e))?;
    let password_hash: String = row
        .try_get("password_hash")
        .map_err(|e| db_error("read password_hash", e))?;
    let name: String = row.try_get("nombre").map_err(|e| db_error("read nombre", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| db_error("read created_at", e))?;

    Ok(User {
        id: UserId::new(id)?,
        email,
        name,
        password_hash,
        created_at: Timestamp::from_datetime(created_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_columns_match_the_row_mapping() {
        for column in ["id_usuario", "email", "password_hash", "nombre", "created_at"] {
            assert!(USER_COLUMNS.contains(column));
        }
    }

    #[test]
    fn store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresUserStore>();
    }
}
