use super::{Account, DeleteOutcome, EnsureOutcome, UserStore};
use crate::conn::Role;
use crate::core::constant::{ROLE_ADMIN, ROLE_GUEST};
use crate::core::Error;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

/// Postgres-backed account store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str) -> Result<Self, Error> {
        let pool = PgPoolOptions::new().max_connections(16).connect(url).await?;

        let store = Self { pool };
        store.init().await?;

        Ok(store)
    }

    /// Create the schema and seed the role table
    async fn init(&self) -> Result<(), Error> {
        sqlx::query(
            r#"
                CREATE TABLE IF NOT EXISTS roles (
                    id SERIAL PRIMARY KEY,
                    role VARCHAR(100) NOT NULL UNIQUE
                )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
                CREATE TABLE IF NOT EXISTS users (
                    id SERIAL PRIMARY KEY,
                    name VARCHAR(100) NOT NULL,
                    password VARCHAR(100) NOT NULL,
                    role_id INTEGER NOT NULL,
                    FOREIGN KEY (role_id) REFERENCES roles(id)
                )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("INSERT INTO roles (role) VALUES ($1), ($2) ON CONFLICT (role) DO NOTHING")
            .bind(ROLE_ADMIN)
            .bind(ROLE_GUEST)
            .execute(&self.pool)
            .await?;

        tracing::info!("db was successfully initialized");
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn ensure_account(
        &self,
        name: &str,
        password: &str,
        role: Role,
    ) -> Result<EnsureOutcome, Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE name = $1")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(EnsureOutcome::AlreadyExists);
        }

        let role_id: Option<i32> = sqlx::query_scalar("SELECT id FROM roles WHERE role = $1")
            .bind(role.as_str())
            .fetch_optional(&self.pool)
            .await?;
        let Some(role_id) = role_id else {
            return Ok(EnsureOutcome::RoleNotFound);
        };

        sqlx::query("INSERT INTO users (name, password, role_id) VALUES ($1, $2, $3)")
            .bind(name)
            .bind(password)
            .bind(role_id)
            .execute(&self.pool)
            .await?;

        Ok(EnsureOutcome::SignedUp)
    }

    async fn delete_account(&self, name: &str) -> Result<DeleteOutcome, Error> {
        let result = sqlx::query("DELETE FROM users WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, Error> {
        let rows = sqlx::query(
            r#"
                SELECT u.name, r.role
                FROM users AS u
                    JOIN roles AS r ON r.id = u.role_id
                ORDER BY u.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let accounts = rows
            .into_iter()
            .map(|row| Account {
                name: row.get("name"),
                role: row.get("role"),
            })
            .collect();

        Ok(accounts)
    }

    async fn count_accounts(&self) -> Result<i64, Error> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
