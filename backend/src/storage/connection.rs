//! SQLite connection management.
//!
//! Wraps a [`SqlitePool`] behind a cheaply clonable handle and owns schema
//! creation. Tests get a uniquely named in-memory database so they can run
//! in parallel without touching disk.

use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS accounts (
        id TEXT PRIMARY KEY,
        display_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS active_account (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        account_id TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS budgets (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        name TEXT NOT NULL,
        icon TEXT NOT NULL,
        theme_color TEXT NOT NULL,
        kind TEXT NOT NULL,
        salary REAL NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS budget_participants (
        budget_id TEXT NOT NULL,
        email TEXT NOT NULL,
        PRIMARY KEY (budget_id, email)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS expense_lines (
        id TEXT PRIMARY KEY,
        budget_id TEXT NOT NULL,
        label TEXT NOT NULL,
        amount REAL NOT NULL,
        kind TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id TEXT PRIMARY KEY,
        budget_id TEXT NOT NULL,
        label TEXT NOT NULL,
        amount REAL NOT NULL,
        kind TEXT NOT NULL,
        date TEXT NOT NULL,
        category TEXT NOT NULL,
        description TEXT NOT NULL
    );
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_transactions_budget_date
    ON transactions(budget_id, date DESC);
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS goals (
        id TEXT PRIMARY KEY,
        budget_id TEXT NOT NULL,
        name TEXT NOT NULL,
        target_amount REAL NOT NULL,
        current_amount REAL NOT NULL,
        icon TEXT NOT NULL,
        color TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recurring_rules (
        id TEXT PRIMARY KEY,
        budget_id TEXT NOT NULL,
        label TEXT NOT NULL,
        amount REAL NOT NULL,
        kind TEXT NOT NULL,
        category TEXT NOT NULL,
        frequency TEXT NOT NULL,
        next_due_date TEXT NOT NULL
    );
    "#,
];

/// Shared handle to the SQLite pool.
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if necessary) the database at `url` and ensure the
    /// schema exists.
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?;
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize a test database with a unique name so parallel tests do
    /// not share state.
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);
        Self::new(&db_url).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(pool).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_setup_is_idempotent() {
        let db = DbConnection::init_test().await.expect("init test db");
        // Running setup twice must not fail.
        DbConnection::setup_schema(db.pool())
            .await
            .expect("second setup");
    }
}
