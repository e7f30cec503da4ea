use anyhow::Result;
use sqlx::Row;

use crate::domain::models::account::DomainAccount;
use crate::storage::connection::DbConnection;

/// Repository for account rows and the active-account singleton.
#[derive(Clone)]
pub struct AccountRepository {
    db: DbConnection,
}

impl AccountRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn store_account(&self, account: &DomainAccount) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, display_name, email, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.id)
        .bind(&account.display_name)
        .bind(&account.email)
        .bind(&account.created_at)
        .bind(&account.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn get_account(&self, account_id: &str) -> Result<Option<DomainAccount>> {
        let row = sqlx::query(
            r#"
            SELECT id, display_name, email, created_at, updated_at
            FROM accounts
            WHERE id = ?
            "#,
        )
        .bind(account_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| DomainAccount {
            id: r.get("id"),
            display_name: r.get("display_name"),
            email: r.get("email"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        }))
    }

    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<DomainAccount>> {
        let row = sqlx::query(
            r#"
            SELECT id, display_name, email, created_at, updated_at
            FROM accounts
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| DomainAccount {
            id: r.get("id"),
            display_name: r.get("display_name"),
            email: r.get("email"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        }))
    }

    /// List all accounts ordered by display name.
    pub async fn list_accounts(&self) -> Result<Vec<DomainAccount>> {
        let rows = sqlx::query(
            r#"
            SELECT id, display_name, email, created_at, updated_at
            FROM accounts
            ORDER BY display_name ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .iter()
            .map(|r| DomainAccount {
                id: r.get("id"),
                display_name: r.get("display_name"),
                email: r.get("email"),
                created_at: r.get("created_at"),
                updated_at: r.get("updated_at"),
            })
            .collect())
    }

    /// Get the currently active account ID, if one has been set.
    pub async fn get_active_account_id(&self) -> Result<Option<String>> {
        let row = sqlx::query(
            r#"
            SELECT account_id
            FROM active_account
            WHERE id = 1
            "#,
        )
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| r.get("account_id")))
    }

    /// Set the active account, verifying the account exists first.
    pub async fn set_active_account(&self, account_id: &str) -> Result<()> {
        let exists = sqlx::query("SELECT 1 FROM accounts WHERE id = ?")
            .bind(account_id)
            .fetch_optional(self.db.pool())
            .await?
            .is_some();

        if !exists {
            return Err(anyhow::anyhow!("Account not found: {}", account_id));
        }

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO active_account (id, account_id)
            VALUES (1, ?)
            "#,
        )
        .bind(account_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}
