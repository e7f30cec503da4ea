use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use sqlx::Row;

use crate::domain::models::transaction::{DomainTransaction, TransactionKind};
use crate::storage::connection::DbConnection;

/// Repository for transaction rows.
#[derive(Clone)]
pub struct TransactionRepository {
    db: DbConnection,
}

impl TransactionRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn store_transaction(&self, transaction: &DomainTransaction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, budget_id, label, amount, kind, date, category, description)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.budget_id)
        .bind(&transaction.label)
        .bind(transaction.amount)
        .bind(transaction.kind.as_str())
        .bind(transaction.date.to_string())
        .bind(&transaction.category)
        .bind(&transaction.description)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// List a budget's transactions newest first, optionally restricted to an
    /// inclusive date range.
    pub async fn list_transactions(
        &self,
        budget_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<DomainTransaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, budget_id, label, amount, kind, date, category, description
            FROM transactions
            WHERE budget_id = ?
              AND date >= COALESCE(?, date)
              AND date <= COALESCE(?, date)
            ORDER BY date DESC, rowid DESC
            "#,
        )
        .bind(budget_id)
        .bind(start_date.map(|d| d.to_string()))
        .bind(end_date.map(|d| d.to_string()))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::transaction_from_row).collect()
    }

    pub async fn delete_transaction(&self, budget_id: &str, transaction_id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM transactions WHERE budget_id = ? AND id = ?
            "#,
        )
        .bind(budget_id)
        .bind(transaction_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    fn transaction_from_row(r: &sqlx::sqlite::SqliteRow) -> Result<DomainTransaction> {
        let kind: String = r.get("kind");
        let date: String = r.get("date");
        Ok(DomainTransaction {
            id: r.get("id"),
            budget_id: r.get("budget_id"),
            label: r.get("label"),
            amount: r.get("amount"),
            kind: TransactionKind::parse(&kind)
                .ok_or_else(|| anyhow!("unknown transaction kind: {}", kind))?,
            date: date
                .parse::<NaiveDate>()
                .map_err(|_| anyhow!("invalid transaction date: {}", date))?,
            category: r.get("category"),
            description: r.get("description"),
        })
    }
}
