use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use sqlx::Row;

use crate::domain::models::recurring::{DomainRecurringRule, Frequency};
use crate::domain::models::transaction::TransactionKind;
use crate::storage::connection::DbConnection;

/// Repository for recurring transaction rules.
#[derive(Clone)]
pub struct RecurringRepository {
    db: DbConnection,
}

impl RecurringRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn store_rule(&self, rule: &DomainRecurringRule) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO recurring_rules (id, budget_id, label, amount, kind, category, frequency, next_due_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&rule.id)
        .bind(&rule.budget_id)
        .bind(&rule.label)
        .bind(rule.amount)
        .bind(rule.kind.as_str())
        .bind(&rule.category)
        .bind(rule.frequency.as_str())
        .bind(rule.next_due_date.to_string())
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn list_rules(&self, budget_id: &str) -> Result<Vec<DomainRecurringRule>> {
        let rows = sqlx::query(
            r#"
            SELECT id, budget_id, label, amount, kind, category, frequency, next_due_date
            FROM recurring_rules
            WHERE budget_id = ?
            ORDER BY rowid ASC
            "#,
        )
        .bind(budget_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::rule_from_row).collect()
    }

    /// All rules in the store, used by the startup sweep.
    pub async fn list_all_rules(&self) -> Result<Vec<DomainRecurringRule>> {
        let rows = sqlx::query(
            r#"
            SELECT id, budget_id, label, amount, kind, category, frequency, next_due_date
            FROM recurring_rules
            ORDER BY rowid ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::rule_from_row).collect()
    }

    pub async fn update_next_due_date(&self, rule_id: &str, next_due_date: NaiveDate) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE recurring_rules SET next_due_date = ? WHERE id = ?
            "#,
        )
        .bind(next_due_date.to_string())
        .bind(rule_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn delete_rule(&self, budget_id: &str, rule_id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM recurring_rules WHERE budget_id = ? AND id = ?
            "#,
        )
        .bind(budget_id)
        .bind(rule_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    fn rule_from_row(r: &sqlx::sqlite::SqliteRow) -> Result<DomainRecurringRule> {
        let kind: String = r.get("kind");
        let frequency: String = r.get("frequency");
        let next_due_date: String = r.get("next_due_date");
        Ok(DomainRecurringRule {
            id: r.get("id"),
            budget_id: r.get("budget_id"),
            label: r.get("label"),
            amount: r.get("amount"),
            kind: TransactionKind::parse(&kind)
                .ok_or_else(|| anyhow!("unknown transaction kind: {}", kind))?,
            category: r.get("category"),
            frequency: Frequency::parse(&frequency)
                .ok_or_else(|| anyhow!("unknown frequency: {}", frequency))?,
            next_due_date: next_due_date
                .parse::<NaiveDate>()
                .map_err(|_| anyhow!("invalid due date: {}", next_due_date))?,
        })
    }
}
