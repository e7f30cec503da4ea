use anyhow::{anyhow, Result};
use sqlx::Row;

use crate::domain::models::budget::{
    BudgetKind, DomainBudget, DomainExpenseLine, ExpenseLineKind,
};
use crate::storage::connection::DbConnection;

/// Repository for budgets, their participants, and monthly plan lines.
#[derive(Clone)]
pub struct BudgetRepository {
    db: DbConnection,
}

impl BudgetRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn store_budget(&self, budget: &DomainBudget) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO budgets (id, owner_id, name, icon, theme_color, kind, salary, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&budget.id)
        .bind(&budget.owner_id)
        .bind(&budget.name)
        .bind(&budget.icon)
        .bind(&budget.theme_color)
        .bind(budget.kind.as_str())
        .bind(budget.salary)
        .bind(&budget.created_at)
        .bind(&budget.updated_at)
        .execute(self.db.pool())
        .await?;

        for email in &budget.participants {
            self.add_participant(&budget.id, email).await?;
        }
        Ok(())
    }

    pub async fn get_budget(&self, budget_id: &str) -> Result<Option<DomainBudget>> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id, name, icon, theme_color, kind, salary, created_at, updated_at
            FROM budgets
            WHERE id = ?
            "#,
        )
        .bind(budget_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => {
                let participants = self.list_participants(budget_id).await?;
                Ok(Some(Self::budget_from_row(&r, participants)?))
            }
            None => Ok(None),
        }
    }

    /// List budgets visible to an account: owned by it, or shared with its
    /// email address.
    pub async fn list_budgets_for(
        &self,
        account_id: &str,
        email: &str,
    ) -> Result<Vec<DomainBudget>> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT b.id, b.owner_id, b.name, b.icon, b.theme_color,
                            b.kind, b.salary, b.created_at, b.updated_at
            FROM budgets b
            LEFT JOIN budget_participants p ON p.budget_id = b.id
            WHERE b.owner_id = ? OR p.email = ?
            ORDER BY b.created_at ASC
            "#,
        )
        .bind(account_id)
        .bind(email)
        .fetch_all(self.db.pool())
        .await?;

        let mut budgets = Vec::with_capacity(rows.len());
        for r in &rows {
            let id: String = r.get("id");
            let participants = self.list_participants(&id).await?;
            budgets.push(Self::budget_from_row(r, participants)?);
        }
        Ok(budgets)
    }

    /// IDs of every budget in the store, regardless of owner. Used by the
    /// startup recurring-transaction sweep.
    pub async fn list_all_budget_ids(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT id FROM budgets ORDER BY created_at ASC")
            .fetch_all(self.db.pool())
            .await?;
        Ok(rows.iter().map(|r| r.get("id")).collect())
    }

    pub async fn count_for_owner(&self, account_id: &str) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM budgets WHERE owner_id = ?")
            .bind(account_id)
            .fetch_one(self.db.pool())
            .await?;
        Ok(row.get("n"))
    }

    pub async fn update_budget_profile(
        &self,
        budget_id: &str,
        name: &str,
        icon: &str,
        theme_color: &str,
        updated_at: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE budgets
            SET name = ?, icon = ?, theme_color = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(name)
        .bind(icon)
        .bind(theme_color)
        .bind(updated_at)
        .bind(budget_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn set_salary(&self, budget_id: &str, salary: f64, updated_at: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE budgets SET salary = ?, updated_at = ? WHERE id = ?
            "#,
        )
        .bind(salary)
        .bind(updated_at)
        .bind(budget_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Delete a budget and every dependent row.
    pub async fn delete_budget(&self, budget_id: &str) -> Result<()> {
        for table in [
            "budget_participants",
            "expense_lines",
            "transactions",
            "goals",
            "recurring_rules",
        ] {
            sqlx::query(&format!("DELETE FROM {} WHERE budget_id = ?", table))
                .bind(budget_id)
                .execute(self.db.pool())
                .await?;
        }
        sqlx::query("DELETE FROM budgets WHERE id = ?")
            .bind(budget_id)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    pub async fn add_participant(&self, budget_id: &str, email: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO budget_participants (budget_id, email)
            VALUES (?, ?)
            "#,
        )
        .bind(budget_id)
        .bind(email)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn remove_participant(&self, budget_id: &str, email: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM budget_participants WHERE budget_id = ? AND email = ?
            "#,
        )
        .bind(budget_id)
        .bind(email)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_participants(&self, budget_id: &str) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT email FROM budget_participants WHERE budget_id = ? ORDER BY email ASC
            "#,
        )
        .bind(budget_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows.iter().map(|r| r.get("email")).collect())
    }

    pub async fn add_expense_line(&self, line: &DomainExpenseLine) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO expense_lines (id, budget_id, label, amount, kind)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&line.id)
        .bind(&line.budget_id)
        .bind(&line.label)
        .bind(line.amount)
        .bind(line.kind.as_str())
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn list_expense_lines(&self, budget_id: &str) -> Result<Vec<DomainExpenseLine>> {
        let rows = sqlx::query(
            r#"
            SELECT id, budget_id, label, amount, kind
            FROM expense_lines
            WHERE budget_id = ?
            ORDER BY rowid ASC
            "#,
        )
        .bind(budget_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(|r| {
                let kind: String = r.get("kind");
                Ok(DomainExpenseLine {
                    id: r.get("id"),
                    budget_id: r.get("budget_id"),
                    label: r.get("label"),
                    amount: r.get("amount"),
                    kind: ExpenseLineKind::parse(&kind)
                        .ok_or_else(|| anyhow!("unknown expense line kind: {}", kind))?,
                })
            })
            .collect()
    }

    pub async fn delete_expense_line(&self, budget_id: &str, line_id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM expense_lines WHERE budget_id = ? AND id = ?
            "#,
        )
        .bind(budget_id)
        .bind(line_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    fn budget_from_row(
        r: &sqlx::sqlite::SqliteRow,
        participants: Vec<String>,
    ) -> Result<DomainBudget> {
        let kind: String = r.get("kind");
        Ok(DomainBudget {
            id: r.get("id"),
            owner_id: r.get("owner_id"),
            name: r.get("name"),
            icon: r.get("icon"),
            theme_color: r.get("theme_color"),
            kind: BudgetKind::parse(&kind).ok_or_else(|| anyhow!("unknown budget kind: {}", kind))?,
            salary: r.get("salary"),
            participants,
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        })
    }
}
