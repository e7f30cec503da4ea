use anyhow::Result;
use sqlx::Row;

use crate::domain::models::goal::DomainGoal;
use crate::storage::connection::DbConnection;

/// Repository for savings goal rows.
#[derive(Clone)]
pub struct GoalRepository {
    db: DbConnection,
}

impl GoalRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn store_goal(&self, goal: &DomainGoal) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO goals (id, budget_id, name, target_amount, current_amount, icon, color, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&goal.id)
        .bind(&goal.budget_id)
        .bind(&goal.name)
        .bind(goal.target_amount)
        .bind(goal.current_amount)
        .bind(&goal.icon)
        .bind(&goal.color)
        .bind(&goal.created_at)
        .bind(&goal.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn get_goal(&self, budget_id: &str, goal_id: &str) -> Result<Option<DomainGoal>> {
        let row = sqlx::query(
            r#"
            SELECT id, budget_id, name, target_amount, current_amount, icon, color, created_at, updated_at
            FROM goals
            WHERE budget_id = ? AND id = ?
            "#,
        )
        .bind(budget_id)
        .bind(goal_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| Self::goal_from_row(&r)))
    }

    pub async fn list_goals(&self, budget_id: &str) -> Result<Vec<DomainGoal>> {
        let rows = sqlx::query(
            r#"
            SELECT id, budget_id, name, target_amount, current_amount, icon, color, created_at, updated_at
            FROM goals
            WHERE budget_id = ?
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .bind(budget_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(Self::goal_from_row).collect())
    }

    pub async fn update_progress(
        &self,
        goal_id: &str,
        current_amount: f64,
        updated_at: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE goals SET current_amount = ?, updated_at = ? WHERE id = ?
            "#,
        )
        .bind(current_amount)
        .bind(updated_at)
        .bind(goal_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn delete_goal(&self, budget_id: &str, goal_id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM goals WHERE budget_id = ? AND id = ?
            "#,
        )
        .bind(budget_id)
        .bind(goal_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    fn goal_from_row(r: &sqlx::sqlite::SqliteRow) -> DomainGoal {
        DomainGoal {
            id: r.get("id"),
            budget_id: r.get("budget_id"),
            name: r.get("name"),
            target_amount: r.get("target_amount"),
            current_amount: r.get("current_amount"),
            icon: r.get("icon"),
            color: r.get("color"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        }
    }
}
