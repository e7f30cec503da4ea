//! Budget export: JSON backup bundles and CSV transaction dumps.

use anyhow::{anyhow, Result};
use chrono::Utc;
use tracing::info;

use crate::domain::budget_service::BudgetService;
use crate::domain::commands::export::ExportBundle;
use crate::domain::models::transaction::DomainTransaction;
use crate::storage::{
    BudgetRepository, DbConnection, GoalRepository, RecurringRepository, TransactionRepository,
};

const CSV_HEADER: [&str; 6] = ["date", "label", "amount", "kind", "category", "description"];

/// Service assembling export documents for a budget.
#[derive(Clone)]
pub struct ExportService {
    budget_repository: BudgetRepository,
    transaction_repository: TransactionRepository,
    goal_repository: GoalRepository,
    recurring_repository: RecurringRepository,
    budget_service: BudgetService,
}

impl ExportService {
    pub fn new(db: DbConnection, budget_service: BudgetService) -> Self {
        Self {
            budget_repository: BudgetRepository::new(db.clone()),
            transaction_repository: TransactionRepository::new(db.clone()),
            goal_repository: GoalRepository::new(db.clone()),
            recurring_repository: RecurringRepository::new(db),
            budget_service,
        }
    }

    /// Everything belonging to one budget, for a JSON backup.
    pub async fn export_bundle(&self, budget_id: &str) -> Result<ExportBundle> {
        info!("Exporting budget {}", budget_id);

        let (_, budget) = self.budget_service.member_budget(budget_id).await?;

        let expense_lines = self.budget_repository.list_expense_lines(&budget.id).await?;
        let transactions = self
            .transaction_repository
            .list_transactions(&budget.id, None, None)
            .await?;
        let goals = self.goal_repository.list_goals(&budget.id).await?;
        let recurring = self.recurring_repository.list_rules(&budget.id).await?;

        Ok(ExportBundle {
            budget,
            expense_lines,
            transactions,
            goals,
            recurring,
            exported_at: Utc::now().to_rfc3339(),
        })
    }

    /// A budget's transactions as CSV, newest first.
    pub async fn transactions_csv(&self, budget_id: &str) -> Result<String> {
        let (_, budget) = self.budget_service.member_budget(budget_id).await?;
        let transactions = self
            .transaction_repository
            .list_transactions(&budget.id, None, None)
            .await?;
        transactions_to_csv(&transactions)
    }
}

fn transactions_to_csv(transactions: &[DomainTransaction]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for t in transactions {
        writer.write_record([
            t.date.to_string(),
            t.label.clone(),
            format!("{:.2}", t.amount),
            t.kind.as_str().to_string(),
            t.category.clone(),
            t.description.clone(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV writer: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}
