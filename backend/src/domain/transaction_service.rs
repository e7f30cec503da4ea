//! Transaction recording and retrieval.

use anyhow::{anyhow, Result};
use tracing::info;

use crate::domain::budget_service::BudgetService;
use crate::domain::commands::transactions::{
    CreateTransactionCommand, DeleteTransactionCommand, DeleteTransactionResult,
    TransactionListQuery, TransactionListResult,
};
use crate::domain::models::transaction::DomainTransaction;
use crate::storage::{DbConnection, TransactionRepository};
use shared::Transaction;

const MAX_LABEL_LENGTH: usize = 256;
const DEFAULT_CATEGORY: &str = "Other";

/// Service for recording and querying transactions.
#[derive(Clone)]
pub struct TransactionService {
    transaction_repository: TransactionRepository,
    budget_service: BudgetService,
}

impl TransactionService {
    pub fn new(db: DbConnection, budget_service: BudgetService) -> Self {
        Self {
            transaction_repository: TransactionRepository::new(db),
            budget_service,
        }
    }

    pub async fn create_transaction(
        &self,
        command: CreateTransactionCommand,
    ) -> Result<DomainTransaction> {
        info!(
            "Creating transaction on budget {}: {}",
            command.budget_id, command.label
        );

        let (_, budget) = self.budget_service.member_budget(&command.budget_id).await?;

        let label = command.label.trim();
        if label.is_empty() || label.len() > MAX_LABEL_LENGTH {
            return Err(anyhow!(
                "Label must be between 1 and {} characters",
                MAX_LABEL_LENGTH
            ));
        }
        if command.amount <= 0.0 {
            return Err(anyhow!("Amount must be positive"));
        }

        let category = command
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        let transaction = DomainTransaction {
            id: Transaction::generate_id(),
            budget_id: budget.id,
            label: label.to_string(),
            amount: command.amount,
            kind: command.kind,
            date: command.date,
            category,
            description: command.description.unwrap_or_default(),
        };
        self.transaction_repository
            .store_transaction(&transaction)
            .await?;

        Ok(transaction)
    }

    /// List a budget's transactions newest first, optionally bounded to an
    /// inclusive date range.
    pub async fn list_transactions(
        &self,
        query: TransactionListQuery,
    ) -> Result<TransactionListResult> {
        let (_, budget) = self.budget_service.member_budget(&query.budget_id).await?;

        let transactions = self
            .transaction_repository
            .list_transactions(&budget.id, query.start_date, query.end_date)
            .await?;

        Ok(TransactionListResult { transactions })
    }

    pub async fn delete_transaction(
        &self,
        command: DeleteTransactionCommand,
    ) -> Result<DeleteTransactionResult> {
        info!(
            "Deleting transaction {} from budget {}",
            command.transaction_id, command.budget_id
        );

        let (_, budget) = self.budget_service.member_budget(&command.budget_id).await?;

        let deleted = self
            .transaction_repository
            .delete_transaction(&budget.id, &command.transaction_id)
            .await?;

        let success_message = if deleted {
            "Transaction deleted successfully".to_string()
        } else {
            format!("Transaction not found: {}", command.transaction_id)
        };

        Ok(DeleteTransactionResult {
            deleted,
            success_message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account_service::AccountService;
    use crate::domain::commands::accounts::CreateAccountCommand;
    use crate::domain::commands::budgets::CreateBudgetCommand;
    use crate::domain::models::budget::BudgetKind;
    use crate::domain::models::transaction::TransactionKind;
    use chrono::NaiveDate;

    async fn setup_test() -> (TransactionService, String) {
        let db = DbConnection::init_test().await.expect("init test db");
        let account_service = AccountService::new(db.clone());
        let budget_service = BudgetService::new(db.clone(), account_service.clone());
        let service = TransactionService::new(db, budget_service.clone());

        account_service
            .create_account(CreateAccountCommand {
                display_name: "Alex".to_string(),
                email: "alex@example.com".to_string(),
            })
            .await
            .expect("create account");
        let budget = budget_service
            .create_budget(CreateBudgetCommand {
                name: "Wallet".to_string(),
                icon: "💳".to_string(),
                theme_color: "blue".to_string(),
                kind: BudgetKind::Wallet,
                plan: None,
            })
            .await
            .expect("create budget")
            .budget;

        (service, budget.id)
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn create_command(budget_id: &str, label: &str, amount: f64, date: NaiveDate) -> CreateTransactionCommand {
        CreateTransactionCommand {
            budget_id: budget_id.to_string(),
            label: label.to_string(),
            amount,
            kind: TransactionKind::Expense,
            date,
            category: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_transaction_defaults() {
        let (service, budget_id) = setup_test().await;

        let tx = service
            .create_transaction(create_command(&budget_id, "Coffee", 4.5, d(2025, 6, 1)))
            .await
            .unwrap();
        assert_eq!(tx.category, "Other");
        assert_eq!(tx.description, "");
        assert_eq!(tx.kind, TransactionKind::Expense);
    }

    #[tokio::test]
    async fn test_create_transaction_rejects_bad_input() {
        let (service, budget_id) = setup_test().await;

        let empty_label = service
            .create_transaction(create_command(&budget_id, "  ", 4.5, d(2025, 6, 1)))
            .await;
        assert!(empty_label.is_err());

        let zero_amount = service
            .create_transaction(create_command(&budget_id, "Coffee", 0.0, d(2025, 6, 1)))
            .await;
        assert!(zero_amount.is_err());
        assert!(zero_amount
            .unwrap_err()
            .to_string()
            .contains("must be positive"));
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_range_filters() {
        let (service, budget_id) = setup_test().await;

        for (label, date) in [
            ("first", d(2025, 5, 1)),
            ("second", d(2025, 5, 15)),
            ("third", d(2025, 6, 1)),
        ] {
            service
                .create_transaction(create_command(&budget_id, label, 10.0, date))
                .await
                .unwrap();
        }

        let all = service
            .list_transactions(TransactionListQuery {
                budget_id: budget_id.clone(),
                start_date: None,
                end_date: None,
            })
            .await
            .unwrap()
            .transactions;
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].label, "third");
        assert_eq!(all[2].label, "first");

        let may_only = service
            .list_transactions(TransactionListQuery {
                budget_id: budget_id.clone(),
                start_date: Some(d(2025, 5, 1)),
                end_date: Some(d(2025, 5, 31)),
            })
            .await
            .unwrap()
            .transactions;
        assert_eq!(may_only.len(), 2);
        assert_eq!(may_only[0].label, "second");
    }

    #[tokio::test]
    async fn test_delete_transaction_reports_missing() {
        let (service, budget_id) = setup_test().await;

        let tx = service
            .create_transaction(create_command(&budget_id, "Coffee", 4.5, d(2025, 6, 1)))
            .await
            .unwrap();

        let deleted = service
            .delete_transaction(DeleteTransactionCommand {
                budget_id: budget_id.clone(),
                transaction_id: tx.id.clone(),
            })
            .await
            .unwrap();
        assert!(deleted.deleted);

        let again = service
            .delete_transaction(DeleteTransactionCommand {
                budget_id,
                transaction_id: tx.id,
            })
            .await
            .unwrap();
        assert!(!again.deleted);
        assert!(again.success_message.contains("not found"));
    }
}
