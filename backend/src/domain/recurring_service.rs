//! Recurring transaction rules and their materialization.
//!
//! A rule carries a `next_due_date`; materialization walks every rule and,
//! while that date is not in the future, emits one transaction dated on it
//! and advances the date by the rule's cadence. Because due dates always
//! end up strictly after today, running the sweep twice on the same day is
//! a no-op.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use tracing::{error, info};

use crate::domain::budget_service::BudgetService;
use crate::domain::commands::recurring::{
    CreateRecurringRuleCommand, DeleteRecurringRuleCommand, DeleteRecurringRuleResult,
    ProcessRecurringResult, RecurringRuleListResult, RecurringRuleResult,
};
use crate::domain::models::recurring::DomainRecurringRule;
use crate::domain::models::transaction::DomainTransaction;
use crate::storage::{DbConnection, RecurringRepository, TransactionRepository};
use shared::{RecurringRule, Transaction};

const MAX_LABEL_LENGTH: usize = 256;
const DEFAULT_CATEGORY: &str = "Other";
const GENERATED_DESCRIPTION: &str = "Generated automatically (recurring)";

/// Service for recurring rules and the due-date sweep.
#[derive(Clone)]
pub struct RecurringService {
    recurring_repository: RecurringRepository,
    transaction_repository: TransactionRepository,
    budget_service: BudgetService,
}

impl RecurringService {
    pub fn new(db: DbConnection, budget_service: BudgetService) -> Self {
        Self {
            recurring_repository: RecurringRepository::new(db.clone()),
            transaction_repository: TransactionRepository::new(db),
            budget_service,
        }
    }

    pub async fn create_rule(
        &self,
        command: CreateRecurringRuleCommand,
    ) -> Result<RecurringRuleResult> {
        info!(
            "Creating recurring rule on budget {}: {}",
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

        let rule = DomainRecurringRule {
            id: RecurringRule::generate_id(),
            budget_id: budget.id,
            label: label.to_string(),
            amount: command.amount,
            kind: command.kind,
            category,
            frequency: command.frequency,
            next_due_date: command.next_due_date,
        };
        self.recurring_repository.store_rule(&rule).await?;

        Ok(RecurringRuleResult {
            rule,
            success_message: "Recurring transaction scheduled".to_string(),
        })
    }

    pub async fn list_rules(&self, budget_id: &str) -> Result<RecurringRuleListResult> {
        let (_, budget) = self.budget_service.member_budget(budget_id).await?;
        let rules = self.recurring_repository.list_rules(&budget.id).await?;
        Ok(RecurringRuleListResult { rules })
    }

    pub async fn delete_rule(
        &self,
        command: DeleteRecurringRuleCommand,
    ) -> Result<DeleteRecurringRuleResult> {
        info!(
            "Deleting recurring rule {} from budget {}",
            command.rule_id, command.budget_id
        );

        let (_, budget) = self.budget_service.member_budget(&command.budget_id).await?;

        let deleted = self
            .recurring_repository
            .delete_rule(&budget.id, &command.rule_id)
            .await?;
        if !deleted {
            return Err(anyhow!("Recurring rule not found: {}", command.rule_id));
        }

        Ok(DeleteRecurringRuleResult {
            success_message: "Recurring rule deleted".to_string(),
        })
    }

    /// Materialize due transactions for every budget visible to the active
    /// account.
    pub async fn process_due_rules(&self, today: NaiveDate) -> Result<ProcessRecurringResult> {
        let budgets = self.budget_service.list_budgets().await?.budgets;

        let mut generated_count = 0;
        for budget in &budgets {
            let rules = self.recurring_repository.list_rules(&budget.id).await?;
            generated_count += self.materialize_rules(rules, today).await?;
        }

        info!(
            "Recurring sweep generated {} transaction(s) across {} budget(s)",
            generated_count,
            budgets.len()
        );

        Ok(ProcessRecurringResult {
            generated_count,
            success_message: match generated_count {
                0 => "No recurring transactions were due".to_string(),
                1 => "1 recurring transaction generated".to_string(),
                n => format!("{} recurring transactions generated", n),
            },
        })
    }

    /// Materialize due transactions for every rule in the store, regardless
    /// of account. Runs once at service startup.
    pub async fn process_all(&self, today: NaiveDate) -> Result<usize> {
        let rules = self.recurring_repository.list_all_rules().await?;
        let generated = self.materialize_rules(rules, today).await?;
        if generated > 0 {
            info!("Startup recurring sweep generated {} transaction(s)", generated);
        }
        Ok(generated)
    }

    /// Core loop: for each rule, emit one transaction per elapsed due date
    /// and advance the date past today.
    async fn materialize_rules(
        &self,
        rules: Vec<DomainRecurringRule>,
        today: NaiveDate,
    ) -> Result<usize> {
        let mut generated = 0;
        for mut rule in rules {
            let original_due = rule.next_due_date;
            while rule.next_due_date <= today {
                let transaction = DomainTransaction {
                    id: Transaction::generate_id(),
                    budget_id: rule.budget_id.clone(),
                    label: rule.label.clone(),
                    amount: rule.amount,
                    kind: rule.kind,
                    date: rule.next_due_date,
                    category: rule.category.clone(),
                    description: GENERATED_DESCRIPTION.to_string(),
                };
                if let Err(e) = self.transaction_repository.store_transaction(&transaction).await {
                    // Leave the rule's due date untouched so the next sweep retries.
                    error!("Failed to materialize rule {}: {}", rule.id, e);
                    return Err(e);
                }
                generated += 1;
                rule.next_due_date = rule.frequency.advance(rule.next_due_date);
            }
            if rule.next_due_date != original_due {
                self.recurring_repository
                    .update_next_due_date(&rule.id, rule.next_due_date)
                    .await?;
            }
        }
        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account_service::AccountService;
    use crate::domain::commands::accounts::CreateAccountCommand;
    use crate::domain::commands::budgets::CreateBudgetCommand;
    use crate::domain::models::budget::BudgetKind;
    use crate::domain::models::recurring::Frequency;
    use crate::domain::models::transaction::TransactionKind;

    async fn setup_test() -> (RecurringService, TransactionRepository, String) {
        let db = DbConnection::init_test().await.expect("init test db");
        let account_service = AccountService::new(db.clone());
        let budget_service = BudgetService::new(db.clone(), account_service.clone());
        let service = RecurringService::new(db.clone(), budget_service.clone());

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

        (service, TransactionRepository::new(db), budget.id)
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rule_command(
        budget_id: &str,
        frequency: Frequency,
        next_due_date: NaiveDate,
    ) -> CreateRecurringRuleCommand {
        CreateRecurringRuleCommand {
            budget_id: budget_id.to_string(),
            label: "Netflix".to_string(),
            amount: 15.99,
            kind: TransactionKind::Expense,
            category: Some("Subscriptions".to_string()),
            frequency,
            next_due_date,
        }
    }

    #[tokio::test]
    async fn test_rule_not_yet_due_generates_nothing() {
        let (service, transactions, budget_id) = setup_test().await;
        let today = d(2025, 6, 1);

        service
            .create_rule(rule_command(&budget_id, Frequency::Monthly, d(2025, 6, 15)))
            .await
            .unwrap();

        let result = service.process_due_rules(today).await.unwrap();
        assert_eq!(result.generated_count, 0);
        assert!(transactions
            .list_transactions(&budget_id, None, None)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_overdue_weekly_rule_catches_up() {
        let (service, transactions, budget_id) = setup_test().await;
        let today = d(2025, 6, 22);

        // Due three weeks back: the 1st, 8th, 15th and 22nd have elapsed.
        service
            .create_rule(rule_command(&budget_id, Frequency::Weekly, d(2025, 6, 1)))
            .await
            .unwrap();

        let result = service.process_due_rules(today).await.unwrap();
        assert_eq!(result.generated_count, 4);

        let generated = transactions
            .list_transactions(&budget_id, None, None)
            .await
            .unwrap();
        assert_eq!(generated.len(), 4);
        assert_eq!(generated[0].date, d(2025, 6, 22));
        assert_eq!(generated[3].date, d(2025, 6, 1));
        assert!(generated
            .iter()
            .all(|t| t.description == GENERATED_DESCRIPTION));

        let rules = service.list_rules(&budget_id).await.unwrap().rules;
        assert_eq!(rules[0].next_due_date, d(2025, 6, 29));
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent_per_day() {
        let (service, transactions, budget_id) = setup_test().await;
        let today = d(2025, 6, 22);

        service
            .create_rule(rule_command(&budget_id, Frequency::Weekly, d(2025, 6, 20)))
            .await
            .unwrap();

        let first = service.process_due_rules(today).await.unwrap();
        assert_eq!(first.generated_count, 1);

        let second = service.process_due_rules(today).await.unwrap();
        assert_eq!(second.generated_count, 0);
        assert_eq!(
            transactions
                .list_transactions(&budget_id, None, None)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_monthly_rule_clamps_across_short_months() {
        let (service, _, budget_id) = setup_test().await;

        service
            .create_rule(rule_command(&budget_id, Frequency::Monthly, d(2025, 1, 31)))
            .await
            .unwrap();

        // Sweeping on March 1st materializes Jan 31 and Feb 28.
        let result = service.process_due_rules(d(2025, 3, 1)).await.unwrap();
        assert_eq!(result.generated_count, 2);

        let rules = service.list_rules(&budget_id).await.unwrap().rules;
        assert_eq!(rules[0].next_due_date, d(2025, 3, 28));
    }

    #[tokio::test]
    async fn test_process_all_covers_every_budget() {
        let (service, transactions, budget_id) = setup_test().await;

        service
            .create_rule(rule_command(&budget_id, Frequency::Yearly, d(2024, 6, 1)))
            .await
            .unwrap();

        let generated = service.process_all(d(2025, 6, 1)).await.unwrap();
        assert_eq!(generated, 2);

        let listed = transactions
            .list_transactions(&budget_id, None, None)
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_rule_stops_generation() {
        let (service, _, budget_id) = setup_test().await;

        let rule = service
            .create_rule(rule_command(&budget_id, Frequency::Weekly, d(2025, 6, 1)))
            .await
            .unwrap()
            .rule;
        service
            .delete_rule(DeleteRecurringRuleCommand {
                budget_id: budget_id.clone(),
                rule_id: rule.id,
            })
            .await
            .unwrap();

        let result = service.process_due_rules(d(2025, 6, 22)).await.unwrap();
        assert_eq!(result.generated_count, 0);
    }
}
