//! Budget management: creation, sharing, monthly plan editing, and demo
//! seeding.
//!
//! This service also owns the access rules every budget-scoped operation
//! goes through: a budget is visible to its owner and to accounts whose
//! email has been invited; destructive and sharing operations stay with
//! the owner.

use anyhow::{anyhow, Result};
use chrono::{Duration, Local, Utc};
use tracing::{info, warn};

use crate::domain::account_service::AccountService;
use crate::domain::commands::budgets::{
    AddExpenseLineCommand, BudgetListResult, BudgetResult, CreateBudgetCommand,
    DeleteBudgetResult, ExpenseLineResult, ExpenseLineSpec, MonthlyPlanSpec, ParticipantCommand,
    ParticipantsResult, RemoveExpenseLineCommand, RemoveExpenseLineResult, SeedDemoResult,
    SetSalaryCommand, UpdateBudgetCommand,
};
use crate::domain::models::account::DomainAccount;
use crate::domain::models::budget::{
    BudgetKind, DomainBudget, DomainExpenseLine, ExpenseLineKind,
};
use crate::domain::models::goal::DomainGoal;
use crate::domain::models::recurring::{DomainRecurringRule, Frequency};
use crate::domain::models::transaction::{DomainTransaction, TransactionKind};
use crate::storage::{
    BudgetRepository, DbConnection, GoalRepository, RecurringRepository, TransactionRepository,
};
use shared::{
    Budget, ExpenseLine, RecurringRule, SavingsGoal, Transaction,
};

/// Budgets an owner may hold at once; mirrors the original abuse cap.
const MAX_BUDGETS_PER_OWNER: i64 = 10;
const MAX_NAME_LENGTH: usize = 64;

/// Service for managing budgets.
#[derive(Clone)]
pub struct BudgetService {
    budget_repository: BudgetRepository,
    transaction_repository: TransactionRepository,
    goal_repository: GoalRepository,
    recurring_repository: RecurringRepository,
    account_service: AccountService,
}

impl BudgetService {
    pub fn new(db: DbConnection, account_service: AccountService) -> Self {
        Self {
            budget_repository: BudgetRepository::new(db.clone()),
            transaction_repository: TransactionRepository::new(db.clone()),
            goal_repository: GoalRepository::new(db.clone()),
            recurring_repository: RecurringRepository::new(db),
            account_service,
        }
    }

    /// Resolve a budget the active account may read and edit.
    pub(crate) async fn member_budget(
        &self,
        budget_id: &str,
    ) -> Result<(DomainAccount, DomainBudget)> {
        let account = self.account_service.require_active_account().await?;
        let budget = self
            .budget_repository
            .get_budget(budget_id)
            .await?
            .ok_or_else(|| anyhow!("Budget not found: {}", budget_id))?;
        if !budget.is_member(&account) {
            return Err(anyhow!(
                "Access denied: budget {} is not shared with {}",
                budget_id,
                account.email
            ));
        }
        Ok((account, budget))
    }

    /// Resolve a budget the active account owns.
    async fn owned_budget(&self, budget_id: &str) -> Result<(DomainAccount, DomainBudget)> {
        let (account, budget) = self.member_budget(budget_id).await?;
        if !budget.is_owner(&account) {
            return Err(anyhow!("Only the owner can manage budget {}", budget_id));
        }
        Ok((account, budget))
    }

    pub async fn create_budget(&self, command: CreateBudgetCommand) -> Result<BudgetResult> {
        info!("Creating budget: {:?}", command.name);

        let account = self.account_service.require_active_account().await?;

        let name = command.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Budget name cannot be empty"));
        }
        if name.len() > MAX_NAME_LENGTH {
            return Err(anyhow!(
                "Budget name cannot exceed {} characters",
                MAX_NAME_LENGTH
            ));
        }

        let owned = self.budget_repository.count_for_owner(&account.id).await?;
        if owned >= MAX_BUDGETS_PER_OWNER {
            return Err(anyhow!(
                "Budget limit of {} reached. Delete one first.",
                MAX_BUDGETS_PER_OWNER
            ));
        }

        let plan = match command.kind {
            BudgetKind::Monthly => command.plan,
            BudgetKind::Wallet => {
                if command.plan.is_some() {
                    warn!("Ignoring plan data supplied for wallet budget {}", name);
                }
                None
            }
        };

        if let Some(plan) = &plan {
            Self::validate_plan(plan)?;
        }

        let now = Utc::now().to_rfc3339();
        let budget = DomainBudget {
            id: Budget::generate_id(),
            owner_id: account.id.clone(),
            name: name.to_string(),
            icon: command.icon,
            theme_color: command.theme_color,
            kind: command.kind,
            salary: plan.as_ref().map(|p| p.salary).unwrap_or(0.0),
            participants: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        };
        self.budget_repository.store_budget(&budget).await?;

        if let Some(plan) = &plan {
            self.store_initial_lines(&budget.id, &plan.fixed, ExpenseLineKind::Fixed)
                .await?;
            self.store_initial_lines(&budget.id, &plan.variable, ExpenseLineKind::Variable)
                .await?;
        }

        info!("Created budget {} for {}", budget.id, account.email);

        Ok(BudgetResult {
            budget,
            success_message: "Budget created successfully".to_string(),
        })
    }

    fn validate_plan(plan: &MonthlyPlanSpec) -> Result<()> {
        if plan.salary < 0.0 {
            return Err(anyhow!("Salary cannot be negative"));
        }
        for line in plan.fixed.iter().chain(plan.variable.iter()) {
            if line.label.trim().is_empty() {
                return Err(anyhow!("Expense line label cannot be empty"));
            }
            if line.amount <= 0.0 {
                return Err(anyhow!("Expense line amount must be positive"));
            }
        }
        Ok(())
    }

    async fn store_initial_lines(
        &self,
        budget_id: &str,
        specs: &[ExpenseLineSpec],
        kind: ExpenseLineKind,
    ) -> Result<()> {
        for spec in specs {
            let line = DomainExpenseLine {
                id: ExpenseLine::generate_id(),
                budget_id: budget_id.to_string(),
                label: spec.label.trim().to_string(),
                amount: spec.amount,
                kind,
            };
            self.budget_repository.add_expense_line(&line).await?;
        }
        Ok(())
    }

    /// List budgets visible to the active account: owned, or shared with
    /// its email.
    pub async fn list_budgets(&self) -> Result<BudgetListResult> {
        let account = self.account_service.require_active_account().await?;
        let budgets = self
            .budget_repository
            .list_budgets_for(&account.id, &account.email)
            .await?;
        Ok(BudgetListResult { budgets })
    }

    pub async fn update_budget(&self, command: UpdateBudgetCommand) -> Result<BudgetResult> {
        info!("Updating budget: {}", command.budget_id);

        let (_, mut budget) = self.member_budget(&command.budget_id).await?;

        if let Some(name) = command.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(anyhow!("Budget name cannot be empty"));
            }
            if name.len() > MAX_NAME_LENGTH {
                return Err(anyhow!(
                    "Budget name cannot exceed {} characters",
                    MAX_NAME_LENGTH
                ));
            }
            budget.name = name;
        }
        if let Some(icon) = command.icon {
            budget.icon = icon;
        }
        if let Some(theme_color) = command.theme_color {
            budget.theme_color = theme_color;
        }
        budget.updated_at = Utc::now().to_rfc3339();

        self.budget_repository
            .update_budget_profile(
                &budget.id,
                &budget.name,
                &budget.icon,
                &budget.theme_color,
                &budget.updated_at,
            )
            .await?;

        Ok(BudgetResult {
            budget,
            success_message: "Budget updated successfully".to_string(),
        })
    }

    pub async fn delete_budget(&self, budget_id: &str) -> Result<DeleteBudgetResult> {
        info!("Deleting budget: {}", budget_id);

        self.owned_budget(budget_id).await?;
        self.budget_repository.delete_budget(budget_id).await?;

        Ok(DeleteBudgetResult {
            success_message: "Budget deleted successfully".to_string(),
        })
    }

    pub async fn invite_participant(
        &self,
        command: ParticipantCommand,
    ) -> Result<ParticipantsResult> {
        info!(
            "Inviting {} to budget {}",
            command.email, command.budget_id
        );

        let (account, budget) = self.owned_budget(&command.budget_id).await?;

        let email = command.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(anyhow!("Invalid email address: {}", command.email));
        }
        if email == account.email {
            return Err(anyhow!("You already own this budget"));
        }
        if budget.participants.iter().any(|p| p == &email) {
            return Err(anyhow!("{} is already a participant", email));
        }

        self.budget_repository
            .add_participant(&budget.id, &email)
            .await?;
        let participants = self.budget_repository.list_participants(&budget.id).await?;

        Ok(ParticipantsResult {
            participants,
            success_message: format!("Invitation sent to {}", email),
        })
    }

    pub async fn remove_participant(
        &self,
        command: ParticipantCommand,
    ) -> Result<ParticipantsResult> {
        info!(
            "Removing {} from budget {}",
            command.email, command.budget_id
        );

        let (_, budget) = self.owned_budget(&command.budget_id).await?;

        let email = command.email.trim().to_lowercase();
        let removed = self
            .budget_repository
            .remove_participant(&budget.id, &email)
            .await?;
        if !removed {
            return Err(anyhow!("Participant not found: {}", email));
        }
        let participants = self.budget_repository.list_participants(&budget.id).await?;

        Ok(ParticipantsResult {
            participants,
            success_message: format!("{} removed from budget", email),
        })
    }

    pub async fn set_salary(&self, command: SetSalaryCommand) -> Result<BudgetResult> {
        let (_, budget) = self.member_budget(&command.budget_id).await?;

        if budget.kind != BudgetKind::Monthly {
            return Err(anyhow!("Budget {} is not a monthly budget", budget.id));
        }
        if command.salary < 0.0 {
            return Err(anyhow!("Salary cannot be negative"));
        }

        let updated_at = Utc::now().to_rfc3339();
        self.budget_repository
            .set_salary(&budget.id, command.salary, &updated_at)
            .await?;

        let budget = self
            .budget_repository
            .get_budget(&command.budget_id)
            .await?
            .ok_or_else(|| anyhow!("Budget not found: {}", command.budget_id))?;

        Ok(BudgetResult {
            budget,
            success_message: "Salary updated successfully".to_string(),
        })
    }

    pub async fn add_expense_line(
        &self,
        command: AddExpenseLineCommand,
    ) -> Result<ExpenseLineResult> {
        let (_, budget) = self.member_budget(&command.budget_id).await?;

        if budget.kind != BudgetKind::Monthly {
            return Err(anyhow!("Budget {} is not a monthly budget", budget.id));
        }
        if command.label.trim().is_empty() {
            return Err(anyhow!("Expense line label cannot be empty"));
        }
        if command.amount <= 0.0 {
            return Err(anyhow!("Expense line amount must be positive"));
        }

        let line = DomainExpenseLine {
            id: ExpenseLine::generate_id(),
            budget_id: budget.id.clone(),
            label: command.label.trim().to_string(),
            amount: command.amount,
            kind: command.kind,
        };
        self.budget_repository.add_expense_line(&line).await?;

        Ok(ExpenseLineResult {
            line,
            success_message: "Expense line added".to_string(),
        })
    }

    pub async fn remove_expense_line(
        &self,
        command: RemoveExpenseLineCommand,
    ) -> Result<RemoveExpenseLineResult> {
        let (_, budget) = self.member_budget(&command.budget_id).await?;

        let removed = self
            .budget_repository
            .delete_expense_line(&budget.id, &command.line_id)
            .await?;
        if !removed {
            return Err(anyhow!("Expense line not found: {}", command.line_id));
        }

        Ok(RemoveExpenseLineResult {
            success_message: "Expense line removed".to_string(),
        })
    }

    /// Seed a demo wallet and monthly plan for the active account, mirroring
    /// the original application's demo mode.
    pub async fn seed_demo_data(&self) -> Result<SeedDemoResult> {
        info!("Seeding demo data");

        let today = Local::now().date_naive();
        let yesterday = today - Duration::days(1);
        let now = Utc::now().to_rfc3339();

        // Wallet with a few days of activity.
        let wallet = self
            .create_budget(CreateBudgetCommand {
                name: "Main Account".to_string(),
                icon: "💳".to_string(),
                theme_color: "blue".to_string(),
                kind: BudgetKind::Wallet,
                plan: None,
            })
            .await?
            .budget;

        let wallet_transactions = [
            ("Salary", 3500.0, TransactionKind::Income, today, "Salary", "Monthly transfer"),
            ("Rent", 1200.0, TransactionKind::Expense, today, "Housing", ""),
            ("Groceries", 154.30, TransactionKind::Expense, yesterday, "Food", ""),
            ("Transport", 85.0, TransactionKind::Expense, yesterday, "Transport", ""),
            ("Restaurant", 65.50, TransactionKind::Expense, yesterday, "Leisure", ""),
            ("Freelance", 450.0, TransactionKind::Income, yesterday, "Extra income", ""),
        ];
        for (label, amount, kind, date, category, description) in wallet_transactions {
            self.transaction_repository
                .store_transaction(&DomainTransaction {
                    id: Transaction::generate_id(),
                    budget_id: wallet.id.clone(),
                    label: label.to_string(),
                    amount,
                    kind,
                    date,
                    category: category.to_string(),
                    description: description.to_string(),
                })
                .await?;
        }

        self.goal_repository
            .store_goal(&DomainGoal {
                id: SavingsGoal::generate_id(),
                budget_id: wallet.id.clone(),
                name: "Vacation".to_string(),
                target_amount: 2000.0,
                current_amount: 1250.0,
                icon: "✈️".to_string(),
                color: "orange".to_string(),
                created_at: now.clone(),
                updated_at: now.clone(),
            })
            .await?;

        self.recurring_repository
            .store_rule(&DomainRecurringRule {
                id: RecurringRule::generate_id(),
                budget_id: wallet.id.clone(),
                label: "Netflix".to_string(),
                amount: 15.99,
                kind: TransactionKind::Expense,
                category: "Subscriptions".to_string(),
                frequency: Frequency::Monthly,
                next_due_date: today + Duration::days(20),
            })
            .await?;

        // Monthly envelope plan with matching activity.
        let monthly = self
            .create_budget(CreateBudgetCommand {
                name: "Monthly Plan".to_string(),
                icon: "📅".to_string(),
                theme_color: "purple".to_string(),
                kind: BudgetKind::Monthly,
                plan: Some(MonthlyPlanSpec {
                    salary: 4200.0,
                    fixed: vec![
                        ExpenseLineSpec { label: "Rent".to_string(), amount: 1350.0 },
                        ExpenseLineSpec { label: "Internet + Phone".to_string(), amount: 65.0 },
                        ExpenseLineSpec { label: "Electricity".to_string(), amount: 90.0 },
                        ExpenseLineSpec { label: "Car insurance".to_string(), amount: 45.0 },
                    ],
                    variable: vec![
                        ExpenseLineSpec { label: "Groceries".to_string(), amount: 400.0 },
                        ExpenseLineSpec { label: "Going out".to_string(), amount: 200.0 },
                        ExpenseLineSpec { label: "Fuel".to_string(), amount: 150.0 },
                    ],
                }),
            })
            .await?
            .budget;

        let monthly_transactions = [
            ("Salary", 4200.0, TransactionKind::Income, today, "Salary", ""),
            ("Rent", 1350.0, TransactionKind::Expense, today, "Housing", ""),
            ("Phone bill", 65.0, TransactionKind::Expense, yesterday, "Bills", ""),
            ("Supermarket", 124.50, TransactionKind::Expense, yesterday, "Food", ""),
            ("Cinema", 24.0, TransactionKind::Expense, yesterday, "Leisure", ""),
            ("Bar", 45.0, TransactionKind::Expense, yesterday, "Leisure", ""),
        ];
        for (label, amount, kind, date, category, description) in monthly_transactions {
            self.transaction_repository
                .store_transaction(&DomainTransaction {
                    id: Transaction::generate_id(),
                    budget_id: monthly.id.clone(),
                    label: label.to_string(),
                    amount,
                    kind,
                    date,
                    category: category.to_string(),
                    description: description.to_string(),
                })
                .await?;
        }

        Ok(SeedDemoResult {
            budget_ids: vec![wallet.id, monthly.id],
            success_message: "Demo data generated".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::accounts::{CreateAccountCommand, SetActiveAccountCommand};

    async fn setup_test() -> BudgetService {
        let db = DbConnection::init_test().await.expect("init test db");
        let account_service = AccountService::new(db.clone());
        BudgetService::new(db, account_service)
    }

    async fn create_account(service: &BudgetService, name: &str, email: &str) -> DomainAccount {
        service
            .account_service
            .create_account(CreateAccountCommand {
                display_name: name.to_string(),
                email: email.to_string(),
            })
            .await
            .expect("create account")
            .account
    }

    fn wallet_command(name: &str) -> CreateBudgetCommand {
        CreateBudgetCommand {
            name: name.to_string(),
            icon: "💳".to_string(),
            theme_color: "blue".to_string(),
            kind: BudgetKind::Wallet,
            plan: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_budget() {
        let service = setup_test().await;
        create_account(&service, "Alex", "alex@example.com").await;

        let result = service.create_budget(wallet_command("Groceries")).await.unwrap();
        assert_eq!(result.budget.name, "Groceries");
        assert_eq!(result.budget.kind, BudgetKind::Wallet);

        let listed = service.list_budgets().await.unwrap();
        assert_eq!(listed.budgets.len(), 1);
        assert_eq!(listed.budgets[0].id, result.budget.id);
    }

    #[tokio::test]
    async fn test_budget_cap_is_enforced() {
        let service = setup_test().await;
        create_account(&service, "Alex", "alex@example.com").await;

        for i in 0..10 {
            service
                .create_budget(wallet_command(&format!("Budget {}", i)))
                .await
                .unwrap();
        }
        let result = service.create_budget(wallet_command("One too many")).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("limit"));
    }

    #[tokio::test]
    async fn test_monthly_budget_stores_initial_plan() {
        let service = setup_test().await;
        create_account(&service, "Alex", "alex@example.com").await;

        let budget = service
            .create_budget(CreateBudgetCommand {
                name: "Plan".to_string(),
                icon: "📅".to_string(),
                theme_color: "purple".to_string(),
                kind: BudgetKind::Monthly,
                plan: Some(MonthlyPlanSpec {
                    salary: 4200.0,
                    fixed: vec![ExpenseLineSpec {
                        label: "Rent".to_string(),
                        amount: 1350.0,
                    }],
                    variable: vec![ExpenseLineSpec {
                        label: "Groceries".to_string(),
                        amount: 400.0,
                    }],
                }),
            })
            .await
            .unwrap()
            .budget;

        assert_eq!(budget.salary, 4200.0);
        let lines = service
            .budget_repository
            .list_expense_lines(&budget.id)
            .await
            .unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[tokio::test]
    async fn test_plan_operations_rejected_for_wallet() {
        let service = setup_test().await;
        create_account(&service, "Alex", "alex@example.com").await;
        let wallet = service.create_budget(wallet_command("Wallet")).await.unwrap().budget;

        let result = service
            .set_salary(SetSalaryCommand {
                budget_id: wallet.id.clone(),
                salary: 1000.0,
            })
            .await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("not a monthly budget"));
    }

    #[tokio::test]
    async fn test_invite_and_visibility_for_participant() {
        let service = setup_test().await;
        let owner = create_account(&service, "Alex", "alex@example.com").await;
        let guest = create_account(&service, "Sam", "sam@example.com").await;
        assert_eq!(owner.email, "alex@example.com");

        let budget = service.create_budget(wallet_command("Shared")).await.unwrap().budget;
        let result = service
            .invite_participant(ParticipantCommand {
                budget_id: budget.id.clone(),
                email: "Sam@Example.com".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(result.participants, vec!["sam@example.com".to_string()]);

        // Duplicate invitations are rejected.
        let dup = service
            .invite_participant(ParticipantCommand {
                budget_id: budget.id.clone(),
                email: "sam@example.com".to_string(),
            })
            .await;
        assert!(dup.is_err());
        assert!(dup.unwrap_err().to_string().contains("already"));

        // The guest sees the shared budget once active.
        service
            .account_service
            .set_active_account(SetActiveAccountCommand {
                account_id: guest.id.clone(),
            })
            .await
            .unwrap();
        let listed = service.list_budgets().await.unwrap();
        assert_eq!(listed.budgets.len(), 1);
        assert_eq!(listed.budgets[0].id, budget.id);

        // But only the owner can invite.
        let forbidden = service
            .invite_participant(ParticipantCommand {
                budget_id: budget.id.clone(),
                email: "third@example.com".to_string(),
            })
            .await;
        assert!(forbidden.is_err());
        assert!(forbidden
            .unwrap_err()
            .to_string()
            .contains("Only the owner"));
    }

    #[tokio::test]
    async fn test_stranger_cannot_access_budget() {
        let service = setup_test().await;
        create_account(&service, "Alex", "alex@example.com").await;
        let budget = service.create_budget(wallet_command("Private")).await.unwrap().budget;

        let stranger = create_account(&service, "Eve", "eve@example.com").await;
        service
            .account_service
            .set_active_account(SetActiveAccountCommand {
                account_id: stranger.id,
            })
            .await
            .unwrap();

        let result = service.member_budget(&budget.id).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Access denied"));
    }

    #[tokio::test]
    async fn test_delete_budget_cascades() {
        let service = setup_test().await;
        create_account(&service, "Alex", "alex@example.com").await;

        let seeded = service.seed_demo_data().await.unwrap();
        assert_eq!(seeded.budget_ids.len(), 2);
        let wallet_id = &seeded.budget_ids[0];

        let transactions = service
            .transaction_repository
            .list_transactions(wallet_id, None, None)
            .await
            .unwrap();
        assert_eq!(transactions.len(), 6);

        service.delete_budget(wallet_id).await.unwrap();

        let transactions = service
            .transaction_repository
            .list_transactions(wallet_id, None, None)
            .await
            .unwrap();
        assert!(transactions.is_empty());
        let goals = service.goal_repository.list_goals(wallet_id).await.unwrap();
        assert!(goals.is_empty());
        let rules = service
            .recurring_repository
            .list_rules(wallet_id)
            .await
            .unwrap();
        assert!(rules.is_empty());
    }

    #[tokio::test]
    async fn test_update_budget_profile() {
        let service = setup_test().await;
        create_account(&service, "Alex", "alex@example.com").await;
        let budget = service.create_budget(wallet_command("Old name")).await.unwrap().budget;

        let updated = service
            .update_budget(UpdateBudgetCommand {
                budget_id: budget.id.clone(),
                name: Some("New name".to_string()),
                icon: None,
                theme_color: Some("green".to_string()),
            })
            .await
            .unwrap()
            .budget;
        assert_eq!(updated.name, "New name");
        assert_eq!(updated.icon, budget.icon);
        assert_eq!(updated.theme_color, "green");
    }
}
