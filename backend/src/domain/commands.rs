//! Domain-level command and query types.
//!
//! These structs are used by services inside the domain layer and are
//! **not** exposed over the public API. The REST layer is responsible for
//! mapping the public DTOs defined in the `shared` crate to these internal
//! types.

pub mod accounts {
    use crate::domain::models::account::DomainAccount;

    /// Input for registering a new account.
    #[derive(Debug, Clone)]
    pub struct CreateAccountCommand {
        pub display_name: String,
        pub email: String,
    }

    /// Result of registering an account.
    #[derive(Debug, Clone)]
    pub struct CreateAccountResult {
        pub account: DomainAccount,
        pub success_message: String,
    }

    /// Input for switching the active account.
    #[derive(Debug, Clone)]
    pub struct SetActiveAccountCommand {
        pub account_id: String,
    }

    /// Result of switching the active account.
    #[derive(Debug, Clone)]
    pub struct SetActiveAccountResult {
        pub account: DomainAccount,
        pub success_message: String,
    }

    /// Result of listing accounts.
    #[derive(Debug, Clone)]
    pub struct AccountListResult {
        pub accounts: Vec<DomainAccount>,
    }
}

pub mod budgets {
    use crate::domain::models::budget::{
        BudgetKind, DomainBudget, DomainExpenseLine, ExpenseLineKind,
    };

    /// One expense line supplied with a new monthly budget.
    #[derive(Debug, Clone)]
    pub struct ExpenseLineSpec {
        pub label: String,
        pub amount: f64,
    }

    /// Initial plan supplied with a new monthly budget.
    #[derive(Debug, Clone)]
    pub struct MonthlyPlanSpec {
        pub salary: f64,
        pub fixed: Vec<ExpenseLineSpec>,
        pub variable: Vec<ExpenseLineSpec>,
    }

    /// Input for creating a budget.
    #[derive(Debug, Clone)]
    pub struct CreateBudgetCommand {
        pub name: String,
        pub icon: String,
        pub theme_color: String,
        pub kind: BudgetKind,
        pub plan: Option<MonthlyPlanSpec>,
    }

    /// Input for updating a budget's profile fields.
    #[derive(Debug, Clone)]
    pub struct UpdateBudgetCommand {
        pub budget_id: String,
        pub name: Option<String>,
        pub icon: Option<String>,
        pub theme_color: Option<String>,
    }

    /// Result of creating or updating a budget.
    #[derive(Debug, Clone)]
    pub struct BudgetResult {
        pub budget: DomainBudget,
        pub success_message: String,
    }

    /// Result of listing visible budgets.
    #[derive(Debug, Clone)]
    pub struct BudgetListResult {
        pub budgets: Vec<DomainBudget>,
    }

    /// Result of deleting a budget.
    #[derive(Debug, Clone)]
    pub struct DeleteBudgetResult {
        pub success_message: String,
    }

    /// Input for inviting or removing a participant.
    #[derive(Debug, Clone)]
    pub struct ParticipantCommand {
        pub budget_id: String,
        pub email: String,
    }

    /// Result of a participant change, carrying the updated list.
    #[derive(Debug, Clone)]
    pub struct ParticipantsResult {
        pub participants: Vec<String>,
        pub success_message: String,
    }

    /// Input for setting a monthly budget's salary.
    #[derive(Debug, Clone)]
    pub struct SetSalaryCommand {
        pub budget_id: String,
        pub salary: f64,
    }

    /// Input for adding an expense line to a monthly plan.
    #[derive(Debug, Clone)]
    pub struct AddExpenseLineCommand {
        pub budget_id: String,
        pub label: String,
        pub amount: f64,
        pub kind: ExpenseLineKind,
    }

    /// Result of adding an expense line.
    #[derive(Debug, Clone)]
    pub struct ExpenseLineResult {
        pub line: DomainExpenseLine,
        pub success_message: String,
    }

    /// Input for removing an expense line.
    #[derive(Debug, Clone)]
    pub struct RemoveExpenseLineCommand {
        pub budget_id: String,
        pub line_id: String,
    }

    /// Result of removing an expense line.
    #[derive(Debug, Clone)]
    pub struct RemoveExpenseLineResult {
        pub success_message: String,
    }

    /// Result of seeding demo data.
    #[derive(Debug, Clone)]
    pub struct SeedDemoResult {
        pub budget_ids: Vec<String>,
        pub success_message: String,
    }
}

pub mod transactions {
    use chrono::NaiveDate;

    use crate::domain::models::transaction::{DomainTransaction, TransactionKind};

    /// Input for recording a new transaction.
    #[derive(Debug, Clone)]
    pub struct CreateTransactionCommand {
        pub budget_id: String,
        pub label: String,
        pub amount: f64,
        pub kind: TransactionKind,
        pub date: NaiveDate,
        pub category: Option<String>,
        pub description: Option<String>,
    }

    /// Query parameters for listing transactions; bounds are inclusive.
    #[derive(Debug, Clone)]
    pub struct TransactionListQuery {
        pub budget_id: String,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
    }

    /// Result of listing transactions, newest first.
    #[derive(Debug, Clone)]
    pub struct TransactionListResult {
        pub transactions: Vec<DomainTransaction>,
    }

    /// Input for deleting a transaction.
    #[derive(Debug, Clone)]
    pub struct DeleteTransactionCommand {
        pub budget_id: String,
        pub transaction_id: String,
    }

    /// Result of deleting a transaction.
    #[derive(Debug, Clone)]
    pub struct DeleteTransactionResult {
        pub deleted: bool,
        pub success_message: String,
    }
}

pub mod goals {
    use crate::domain::models::goal::DomainGoal;

    /// Input for creating a savings goal.
    #[derive(Debug, Clone)]
    pub struct CreateGoalCommand {
        pub budget_id: String,
        pub name: String,
        pub target_amount: f64,
        pub icon: String,
        pub color: Option<String>,
        pub current_amount: Option<f64>,
    }

    /// Input for setting a goal's accumulated progress.
    #[derive(Debug, Clone)]
    pub struct UpdateGoalProgressCommand {
        pub budget_id: String,
        pub goal_id: String,
        pub current_amount: f64,
    }

    /// Result of creating or updating a goal. `completed` is true when the
    /// goal's progress has met its target.
    #[derive(Debug, Clone)]
    pub struct GoalResult {
        pub goal: DomainGoal,
        pub completed: bool,
        pub success_message: String,
    }

    /// Result of listing goals.
    #[derive(Debug, Clone)]
    pub struct GoalListResult {
        pub goals: Vec<DomainGoal>,
    }

    /// Input for deleting a goal.
    #[derive(Debug, Clone)]
    pub struct DeleteGoalCommand {
        pub budget_id: String,
        pub goal_id: String,
    }

    /// Result of deleting a goal.
    #[derive(Debug, Clone)]
    pub struct DeleteGoalResult {
        pub success_message: String,
    }
}

pub mod recurring {
    use chrono::NaiveDate;

    use crate::domain::models::recurring::{DomainRecurringRule, Frequency};
    use crate::domain::models::transaction::TransactionKind;

    /// Input for registering a recurring rule.
    #[derive(Debug, Clone)]
    pub struct CreateRecurringRuleCommand {
        pub budget_id: String,
        pub label: String,
        pub amount: f64,
        pub kind: TransactionKind,
        pub category: Option<String>,
        pub frequency: Frequency,
        pub next_due_date: NaiveDate,
    }

    /// Result of registering a rule.
    #[derive(Debug, Clone)]
    pub struct RecurringRuleResult {
        pub rule: DomainRecurringRule,
        pub success_message: String,
    }

    /// Result of listing rules.
    #[derive(Debug, Clone)]
    pub struct RecurringRuleListResult {
        pub rules: Vec<DomainRecurringRule>,
    }

    /// Input for deleting a rule.
    #[derive(Debug, Clone)]
    pub struct DeleteRecurringRuleCommand {
        pub budget_id: String,
        pub rule_id: String,
    }

    /// Result of deleting a rule.
    #[derive(Debug, Clone)]
    pub struct DeleteRecurringRuleResult {
        pub success_message: String,
    }

    /// Result of a materialization run.
    #[derive(Debug, Clone)]
    pub struct ProcessRecurringResult {
        pub generated_count: usize,
        pub success_message: String,
    }
}

pub mod export {
    use crate::domain::models::budget::{DomainBudget, DomainExpenseLine};
    use crate::domain::models::goal::DomainGoal;
    use crate::domain::models::recurring::DomainRecurringRule;
    use crate::domain::models::transaction::DomainTransaction;

    /// Everything belonging to one budget, assembled for backup.
    #[derive(Debug, Clone)]
    pub struct ExportBundle {
        pub budget: DomainBudget,
        pub expense_lines: Vec<DomainExpenseLine>,
        pub transactions: Vec<DomainTransaction>,
        pub goals: Vec<DomainGoal>,
        pub recurring: Vec<DomainRecurringRule>,
        pub exported_at: String,
    }
}
