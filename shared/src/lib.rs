//! Public data transfer types for the budget tracker.
//!
//! Everything in this crate crosses the REST boundary as JSON. The backend
//! maps these DTOs to its internal domain models; clients should treat the
//! shapes here as the API contract.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Direction of a transaction. Amounts are always positive; the kind
/// decides whether money comes in or goes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// Shape of a budget: an open-ended ledger or a fixed monthly envelope plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetKind {
    Wallet,
    Monthly,
}

/// Recurrence cadence for scheduled transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Monthly,
    Yearly,
}

/// Classification of a monthly plan expense line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseLineKind {
    Fixed,
    Variable,
}

/// An account that can own budgets and be invited to others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub display_name: String,
    /// Email address, unique across accounts; sharing invitations are keyed on it.
    pub email: String,
    /// RFC 3339 timestamp
    pub created_at: String,
    /// RFC 3339 timestamp
    pub updated_at: String,
}

/// A budget document. Wallet budgets are plain ledgers; monthly budgets
/// additionally carry a salary and expense lines (see [`ExpenseLine`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub icon: String,
    pub theme_color: String,
    pub kind: BudgetKind,
    /// Monthly income used by the envelope plan; always 0.0 for wallets.
    pub salary: f64,
    /// Emails of accounts this budget is shared with.
    pub participants: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A single expense line of a monthly plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseLine {
    pub id: String,
    pub budget_id: String,
    pub label: String,
    pub amount: f64,
    pub kind: ExpenseLineKind,
}

/// A recorded income or expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub budget_id: String,
    /// Short label shown in lists (max 256 characters)
    pub label: String,
    /// Always positive; direction is carried by `kind`
    pub amount: f64,
    pub kind: TransactionKind,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    pub category: String,
    pub description: String,
}

/// A savings goal with accumulated progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: String,
    pub budget_id: String,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub icon: String,
    pub color: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A template that generates dated transactions on a schedule until deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringRule {
    pub id: String,
    pub budget_id: String,
    pub label: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub category: String,
    pub frequency: Frequency,
    /// Next date this rule is due, `YYYY-MM-DD`
    pub next_due_date: String,
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub display_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub account: Account,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountListResponse {
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetActiveAccountRequest {
    pub account_id: String,
}

/// `account` is `None` when no account has been activated yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveAccountResponse {
    pub account: Option<Account>,
}

// ---------------------------------------------------------------------------
// Budgets
// ---------------------------------------------------------------------------

/// Initial expense line supplied when creating a monthly budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseLineInit {
    pub label: String,
    pub amount: f64,
}

/// Optional starting plan for a monthly budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPlanInit {
    pub salary: f64,
    pub fixed: Vec<ExpenseLineInit>,
    pub variable: Vec<ExpenseLineInit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBudgetRequest {
    pub name: String,
    pub icon: String,
    pub theme_color: String,
    pub kind: BudgetKind,
    /// Only meaningful for monthly budgets; ignored for wallets.
    pub plan: Option<MonthlyPlanInit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBudgetRequest {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub theme_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetResponse {
    pub budget: Budget,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetListResponse {
    pub budgets: Vec<Budget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteBudgetResponse {
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InviteParticipantRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantsResponse {
    pub participants: Vec<String>,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedDemoResponse {
    pub budget_ids: Vec<String>,
    pub success_message: String,
}

// ---------------------------------------------------------------------------
// Monthly plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetSalaryRequest {
    pub salary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddExpenseLineRequest {
    pub label: String,
    pub amount: f64,
    pub kind: ExpenseLineKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseLineResponse {
    pub line: ExpenseLine,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteExpenseLineResponse {
    pub success_message: String,
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub label: String,
    pub amount: f64,
    pub kind: TransactionKind,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    pub category: Option<String>,
    pub description: Option<String>,
    /// When set, a recurring rule is registered alongside the transaction,
    /// first due one cadence step after `date`.
    pub recurring: Option<Frequency>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub transaction: Transaction,
    pub recurring_rule: Option<RecurringRule>,
    pub success_message: String,
}

/// Query parameters for listing transactions; both bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionListRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteTransactionResponse {
    pub deleted: bool,
    pub success_message: String,
}

// ---------------------------------------------------------------------------
// Savings goals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGoalRequest {
    pub name: String,
    pub target_amount: f64,
    pub icon: String,
    pub color: Option<String>,
    /// Starting progress; defaults to 0.
    pub current_amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateGoalProgressRequest {
    pub current_amount: f64,
}

/// `completed` flips to true on the update that reaches the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalResponse {
    pub goal: SavingsGoal,
    pub completed: bool,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalListResponse {
    pub goals: Vec<SavingsGoal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteGoalResponse {
    pub success_message: String,
}

// ---------------------------------------------------------------------------
// Recurring rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRecurringRuleRequest {
    pub label: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub category: Option<String>,
    pub frequency: Frequency,
    /// First due date, `YYYY-MM-DD`
    pub next_due_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringRuleResponse {
    pub rule: RecurringRule,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringRuleListResponse {
    pub rules: Vec<RecurringRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRecurringRuleResponse {
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecurringResponse {
    pub generated_count: usize,
    pub success_message: String,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
}

/// One category's share of total expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySlice {
    pub category: String,
    pub total: f64,
    /// Fraction of overall expenses in [0, 1]; 0 when there are no expenses.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdownResponse {
    pub slices: Vec<CategorySlice>,
    pub total_expense: f64,
}

/// Income/expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub year: i32,
    /// 1-12
    pub month: u32,
    /// Short month label, e.g. "Jan"
    pub label: String,
    pub income: f64,
    pub expense: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResponse {
    pub points: Vec<TrendPoint>,
}

/// Envelope summary of a monthly budget. All ratios are against salary and
/// are 0 when salary is 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub salary: f64,
    pub total_fixed: f64,
    pub total_variable: f64,
    pub remaining: f64,
    pub fixed_ratio: f64,
    pub variable_ratio: f64,
    pub remaining_ratio: f64,
}

// ---------------------------------------------------------------------------
// AI advisor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorAskRequest {
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorReply {
    pub reply: String,
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Full backup document for a single budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetExport {
    pub budget: Budget,
    pub expense_lines: Vec<ExpenseLine>,
    pub transactions: Vec<Transaction>,
    pub goals: Vec<SavingsGoal>,
    pub recurring: Vec<RecurringRule>,
    /// RFC 3339 timestamp of when the backup was taken
    pub exported_at: String,
}

// ---------------------------------------------------------------------------
// Prefixed IDs
// ---------------------------------------------------------------------------

/// Error raised when a prefixed ID does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("invalid id format")]
    InvalidFormat,
    #[error("unexpected id prefix `{0}`")]
    WrongPrefix(String),
    #[error("invalid uuid in id")]
    InvalidUuid,
}

fn generate_prefixed(prefix: &str) -> String {
    format!("{}::{}", prefix, Uuid::new_v4())
}

fn parse_prefixed(prefix: &str, id: &str) -> Result<Uuid, IdError> {
    let parts: Vec<&str> = id.split("::").collect();
    if parts.len() != 2 {
        return Err(IdError::InvalidFormat);
    }
    if parts[0] != prefix {
        return Err(IdError::WrongPrefix(parts[0].to_string()));
    }
    Uuid::parse_str(parts[1]).map_err(|_| IdError::InvalidUuid)
}

macro_rules! prefixed_id {
    ($type:ty, $prefix:literal) => {
        impl $type {
            /// Generate a fresh ID of the form `<prefix>::<uuid>`.
            pub fn generate_id() -> String {
                generate_prefixed($prefix)
            }

            /// Validate an ID and extract its uuid component.
            pub fn parse_id(id: &str) -> Result<Uuid, IdError> {
                parse_prefixed($prefix, id)
            }
        }
    };
}

prefixed_id!(Account, "account");
prefixed_id!(Budget, "budget");
prefixed_id!(Transaction, "transaction");
prefixed_id!(SavingsGoal, "goal");
prefixed_id!(RecurringRule, "recurring");
prefixed_id!(ExpenseLine, "line");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_parse_budget_id() {
        let id = Budget::generate_id();
        assert!(id.starts_with("budget::"));
        Budget::parse_id(&id).expect("generated id should parse");
    }

    #[test]
    fn test_parse_id_rejects_bad_shapes() {
        assert_eq!(Transaction::parse_id("transaction"), Err(IdError::InvalidFormat));
        assert_eq!(
            Transaction::parse_id("transaction::a::b"),
            Err(IdError::InvalidFormat)
        );
        assert_eq!(
            Transaction::parse_id("budget::3c3ca84a-9d3e-41c6-9e16-b3a2f4a1d8a0"),
            Err(IdError::WrongPrefix("budget".to_string()))
        );
        assert_eq!(
            Transaction::parse_id("transaction::not-a-uuid"),
            Err(IdError::InvalidUuid)
        );
    }

    #[test]
    fn test_each_prefix_is_distinct() {
        let goal_id = SavingsGoal::generate_id();
        assert!(RecurringRule::parse_id(&goal_id).is_err());
        assert!(SavingsGoal::parse_id(&goal_id).is_ok());
    }

    #[test]
    fn test_kind_serialization_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&TransactionKind::Income).unwrap(),
            "\"income\""
        );
        assert_eq!(
            serde_json::to_string(&BudgetKind::Monthly).unwrap(),
            "\"monthly\""
        );
        assert_eq!(
            serde_json::to_string(&Frequency::Weekly).unwrap(),
            "\"weekly\""
        );
        assert_eq!(
            serde_json::to_string(&ExpenseLineKind::Variable).unwrap(),
            "\"variable\""
        );
    }

    #[test]
    fn test_transaction_round_trips_through_json() {
        let tx = Transaction {
            id: Transaction::generate_id(),
            budget_id: Budget::generate_id(),
            label: "Groceries".to_string(),
            amount: 54.30,
            kind: TransactionKind::Expense,
            date: "2025-11-03".to_string(),
            category: "Food".to_string(),
            description: String::new(),
        };
        let json = serde_json::to_string(&tx).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tx);
    }
}
