//! Derived financial aggregation.
//!
//! Everything here is a deterministic computation over in-memory
//! transaction and expense-line arrays: wallet totals, expense breakdown
//! by category, month-bucketed trends, and the monthly envelope summary.
//! The service methods only add access checks and data loading on top of
//! the pure functions, which carry the unit tests.

use anyhow::{anyhow, Result};
use chrono::{Datelike, Months, NaiveDate};
use std::collections::BTreeMap;

use crate::domain::budget_service::BudgetService;
use crate::domain::models::budget::{BudgetKind, DomainExpenseLine, ExpenseLineKind};
use crate::domain::models::transaction::{DomainTransaction, TransactionKind};
use crate::storage::{BudgetRepository, DbConnection, TransactionRepository};
use shared::{
    CategoryBreakdownResponse, CategorySlice, PlanSummary, TrendPoint, TrendResponse,
    WalletSummary,
};

/// Months shown in a trend when the caller does not ask for a window.
pub const DEFAULT_TREND_MONTHS: u32 = 6;
const MAX_TREND_MONTHS: u32 = 24;

/// Service computing report data over a budget's transactions.
#[derive(Clone)]
pub struct ReportService {
    budget_repository: BudgetRepository,
    transaction_repository: TransactionRepository,
    budget_service: BudgetService,
}

impl ReportService {
    pub fn new(db: DbConnection, budget_service: BudgetService) -> Self {
        Self {
            budget_repository: BudgetRepository::new(db.clone()),
            transaction_repository: TransactionRepository::new(db),
            budget_service,
        }
    }

    pub async fn wallet_summary(&self, budget_id: &str) -> Result<WalletSummary> {
        let (_, budget) = self.budget_service.member_budget(budget_id).await?;
        let transactions = self
            .transaction_repository
            .list_transactions(&budget.id, None, None)
            .await?;
        Ok(summarize(&transactions))
    }

    pub async fn category_breakdown(&self, budget_id: &str) -> Result<CategoryBreakdownResponse> {
        let (_, budget) = self.budget_service.member_budget(budget_id).await?;
        let transactions = self
            .transaction_repository
            .list_transactions(&budget.id, None, None)
            .await?;
        Ok(categorize_expenses(&transactions))
    }

    /// Income/expense totals for each of the last `months` calendar months
    /// (today's month included).
    pub async fn monthly_trend(
        &self,
        budget_id: &str,
        today: NaiveDate,
        months: Option<u32>,
    ) -> Result<TrendResponse> {
        let months = months.unwrap_or(DEFAULT_TREND_MONTHS);
        if months == 0 || months > MAX_TREND_MONTHS {
            return Err(anyhow!(
                "Trend window must be between 1 and {} months",
                MAX_TREND_MONTHS
            ));
        }

        let (_, budget) = self.budget_service.member_budget(budget_id).await?;
        let transactions = self
            .transaction_repository
            .list_transactions(&budget.id, None, None)
            .await?;

        Ok(TrendResponse {
            points: bucket_by_month(&transactions, today, months),
        })
    }

    pub async fn plan_summary(&self, budget_id: &str) -> Result<PlanSummary> {
        let (_, budget) = self.budget_service.member_budget(budget_id).await?;
        if budget.kind != BudgetKind::Monthly {
            return Err(anyhow!("Budget {} is not a monthly budget", budget.id));
        }
        let lines = self.budget_repository.list_expense_lines(&budget.id).await?;
        Ok(plan_summary(budget.salary, &lines))
    }
}

/// Income/expense totals and their difference.
pub(crate) fn summarize(transactions: &[DomainTransaction]) -> WalletSummary {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    for t in transactions {
        match t.kind {
            TransactionKind::Income => total_income += t.amount,
            TransactionKind::Expense => total_expense += t.amount,
        }
    }
    WalletSummary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
    }
}

/// Expenses grouped by category, largest first.
pub(crate) fn categorize_expenses(transactions: &[DomainTransaction]) -> CategoryBreakdownResponse {
    let mut grouped: BTreeMap<&str, f64> = BTreeMap::new();
    for t in transactions {
        if t.kind == TransactionKind::Expense {
            *grouped.entry(t.category.as_str()).or_insert(0.0) += t.amount;
        }
    }

    let total_expense: f64 = grouped.values().sum();
    let mut slices: Vec<CategorySlice> = grouped
        .into_iter()
        .map(|(category, total)| CategorySlice {
            category: category.to_string(),
            total,
            share: if total_expense > 0.0 {
                total / total_expense
            } else {
                0.0
            },
        })
        .collect();
    // BTreeMap iteration already ordered by name; make the primary order
    // largest-total-first with name as the stable tiebreak.
    slices.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));

    CategoryBreakdownResponse {
        slices,
        total_expense,
    }
}

/// Bucket transactions into the last `months` calendar months ending at
/// `today`'s month. Months without activity stay at zero; transactions
/// outside the window are ignored.
pub(crate) fn bucket_by_month(
    transactions: &[DomainTransaction],
    today: NaiveDate,
    months: u32,
) -> Vec<TrendPoint> {
    let anchor = first_of_month(today);
    let mut points: Vec<TrendPoint> = (0..months)
        .rev()
        .map(|i| {
            let month_start = anchor - Months::new(i);
            TrendPoint {
                year: month_start.year(),
                month: month_start.month(),
                label: month_start.format("%b").to_string(),
                income: 0.0,
                expense: 0.0,
            }
        })
        .collect();

    for t in transactions {
        if let Some(point) = points
            .iter_mut()
            .find(|p| p.year == t.date.year() && p.month == t.date.month())
        {
            match t.kind {
                TransactionKind::Income => point.income += t.amount,
                TransactionKind::Expense => point.expense += t.amount,
            }
        }
    }
    points
}

/// Envelope summary for a monthly plan; every ratio is 0 when salary is 0.
pub(crate) fn plan_summary(salary: f64, lines: &[DomainExpenseLine]) -> PlanSummary {
    let total_fixed: f64 = lines
        .iter()
        .filter(|l| l.kind == ExpenseLineKind::Fixed)
        .map(|l| l.amount)
        .sum();
    let total_variable: f64 = lines
        .iter()
        .filter(|l| l.kind == ExpenseLineKind::Variable)
        .map(|l| l.amount)
        .sum();
    let remaining = salary - total_fixed - total_variable;

    let ratio = |part: f64| if salary > 0.0 { part / salary } else { 0.0 };
    PlanSummary {
        salary,
        total_fixed,
        total_variable,
        remaining,
        fixed_ratio: ratio(total_fixed),
        variable_ratio: ratio(total_variable),
        remaining_ratio: ratio(remaining),
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn tx(label: &str, amount: f64, kind: TransactionKind, date: NaiveDate, category: &str) -> DomainTransaction {
        DomainTransaction {
            id: format!("transaction::{}", label),
            budget_id: "budget::test".to_string(),
            label: label.to_string(),
            amount,
            kind,
            date,
            category: category.to_string(),
            description: String::new(),
        }
    }

    fn line(label: &str, amount: f64, kind: ExpenseLineKind) -> DomainExpenseLine {
        DomainExpenseLine {
            id: format!("line::{}", label),
            budget_id: "budget::test".to_string(),
            label: label.to_string(),
            amount,
            kind,
        }
    }

    #[test]
    fn test_summarize_totals_and_balance() {
        let transactions = vec![
            tx("salary", 3500.0, TransactionKind::Income, d(2025, 6, 1), "Salary"),
            tx("rent", 1200.0, TransactionKind::Expense, d(2025, 6, 1), "Housing"),
            tx("food", 300.0, TransactionKind::Expense, d(2025, 6, 2), "Food"),
        ];
        let summary = summarize(&transactions);
        assert_eq!(summary.total_income, 3500.0);
        assert_eq!(summary.total_expense, 1500.0);
        assert_eq!(summary.balance, 2000.0);
    }

    #[test]
    fn test_summarize_empty_is_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_income, 0.0);
        assert_eq!(summary.total_expense, 0.0);
        assert_eq!(summary.balance, 0.0);
    }

    #[test]
    fn test_categorize_groups_and_sorts_descending() {
        let transactions = vec![
            tx("rent", 1200.0, TransactionKind::Expense, d(2025, 6, 1), "Housing"),
            tx("food1", 100.0, TransactionKind::Expense, d(2025, 6, 2), "Food"),
            tx("food2", 200.0, TransactionKind::Expense, d(2025, 6, 3), "Food"),
            tx("salary", 3500.0, TransactionKind::Income, d(2025, 6, 1), "Salary"),
        ];
        let breakdown = categorize_expenses(&transactions);
        assert_eq!(breakdown.total_expense, 1500.0);
        assert_eq!(breakdown.slices.len(), 2);
        assert_eq!(breakdown.slices[0].category, "Housing");
        assert_eq!(breakdown.slices[0].total, 1200.0);
        assert!((breakdown.slices[0].share - 0.8).abs() < 1e-9);
        assert_eq!(breakdown.slices[1].category, "Food");
        assert!((breakdown.slices[1].share - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_categorize_with_no_expenses_has_no_slices() {
        let transactions = vec![tx(
            "salary",
            3500.0,
            TransactionKind::Income,
            d(2025, 6, 1),
            "Salary",
        )];
        let breakdown = categorize_expenses(&transactions);
        assert!(breakdown.slices.is_empty());
        assert_eq!(breakdown.total_expense, 0.0);
    }

    #[test]
    fn test_trend_buckets_cover_window_with_zeros() {
        let transactions = vec![
            tx("salary", 3000.0, TransactionKind::Income, d(2025, 6, 5), "Salary"),
            tx("rent", 1200.0, TransactionKind::Expense, d(2025, 5, 1), "Housing"),
            // Outside the 6-month window, must be ignored.
            tx("old", 999.0, TransactionKind::Expense, d(2024, 11, 1), "Old"),
        ];
        let points = bucket_by_month(&transactions, d(2025, 6, 20), 6);
        assert_eq!(points.len(), 6);
        assert_eq!((points[0].year, points[0].month), (2025, 1));
        assert_eq!((points[5].year, points[5].month), (2025, 6));
        assert_eq!(points[5].income, 3000.0);
        assert_eq!(points[4].expense, 1200.0);
        assert_eq!(points[0].income, 0.0);
        assert_eq!(points[0].expense, 0.0);
    }

    #[test]
    fn test_trend_window_crosses_year_boundary() {
        let points = bucket_by_month(&[], d(2025, 2, 10), 6);
        assert_eq!((points[0].year, points[0].month), (2024, 9));
        assert_eq!((points[5].year, points[5].month), (2025, 2));
        assert_eq!(points[0].label, "Sep");
        assert_eq!(points[5].label, "Feb");
    }

    #[test]
    fn test_plan_summary_ratios() {
        let lines = vec![
            line("Rent", 1350.0, ExpenseLineKind::Fixed),
            line("Insurance", 150.0, ExpenseLineKind::Fixed),
            line("Groceries", 400.0, ExpenseLineKind::Variable),
            line("Going out", 100.0, ExpenseLineKind::Variable),
        ];
        let summary = plan_summary(4000.0, &lines);
        assert_eq!(summary.total_fixed, 1500.0);
        assert_eq!(summary.total_variable, 500.0);
        assert_eq!(summary.remaining, 2000.0);
        assert!((summary.fixed_ratio - 0.375).abs() < 1e-9);
        assert!((summary.variable_ratio - 0.125).abs() < 1e-9);
        assert!((summary.remaining_ratio - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_plan_summary_zero_salary_has_zero_ratios() {
        let lines = vec![line("Rent", 1350.0, ExpenseLineKind::Fixed)];
        let summary = plan_summary(0.0, &lines);
        assert_eq!(summary.remaining, -1350.0);
        assert_eq!(summary.fixed_ratio, 0.0);
        assert_eq!(summary.variable_ratio, 0.0);
        assert_eq!(summary.remaining_ratio, 0.0);
    }
}
