use chrono::{Duration, Months, NaiveDate};

use crate::domain::models::transaction::TransactionKind;

/// Cadence of a recurring rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "weekly" => Some(Frequency::Weekly),
            "monthly" => Some(Frequency::Monthly),
            "yearly" => Some(Frequency::Yearly),
            _ => None,
        }
    }

    /// Advance a due date by one cadence step.
    ///
    /// Weekly steps are exactly 7 days. Monthly and yearly steps use
    /// calendar arithmetic and clamp to the last day of a shorter target
    /// month (Jan 31 + 1 month = Feb 28/29), never a fixed day count.
    pub fn advance(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Frequency::Weekly => date + Duration::days(7),
            Frequency::Monthly => date + Months::new(1),
            Frequency::Yearly => date + Months::new(12),
        }
    }
}

/// A template that generates dated transactions until deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainRecurringRule {
    pub id: String,
    pub budget_id: String,
    pub label: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub category: String,
    pub frequency: Frequency,
    pub next_due_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_weekly_advance_is_seven_days() {
        assert_eq!(Frequency::Weekly.advance(d(2025, 3, 28)), d(2025, 4, 4));
    }

    #[test]
    fn test_monthly_advance_keeps_day_of_month() {
        assert_eq!(Frequency::Monthly.advance(d(2025, 4, 15)), d(2025, 5, 15));
    }

    #[test]
    fn test_monthly_advance_clamps_to_shorter_month() {
        assert_eq!(Frequency::Monthly.advance(d(2025, 1, 31)), d(2025, 2, 28));
        assert_eq!(Frequency::Monthly.advance(d(2024, 1, 31)), d(2024, 2, 29));
        assert_eq!(Frequency::Monthly.advance(d(2025, 8, 31)), d(2025, 9, 30));
    }

    #[test]
    fn test_yearly_advance_handles_leap_day() {
        assert_eq!(Frequency::Yearly.advance(d(2024, 2, 29)), d(2025, 2, 28));
        assert_eq!(Frequency::Yearly.advance(d(2025, 6, 1)), d(2026, 6, 1));
    }

    #[test]
    fn test_frequency_round_trips_through_str() {
        for freq in [Frequency::Weekly, Frequency::Monthly, Frequency::Yearly] {
            assert_eq!(Frequency::parse(freq.as_str()), Some(freq));
        }
        assert_eq!(Frequency::parse("daily"), None);
    }
}
