//! Aggregates an account's transactions into daily income/expense activity
//! for the account page chart.

use std::collections::HashMap;

use serde::Deserialize;
use time::{Date, Duration};

use crate::transaction::{Transaction, TransactionKind};

/// The date ranges the activity chart can be switched between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum RangePreset {
    /// The last seven days.
    #[serde(rename = "7d")]
    Week,
    /// The last thirty days.
    #[serde(rename = "1m")]
    Month,
    /// The last ninety days.
    #[serde(rename = "3m")]
    ThreeMonths,
    /// The last 180 days.
    #[serde(rename = "6m")]
    SixMonths,
    /// Every transaction the account has.
    #[default]
    #[serde(rename = "all")]
    All,
}

impl RangePreset {
    /// The label shown in the range selector.
    pub fn label(self) -> &'static str {
        match self {
            RangePreset::Week => "Last 7 Days",
            RangePreset::Month => "Last Month",
            RangePreset::ThreeMonths => "Last 3 Months",
            RangePreset::SixMonths => "Last 6 Months",
            RangePreset::All => "All Time",
        }
    }

    /// The value used in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            RangePreset::Week => "7d",
            RangePreset::Month => "1m",
            RangePreset::ThreeMonths => "3m",
            RangePreset::SixMonths => "6m",
            RangePreset::All => "all",
        }
    }

    /// How many days back the range reaches, or `None` for all time.
    fn days(self) -> Option<i64> {
        match self {
            RangePreset::Week => Some(7),
            RangePreset::Month => Some(30),
            RangePreset::ThreeMonths => Some(90),
            RangePreset::SixMonths => Some(180),
            RangePreset::All => None,
        }
    }

    /// Every preset, in the order they are offered in the range selector.
    pub fn all() -> [RangePreset; 5] {
        [
            RangePreset::Week,
            RangePreset::Month,
            RangePreset::ThreeMonths,
            RangePreset::SixMonths,
            RangePreset::All,
        ]
    }
}

/// The income and expense totals for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayActivity {
    /// The day the totals are for.
    pub date: Date,
    /// The sum of income amounts on that day.
    pub income: f64,
    /// The sum of expense amounts on that day.
    pub expense: f64,
}

/// Sum income and expenses per day within the range, in chronological order.
///
/// Days with no transactions are omitted rather than zero-filled; the chart's
/// category axis only shows days that had activity.
pub fn daily_activity(
    transactions: &[Transaction],
    range: RangePreset,
    today: Date,
) -> Vec<DayActivity> {
    let start = range.days().map(|days| today - Duration::days(days));

    let mut totals: HashMap<Date, (f64, f64)> = HashMap::new();

    for transaction in transactions {
        if transaction.date > today {
            continue;
        }

        if let Some(start) = start
            && transaction.date < start
        {
            continue;
        }

        let entry = totals.entry(transaction.date).or_insert((0.0, 0.0));
        match transaction.kind {
            TransactionKind::Income => entry.0 += transaction.amount,
            TransactionKind::Expense => entry.1 += transaction.amount,
        }
    }

    let mut days: Vec<DayActivity> = totals
        .into_iter()
        .map(|(date, (income, expense))| DayActivity {
            date,
            income,
            expense,
        })
        .collect();
    days.sort_by_key(|day| day.date);

    days
}

/// The income, expense, and net totals for the selected period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodTotals {
    /// The sum of all income in the period.
    pub income: f64,
    /// The sum of all expenses in the period.
    pub expense: f64,
}

impl PeriodTotals {
    /// Income minus expenses.
    pub fn net(self) -> f64 {
        self.income - self.expense
    }
}

/// Sum the daily activity into period totals.
pub fn period_totals(days: &[DayActivity]) -> PeriodTotals {
    days.iter().fold(
        PeriodTotals {
            income: 0.0,
            expense: 0.0,
        },
        |totals, day| PeriodTotals {
            income: totals.income + day.income,
            expense: totals.expense + day.expense,
        },
    )
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::transaction::{Transaction, TransactionKind};

    use super::{RangePreset, daily_activity, period_totals};

    fn make_transaction(amount: f64, date: time::Date, kind: TransactionKind) -> Transaction {
        Transaction {
            id: 0,
            account_id: 1,
            date,
            description: String::new(),
            category: "other".to_owned(),
            amount,
            kind,
            is_recurring: false,
            recurring_interval: None,
            next_recurring_date: None,
        }
    }

    #[test]
    fn sums_income_and_expense_per_day() {
        let today = date!(2024 - 06 - 30);
        let transactions = vec![
            make_transaction(100.0, date!(2024 - 06 - 29), TransactionKind::Income),
            make_transaction(40.0, date!(2024 - 06 - 29), TransactionKind::Expense),
            make_transaction(10.0, date!(2024 - 06 - 30), TransactionKind::Expense),
        ];

        let days = daily_activity(&transactions, RangePreset::All, today);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date!(2024 - 06 - 29));
        assert_eq!(days[0].income, 100.0);
        assert_eq!(days[0].expense, 40.0);
        assert_eq!(days[1].expense, 10.0);
    }

    #[test]
    fn range_filters_out_older_transactions() {
        let today = date!(2024 - 06 - 30);
        let transactions = vec![
            make_transaction(1.0, date!(2024 - 06 - 29), TransactionKind::Expense),
            make_transaction(2.0, date!(2024 - 01 - 01), TransactionKind::Expense),
        ];

        let days = daily_activity(&transactions, RangePreset::Week, today);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, date!(2024 - 06 - 29));
    }

    #[test]
    fn days_are_in_chronological_order() {
        let today = date!(2024 - 06 - 30);
        let transactions = vec![
            make_transaction(1.0, date!(2024 - 06 - 30), TransactionKind::Expense),
            make_transaction(2.0, date!(2024 - 06 - 01), TransactionKind::Expense),
            make_transaction(3.0, date!(2024 - 06 - 15), TransactionKind::Expense),
        ];

        let days = daily_activity(&transactions, RangePreset::All, today);

        let dates: Vec<_> = days.iter().map(|day| day.date).collect();
        assert_eq!(
            dates,
            [
                date!(2024 - 06 - 01),
                date!(2024 - 06 - 15),
                date!(2024 - 06 - 30)
            ]
        );
    }

    #[test]
    fn totals_sum_the_period() {
        let today = date!(2024 - 06 - 30);
        let transactions = vec![
            make_transaction(100.0, date!(2024 - 06 - 29), TransactionKind::Income),
            make_transaction(40.0, date!(2024 - 06 - 29), TransactionKind::Expense),
            make_transaction(10.0, date!(2024 - 06 - 30), TransactionKind::Expense),
        ];

        let totals = period_totals(&daily_activity(&transactions, RangePreset::All, today));

        assert_eq!(totals.income, 100.0);
        assert_eq!(totals.expense, 50.0);
        assert_eq!(totals.net(), 50.0);
    }
}
