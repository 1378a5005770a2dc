//! Transaction aggregation for the dashboard cards and charts.

use std::collections::HashMap;

use time::Date;

use crate::transaction::{Transaction, TransactionKind};

/// Sum this month's expenses per category, largest first.
///
/// "This month" means the calendar month of `today`. Income is ignored; the
/// breakdown chart only shows where money went.
pub(super) fn expenses_by_category(
    transactions: &[Transaction],
    today: Date,
) -> Vec<(String, f64)> {
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for transaction in transactions {
        let in_current_month = transaction.date.year() == today.year()
            && transaction.date.month() == today.month();

        if transaction.kind == TransactionKind::Expense && in_current_month {
            *totals.entry(transaction.category.as_str()).or_insert(0.0) += transaction.amount;
        }
    }

    let mut breakdown: Vec<(String, f64)> = totals
        .into_iter()
        .map(|(category, total)| (category.to_owned(), total))
        .collect();
    breakdown.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    breakdown
}

/// The `count` most recent transactions, newest first.
///
/// Transactions on the same date keep their relative source order, with later
/// entries winning (matching the insertion-ordered source list).
pub(super) fn recent_transactions(transactions: &[Transaction], count: usize) -> Vec<&Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    sorted.truncate(count);

    sorted
}
