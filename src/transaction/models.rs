//! Defines the core data models for transactions.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::account::AccountId;

/// Alias for the integer type used for mapping to transaction IDs.
pub type TransactionId = i64;

/// Whether a transaction adds money to an account or takes money out of it.
///
/// Amounts are stored as non-negative numbers; the kind carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    /// Money coming into the account, e.g. a salary payment.
    Income,
    /// Money leaving the account, e.g. a grocery shop.
    Expense,
}

impl TransactionKind {
    /// The stable string form used in the database and in URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
        }
    }

    /// The human-readable label shown in the UI.
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "INCOME" => Ok(TransactionKind::Income),
            "EXPENSE" => Ok(TransactionKind::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown transaction kind {other:?}").into(),
            )),
        }
    }
}

/// How often a recurring transaction repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecurringInterval {
    /// Repeats every day.
    Daily,
    /// Repeats every week.
    Weekly,
    /// Repeats every month.
    Monthly,
    /// Repeats every year.
    Yearly,
}

impl RecurringInterval {
    /// The stable string form used in the database and in forms.
    pub fn as_str(self) -> &'static str {
        match self {
            RecurringInterval::Daily => "DAILY",
            RecurringInterval::Weekly => "WEEKLY",
            RecurringInterval::Monthly => "MONTHLY",
            RecurringInterval::Yearly => "YEARLY",
        }
    }

    /// The human-readable label shown in the UI.
    pub fn label(self) -> &'static str {
        match self {
            RecurringInterval::Daily => "Daily",
            RecurringInterval::Weekly => "Weekly",
            RecurringInterval::Monthly => "Monthly",
            RecurringInterval::Yearly => "Yearly",
        }
    }

    /// Every interval, in the order they are offered in forms.
    pub fn all() -> [RecurringInterval; 4] {
        [
            RecurringInterval::Daily,
            RecurringInterval::Weekly,
            RecurringInterval::Monthly,
            RecurringInterval::Yearly,
        ]
    }
}

impl ToSql for RecurringInterval {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RecurringInterval {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "DAILY" => Ok(RecurringInterval::Daily),
            "WEEKLY" => Ok(RecurringInterval::Weekly),
            "MONTHLY" => Ok(RecurringInterval::Monthly),
            "YEARLY" => Ok(RecurringInterval::Yearly),
            other => Err(FromSqlError::Other(
                format!("unknown recurring interval {other:?}").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the account the transaction belongs to.
    pub account_id: AccountId,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The key of the category the transaction belongs to, e.g. "groceries".
    ///
    /// Keys index into the static table in [crate::transaction::categories].
    pub category: String,
    /// The amount of money spent or earned. Always non-negative; the sign is
    /// carried by `kind`.
    pub amount: f64,
    /// Whether this transaction is income or an expense.
    pub kind: TransactionKind,
    /// Whether this transaction repeats on a schedule.
    pub is_recurring: bool,
    /// How often the transaction repeats. Only meaningful when `is_recurring`.
    pub recurring_interval: Option<RecurringInterval>,
    /// When the next occurrence is due. Only meaningful when `is_recurring`.
    pub next_recurring_date: Option<Date>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        account_id: AccountId,
        amount: f64,
        date: Date,
        description: &str,
    ) -> TransactionBuilder {
        TransactionBuilder {
            account_id,
            amount,
            date,
            description: description.to_owned(),
            category: "other".to_owned(),
            kind: TransactionKind::Expense,
            is_recurring: false,
            recurring_interval: None,
            next_recurring_date: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Optional fields default to a one-time, uncategorized expense. Pass the
/// finished builder to [crate::transaction::create_transaction] to persist it.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The ID of the account the transaction belongs to.
    pub account_id: AccountId,
    /// The non-negative monetary amount of the transaction.
    pub amount: f64,
    /// The date when the transaction occurred.
    pub date: Date,
    /// A human-readable description of the transaction.
    pub description: String,
    /// The key of the category the transaction belongs to.
    pub category: String,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// Whether the transaction repeats on a schedule.
    pub is_recurring: bool,
    /// How often the transaction repeats.
    pub recurring_interval: Option<RecurringInterval>,
    /// When the next occurrence is due.
    pub next_recurring_date: Option<Date>,
}

impl TransactionBuilder {
    /// Set the category key for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set whether the transaction is income or an expense.
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Mark the transaction as recurring with the given schedule.
    pub fn recurring(mut self, interval: RecurringInterval, next_date: Option<Date>) -> Self {
        self.is_recurring = true;
        self.recurring_interval = Some(interval);
        self.next_recurring_date = next_date;
        self
    }
}
