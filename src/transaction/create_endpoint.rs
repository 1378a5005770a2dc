//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{AppState, Error, account::AccountId, alert::Alert, endpoints, timezone::current_local_date};

use super::{
    core::create_transaction,
    models::{RecurringInterval, TransactionBuilder, TransactionKind},
    table::empty_string_as_none,
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The account the transaction belongs to.
    pub account_id: AccountId,
    /// When the transaction happened.
    pub date: Date,
    /// What the transaction was for.
    #[serde(default)]
    pub description: String,
    /// The category key.
    pub category: String,
    /// The non-negative amount in dollars.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// Whether the transaction repeats. Unchecked boxes are simply absent from
    /// the form body.
    #[serde(default)]
    pub is_recurring: bool,
    /// How often the transaction repeats.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub recurring_interval: Option<RecurringInterval>,
    /// When the next occurrence is due.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub next_recurring_date: Option<Date>,
}

impl TransactionForm {
    /// Validate the form against `today` and convert it into a builder.
    ///
    /// # Errors
    /// Returns [Error::FutureDate] for dates after `today`. The remaining
    /// validation (category, recurring interval) happens in the database
    /// layer.
    pub(crate) fn into_builder(self, today: Date) -> Result<TransactionBuilder, Error> {
        if self.date > today {
            return Err(Error::FutureDate(self.date));
        }

        let mut builder =
            crate::transaction::Transaction::build(self.account_id, self.amount, self.date, &self.description)
                .category(&self.category)
                .kind(self.kind);

        if self.is_recurring {
            builder.is_recurring = true;
            builder.recurring_interval = self.recurring_interval;
            builder.next_recurring_date = self.next_recurring_date;
        }

        Ok(builder)
    }
}

/// A route handler for creating a new transaction, redirects to the
/// transactions view on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    if form.amount < 0.0 {
        return Alert::error(
            "Invalid amount",
            "Transaction amounts cannot be negative. Use the type field to record an expense.",
        )
        .into_response_with_status(StatusCode::BAD_REQUEST);
    }

    let today = match current_local_date(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let builder = match form.into_builder(today) {
        Ok(builder) => builder,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_transaction(builder, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not create transaction: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        account::{AccountKind, NewAccount, create_account},
        db::initialize,
        transaction::{TransactionKind, get_transactions},
    };

    use super::{CreateTransactionState, TransactionForm, create_transaction_endpoint};

    fn get_test_state() -> CreateTransactionState {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_account(
            &NewAccount {
                name: "Everyday".to_owned(),
                kind: AccountKind::Current,
                balance: 0.0,
                is_default: true,
            },
            &mut conn,
        )
        .unwrap();

        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn form() -> TransactionForm {
        TransactionForm {
            account_id: 1,
            date: date!(2024 - 05 - 01),
            description: "Lunch".to_owned(),
            category: "food".to_owned(),
            amount: 12.5,
            kind: TransactionKind::Expense,
            is_recurring: false,
            recurring_interval: None,
            next_recurring_date: None,
        }
    }

    #[tokio::test]
    async fn creates_transaction_and_redirects() {
        let state = get_test_state();

        let response = create_transaction_endpoint(State(state.clone()), Form(form())).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(response.headers().contains_key(HX_REDIRECT));

        let connection = state.db_connection.lock().unwrap();
        let transactions = get_transactions(&connection).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].description, "Lunch");
    }

    #[tokio::test]
    async fn rejects_negative_amounts() {
        let state = get_test_state();

        let response = create_transaction_endpoint(
            State(state.clone()),
            Form(TransactionForm {
                amount: -5.0,
                ..form()
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let connection = state.db_connection.lock().unwrap();
        assert!(get_transactions(&connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_future_dates() {
        let state = get_test_state();

        let response = create_transaction_endpoint(
            State(state.clone()),
            Form(TransactionForm {
                date: date!(2999 - 01 - 01),
                ..form()
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn into_builder_rejects_future_dates() {
        let result = TransactionForm {
            date: date!(2024 - 05 - 02),
            ..form()
        }
        .into_builder(date!(2024 - 05 - 01));

        assert_eq!(result, Err(Error::FutureDate(date!(2024 - 05 - 02))));
    }

    #[test]
    fn into_builder_ignores_recurring_fields_when_not_recurring() {
        let builder = TransactionForm {
            recurring_interval: Some(crate::transaction::RecurringInterval::Monthly),
            next_recurring_date: Some(date!(2024 - 06 - 01)),
            ..form()
        }
        .into_builder(date!(2024 - 05 - 01))
        .unwrap();

        assert!(!builder.is_recurring);
        assert_eq!(builder.recurring_interval, None);
        assert_eq!(builder.next_recurring_date, None);
    }
}
