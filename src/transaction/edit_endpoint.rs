//! Defines the endpoint for updating an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert, endpoints, timezone::current_local_date};

use super::{
    core::update_transaction, create_endpoint::TransactionForm, models::TransactionId,
};

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for updating a transaction, redirects to the transactions
/// view on success.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Path(transaction_id): Path<TransactionId>,
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

    match update_transaction(transaction_id, builder, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        account::{AccountKind, NewAccount, create_account},
        db::initialize,
        transaction::{
            Transaction, TransactionKind, create_endpoint::TransactionForm, create_transaction,
            get_transaction,
        },
    };

    use super::{EditTransactionState, edit_transaction_endpoint};

    fn get_test_state() -> EditTransactionState {
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

        EditTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn updates_transaction_and_redirects() {
        let state = get_test_state();
        let transaction = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(1, 10.0, date!(2024 - 05 - 01), "Old"),
                &connection,
            )
            .unwrap()
        };

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path(transaction.id),
            Form(TransactionForm {
                account_id: 1,
                date: date!(2024 - 05 - 02),
                description: "New".to_owned(),
                category: "shopping".to_owned(),
                amount: 20.0,
                kind: TransactionKind::Expense,
                is_recurring: false,
                recurring_interval: None,
                next_recurring_date: None,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let connection = state.db_connection.lock().unwrap();
        let updated = get_transaction(transaction.id, &connection).unwrap();
        assert_eq!(updated.description, "New");
        assert_eq!(updated.amount, 20.0);
    }

    #[tokio::test]
    async fn updating_missing_transaction_responds_with_alert() {
        let state = get_test_state();

        let response = edit_transaction_endpoint(
            State(state),
            Path(999),
            Form(TransactionForm {
                account_id: 1,
                date: date!(2024 - 05 - 02),
                description: String::new(),
                category: "other".to_owned(),
                amount: 1.0,
                kind: TransactionKind::Expense,
                is_recurring: false,
                recurring_interval: None,
                next_recurring_date: None,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
