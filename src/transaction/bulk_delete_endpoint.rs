//! Defines the endpoint for deleting a batch of selected transactions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::html;
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert, pagination::PaginationConfig};

use super::{
    core::delete_transactions,
    table::{Selection, TableOptions, TableQuery},
    transactions_page::render_table_partial,
};

/// The state needed to bulk delete transactions.
#[derive(Debug, Clone)]
pub struct BulkDeleteState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for BulkDeleteState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// A route handler for deleting exactly the selected transactions.
///
/// The update is pessimistic: the deletes run all-or-nothing inside one SQL
/// transaction, and only after they are confirmed does the response swap in a
/// re-rendered table without those rows and with the selection cleared. On any
/// failure the table is left untouched and a distinct error alert is returned;
/// nothing is retried.
pub async fn bulk_delete_transactions_endpoint(
    State(state): State<BulkDeleteState>,
    Form(form): Form<TableQuery>,
) -> Response {
    let mut connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let options = TableOptions::from_query(form);
    let ids = options.selected.ids().to_vec();

    if let Err(error) = delete_transactions(&ids, &mut connection) {
        tracing::error!("Could not bulk delete transactions {ids:?}: {error}");
        return error.into_alert_response();
    }

    // Deletion confirmed, so the ids can leave the selection as well.
    let options = options.with_selection(Selection::default());

    match render_table_partial(options, &connection, &state.pagination_config) {
        Ok(table) => {
            let alert = Alert::success(
                "Transactions deleted",
                &format!("Deleted {} transaction(s).", ids.len()),
            );

            html!(
                (table)
                (alert.oob_markup())
            )
            .into_response()
        }
        Err(error) => {
            tracing::error!("could not re-render transactions after bulk delete: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::Response};
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        account::{AccountKind, NewAccount, create_account},
        db::initialize,
        pagination::PaginationConfig,
        transaction::{
            Transaction, TransactionId, create_transaction, get_transactions, table::TableQuery,
        },
    };

    use super::{BulkDeleteState, bulk_delete_transactions_endpoint};

    fn get_test_state(transaction_count: i64) -> (BulkDeleteState, Vec<TransactionId>) {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let account = create_account(
            &NewAccount {
                name: "Everyday".to_owned(),
                kind: AccountKind::Current,
                balance: 0.0,
                is_default: true,
            },
            &mut conn,
        )
        .unwrap();

        let mut ids = Vec::new();
        for i in 1..=transaction_count {
            let transaction = create_transaction(
                Transaction::build(account.id, i as f64, date!(2025 - 10 - 05), ""),
                &conn,
            )
            .unwrap();
            ids.push(transaction.id);
        }

        (
            BulkDeleteState {
                db_connection: Arc::new(Mutex::new(conn)),
                pagination_config: PaginationConfig::default(),
            },
            ids,
        )
    }

    async fn body_text(response: Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8_lossy(&body).to_string()
    }

    #[tokio::test]
    async fn deletes_selected_ids_and_clears_selection() {
        let (state, ids) = get_test_state(3);

        let response = bulk_delete_transactions_endpoint(
            State(state.clone()),
            Form(TableQuery {
                selected: vec![ids[0], ids[2]],
                ..TableQuery::default()
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(
            !body.contains("name=\"selected\""),
            "selection should be cleared after a confirmed delete"
        );

        let connection = state.db_connection.lock().unwrap();
        let remaining: Vec<_> = get_transactions(&connection)
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(remaining, vec![ids[1]]);
    }

    #[tokio::test]
    async fn failed_delete_leaves_source_and_selection_unchanged() {
        let (state, ids) = get_test_state(2);

        let response = bulk_delete_transactions_endpoint(
            State(state.clone()),
            Form(TableQuery {
                selected: vec![ids[0], 999],
                ..TableQuery::default()
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_text(response).await;
        assert!(
            !body.contains("id=\"transaction-table\""),
            "a failed delete must not swap the table"
        );

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_transactions(&connection).unwrap().len(),
            2,
            "a failed bulk delete must leave the source list unchanged"
        );
    }

    #[tokio::test]
    async fn empty_selection_is_a_no_op() {
        let (state, _) = get_test_state(2);

        let response =
            bulk_delete_transactions_endpoint(State(state.clone()), Form(TableQuery::default()))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_transactions(&connection).unwrap().len(), 2);
    }
}
