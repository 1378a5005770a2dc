//! Defines the endpoint for deleting a single transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::html;
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert, pagination::PaginationConfig};

use super::{
    core::delete_transaction,
    models::TransactionId,
    table::{TableOptions, TableQuery},
    transactions_page::render_table_partial,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// A route handler for deleting a transaction.
///
/// The delete URL carries the table's current view state, so on success the
/// response is the re-rendered table section (with the deleted id pruned from
/// the selection) plus an out-of-band success alert. On failure nothing is
/// swapped and an error alert is returned instead.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<TableQuery>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_transaction(transaction_id, &connection) {
        Ok(0) => Error::DeleteMissingTransaction.into_alert_response(),
        Ok(_) => {
            let options = TableOptions::from_query(query);

            match render_table_partial(options, &connection, &state.pagination_config) {
                Ok(table) => {
                    let alert = Alert::success("Transaction deleted", "");

                    html!(
                        (table)
                        (alert.oob_markup())
                    )
                    .into_response()
                }
                Err(error) => {
                    tracing::error!("could not re-render transactions after delete: {error}");
                    error.into_alert_response()
                }
            }
        }
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::Response,
    };
    use axum_extra::extract::Query;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        account::{AccountKind, NewAccount, create_account},
        db::initialize,
        pagination::PaginationConfig,
        transaction::{
            Transaction, create_transaction, get_transaction, table::TableQuery,
        },
    };

    use super::{DeleteTransactionState, delete_transaction_endpoint};

    fn get_test_state() -> DeleteTransactionState {
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

        DeleteTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
            pagination_config: PaginationConfig::default(),
        }
    }

    async fn body_text(response: Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8_lossy(&body).to_string()
    }

    #[tokio::test]
    async fn deletes_transaction_and_rerenders_table() {
        let state = get_test_state();
        let transaction = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(1, 1.23, date!(2025 - 10 - 26), "Test"),
                &connection,
            )
            .unwrap()
        };

        let response = delete_transaction_endpoint(
            State(state.clone()),
            Path(transaction.id),
            Query(TableQuery::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(
            body.contains("id=\"transaction-table\""),
            "success should re-render the table section"
        );
        assert!(
            body.contains("id=\"alert-container\""),
            "success should include an out-of-band alert"
        );

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_transaction(transaction.id, &connection),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn deleting_missing_transaction_responds_with_alert() {
        let state = get_test_state();

        let response =
            delete_transaction_endpoint(State(state), Path(999), Query(TableQuery::default()))
                .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_text(response).await;
        assert!(body.contains("Could not delete transaction"));
    }
}
