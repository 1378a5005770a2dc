//! Defines the page with the form for editing an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::get_all_accounts,
    endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    timezone::current_local_date,
};

use super::{
    core::get_transaction,
    form::{FormAction, transaction_form},
    models::TransactionId,
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The database connection for reading the transaction and accounts.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the page for editing a transaction. Responds with a 404 page when
/// the transaction does not exist.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, &connection)?;
    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get accounts: {error}"))?;
    let today = current_local_date(&state.local_timezone)?;

    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let content = html!(
        (nav_bar)

        main class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Transaction" }

            (transaction_form(
                &accounts,
                Some(&transaction),
                today,
                FormAction::Edit(transaction.id),
            ))
        }
    );

    Ok(base("Edit Transaction", &[], &content).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        account::{AccountKind, NewAccount, create_account},
        db::initialize,
        transaction::{Transaction, create_transaction},
    };

    use super::{EditTransactionPageState, get_edit_transaction_page};

    fn get_test_state() -> EditTransactionPageState {
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

        EditTransactionPageState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn page_prefills_the_form() {
        let state = get_test_state();
        let transaction = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(1, 42.0, date!(2024 - 05 - 01), "Dinner").category("food"),
                &connection,
            )
            .unwrap()
        };

        let response = get_edit_transaction_page(State(state), Path(transaction.id))
            .await
            .unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = Html::parse_document(&String::from_utf8_lossy(&body));
        let description_selector = Selector::parse("input[name='description']").unwrap();
        let description = html
            .select(&description_selector)
            .next()
            .expect("description input missing");
        assert_eq!(description.value().attr("value"), Some("Dinner"));
    }

    #[tokio::test]
    async fn missing_transaction_renders_404() {
        let state = get_test_state();

        let response = get_edit_transaction_page(State(state), Path(999)).await;

        let response = response.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
