//! Defines the page with the form for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{FORM_CONTAINER_STYLE, LINK_STYLE, base},
    navigation::NavBar,
    timezone::current_local_date,
};

use super::form::{FormAction, transaction_form};
use crate::account::get_all_accounts;

/// The state needed for the create transaction page.
#[derive(Debug, Clone)]
pub struct CreateTransactionPageState {
    /// The database connection for reading accounts.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the page for creating a new transaction.
pub async fn get_create_transaction_page(
    State(state): State<CreateTransactionPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get accounts: {error}"))?;
    let today = current_local_date(&state.local_timezone)?;

    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let content = html!(
        (nav_bar)

        main class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Create Transaction" }

            @if accounts.is_empty() {
                p
                {
                    "You need an account before you can record transactions. "

                    a href=(endpoints::NEW_ACCOUNT_VIEW) class=(LINK_STYLE)
                    {
                        "Create an account"
                    }
                }
            } @else {
                (transaction_form(&accounts, None, today, FormAction::Create))
            }
        }
    );

    Ok(base("Create Transaction", &[], &content).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, response::Response};
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        account::{AccountKind, NewAccount, create_account},
        db::initialize,
    };

    use super::{CreateTransactionPageState, get_create_transaction_page};

    async fn parse_html(response: Response) -> Html {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        Html::parse_document(&String::from_utf8_lossy(&body))
    }

    #[tokio::test]
    async fn page_shows_form_when_an_account_exists() {
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
        let state = CreateTransactionPageState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_create_transaction_page(State(state)).await.unwrap();

        let html = parse_html(response).await;
        let form_selector = Selector::parse("form select[name='category']").unwrap();
        assert!(html.select(&form_selector).next().is_some());
    }

    #[tokio::test]
    async fn page_prompts_for_an_account_when_none_exist() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let state = CreateTransactionPageState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_create_transaction_page(State(state)).await.unwrap();

        let html = parse_html(response).await;
        let form_selector = Selector::parse("form").unwrap();
        assert!(html.select(&form_selector).next().is_none());
    }
}
