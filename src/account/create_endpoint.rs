//! Defines the endpoint for creating a new account.

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

use crate::{AppState, Error, alert::Alert, endpoints};

use super::core::{AccountKind, NewAccount, create_account};

/// The state needed to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating an account.
#[derive(Debug, Deserialize)]
pub struct AccountForm {
    /// The account name.
    pub name: String,
    /// Whether this is a current or savings account.
    pub kind: AccountKind,
    /// The starting balance in dollars.
    pub balance: f64,
    /// Whether the account should become the default account. Unchecked boxes
    /// are simply absent from the form body.
    #[serde(default)]
    pub is_default: bool,
}

/// A route handler for creating a new account, redirects to the accounts view
/// on success.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    Form(form): Form<AccountForm>,
) -> Response {
    let name = form.name.trim();

    if name.is_empty() {
        return Alert::error("Invalid account name", "Account names cannot be empty.")
            .into_response_with_status(StatusCode::BAD_REQUEST);
    }

    let mut connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let new_account = NewAccount {
        name: name.to_owned(),
        kind: form.kind,
        balance: form.balance,
        is_default: form.is_default,
    };

    match create_account(&new_account, &mut connection) {
        Ok(_) => (
            HxRedirect(endpoints::ACCOUNTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not create account {name:?}: {error}");
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

    use crate::{account::get_all_accounts, db::initialize};

    use super::{AccountForm, AccountKind, CreateAccountState, create_account_endpoint};

    fn get_test_state() -> CreateAccountState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        CreateAccountState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn creates_account_and_redirects() {
        let state = get_test_state();

        let response = create_account_endpoint(
            State(state.clone()),
            Form(AccountForm {
                name: "Everyday".to_owned(),
                kind: AccountKind::Current,
                balance: 123.45,
                is_default: true,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(response.headers().contains_key(HX_REDIRECT));

        let connection = state.db_connection.lock().unwrap();
        let accounts = get_all_accounts(&connection).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "Everyday");
        assert!(accounts[0].is_default);
    }

    #[tokio::test]
    async fn rejects_empty_names() {
        let state = get_test_state();

        let response = create_account_endpoint(
            State(state.clone()),
            Form(AccountForm {
                name: "   ".to_owned(),
                kind: AccountKind::Current,
                balance: 0.0,
                is_default: false,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let connection = state.db_connection.lock().unwrap();
        assert!(get_all_accounts(&connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_duplicate_names() {
        let state = get_test_state();
        let form = || AccountForm {
            name: "Everyday".to_owned(),
            kind: AccountKind::Current,
            balance: 0.0,
            is_default: false,
        };

        create_account_endpoint(State(state.clone()), Form(form())).await;
        let response = create_account_endpoint(State(state.clone()), Form(form())).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
