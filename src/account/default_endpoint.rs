//! Defines the endpoint for marking an account as the default account.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert};

use super::{
    accounts_page::accounts_list,
    core::{AccountId, get_all_accounts, set_default_account},
};

/// The state needed to change the default account.
#[derive(Debug, Clone)]
pub struct DefaultAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DefaultAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that makes the account with `account_id` the default,
/// clearing the previous default.
pub async fn set_default_account_endpoint(
    State(state): State<DefaultAccountState>,
    Path(account_id): Path<AccountId>,
) -> Response {
    let mut connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match set_default_account(account_id, &mut connection) {
        Ok(()) => {
            let accounts = match get_all_accounts(&connection) {
                Ok(accounts) => accounts,
                Err(error) => {
                    tracing::error!("could not re-render accounts after update: {error}");
                    return error.into_alert_response();
                }
            };

            let alert = Alert::success("Default account updated", "");

            html!(
                (accounts_list(&accounts))
                (alert.oob_markup())
            )
            .into_response()
        }
        Err(error) => {
            tracing::error!("Could not set default account {account_id}: {error}");
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
    };
    use rusqlite::Connection;

    use crate::{
        account::{AccountKind, NewAccount, create_account, get_account},
        db::initialize,
    };

    use super::{DefaultAccountState, set_default_account_endpoint};

    #[tokio::test]
    async fn moves_the_default_flag() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let first = create_account(
            &NewAccount {
                name: "First".to_owned(),
                kind: AccountKind::Current,
                balance: 0.0,
                is_default: true,
            },
            &mut conn,
        )
        .unwrap();
        let second = create_account(
            &NewAccount {
                name: "Second".to_owned(),
                kind: AccountKind::Savings,
                balance: 0.0,
                is_default: false,
            },
            &mut conn,
        )
        .unwrap();
        let state = DefaultAccountState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = set_default_account_endpoint(State(state.clone()), Path(second.id)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let connection = state.db_connection.lock().unwrap();
        assert!(!get_account(first.id, &connection).unwrap().is_default);
        assert!(get_account(second.id, &connection).unwrap().is_default);
    }

    #[tokio::test]
    async fn missing_account_responds_with_alert() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let state = DefaultAccountState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = set_default_account_endpoint(State(state), Path(999)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
