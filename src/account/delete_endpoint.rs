//! Defines the endpoint for deleting an account.

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
    core::{AccountId, get_all_accounts},
};

/// The state needed to delete an account.
#[derive(Debug, Clone)]
pub struct DeleteAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an account.
///
/// Deleting an account also deletes its transactions (enforced by the foreign
/// key cascade). On success the accounts list section is re-rendered with an
/// out-of-band alert; on failure only an error alert is returned.
pub async fn delete_account_endpoint(
    State(state): State<DeleteAccountState>,
    Path(account_id): Path<AccountId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_account(account_id, &connection) {
        Ok(0) => Error::DeleteMissingAccount.into_alert_response(),
        Ok(_) => {
            let accounts = match get_all_accounts(&connection) {
                Ok(accounts) => accounts,
                Err(error) => {
                    tracing::error!("could not re-render accounts after delete: {error}");
                    return error.into_alert_response();
                }
            };

            let alert = Alert::success("Account deleted", "");

            html!(
                (accounts_list(&accounts))
                (alert.oob_markup())
            )
            .into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete account {account_id}: {error}");
            error.into_alert_response()
        }
    }
}

type RowsAffected = usize;

fn delete_account(id: AccountId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM account WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}
