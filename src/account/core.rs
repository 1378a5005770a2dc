//! Defines the core data model and database queries for accounts.

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Alias for the integer type used for mapping to account IDs.
pub type AccountId = i64;

/// The kind of bank account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountKind {
    /// An everyday spending account.
    Current,
    /// A savings account.
    Savings,
}

impl AccountKind {
    /// The stable string form used in the database and in forms.
    pub fn as_str(self) -> &'static str {
        match self {
            AccountKind::Current => "CURRENT",
            AccountKind::Savings => "SAVINGS",
        }
    }

    /// The human-readable label shown in the UI.
    pub fn label(self) -> &'static str {
        match self {
            AccountKind::Current => "Current",
            AccountKind::Savings => "Savings",
        }
    }

    /// Every kind, in the order they are offered in forms.
    pub fn all() -> [AccountKind; 2] {
        [AccountKind::Current, AccountKind::Savings]
    }
}

impl ToSql for AccountKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AccountKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "CURRENT" => Ok(AccountKind::Current),
            "SAVINGS" => Ok(AccountKind::Savings),
            other => Err(FromSqlError::Other(
                format!("unknown account kind {other:?}").into(),
            )),
        }
    }
}

/// A bank account that transactions are recorded against.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The ID of the account.
    pub id: AccountId,
    /// The name of the account, unique across all accounts.
    pub name: String,
    /// Whether this is a current or savings account.
    pub kind: AccountKind,
    /// The balance in dollars.
    pub balance: f64,
    /// Whether this is the default account preselected on the dashboard.
    pub is_default: bool,
}

/// The fields needed to create an [Account].
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    /// The name of the account.
    pub name: String,
    /// Whether this is a current or savings account.
    pub kind: AccountKind,
    /// The starting balance in dollars.
    pub balance: f64,
    /// Whether the account should become the default account.
    pub is_default: bool,
}

/// Create the account table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            kind TEXT NOT NULL,
            balance REAL NOT NULL,
            is_default INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    Ok(())
}

/// Map a database row to an Account.
pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        balance: row.get(3)?,
        is_default: row.get(4)?,
    })
}

/// Create a new account in the database.
///
/// When `new_account.is_default` is set, the previous default account is
/// cleared in the same SQL transaction so at most one account is ever the
/// default.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateAccountName] if an account with the same name exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_account(new_account: &NewAccount, connection: &mut Connection) -> Result<Account, Error> {
    let sql_transaction = connection.transaction()?;

    if new_account.is_default {
        sql_transaction.execute("UPDATE account SET is_default = 0", ())?;
    }

    let account = sql_transaction
        .prepare(
            "INSERT INTO account (name, kind, balance, is_default)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, name, kind, balance, is_default",
        )?
        .query_row(
            (
                &new_account.name,
                new_account.kind,
                new_account.balance,
                new_account.is_default,
            ),
            map_row_to_account,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateAccountName(new_account.name.clone()),
            error => error.into(),
        })?;

    sql_transaction.commit()?;

    Ok(account)
}

/// Retrieve an account from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<Account, Error> {
    connection
        .query_one(
            "SELECT id, name, kind, balance, is_default FROM account WHERE id = :id",
            &[(":id", &id)],
            map_row_to_account,
        )
        .map_err(Error::from)
}

/// Get all accounts ordered by name.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_all_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare("SELECT id, name, kind, balance, is_default FROM account ORDER BY name ASC")?
        .query_map([], map_row_to_account)?
        .map(|account_result| account_result.map_err(Error::SqlError))
        .collect()
}

/// Get the default account, if one has been set.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_default_account(connection: &Connection) -> Result<Option<Account>, Error> {
    let result = connection.query_one(
        "SELECT id, name, kind, balance, is_default FROM account WHERE is_default = 1",
        [],
        map_row_to_account,
    );

    match result {
        Ok(account) => Ok(Some(account)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// Mark the account with `id` as the default account, clearing the previous
/// default.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingAccount] if `id` does not refer to a valid account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn set_default_account(id: AccountId, connection: &mut Connection) -> Result<(), Error> {
    let sql_transaction = connection.transaction()?;

    sql_transaction.execute("UPDATE account SET is_default = 0", ())?;
    let rows_affected = sql_transaction.execute(
        "UPDATE account SET is_default = 1 WHERE id = :id",
        &[(":id", &id)],
    )?;

    if rows_affected == 0 {
        // Dropping the transaction rolls back the cleared default.
        return Err(Error::UpdateMissingAccount);
    }

    sql_transaction.commit()?;

    Ok(())
}

/// Get the total balance across all accounts.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_total_account_balance(connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row("SELECT COALESCE(SUM(balance), 0) FROM account", [], |row| {
            row.get(0)
        })
        .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{Error, db::initialize};

    use super::{
        AccountKind, NewAccount, create_account, get_account, get_all_accounts,
        get_default_account, get_total_account_balance, set_default_account,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn new_account(name: &str) -> NewAccount {
        NewAccount {
            name: name.to_owned(),
            kind: AccountKind::Current,
            balance: 100.0,
            is_default: false,
        }
    }

    #[test]
    fn create_succeeds() {
        let mut conn = get_test_connection();

        let account = create_account(&new_account("Everyday"), &mut conn).unwrap();

        assert_eq!(account.name, "Everyday");
        assert_eq!(account, get_account(account.id, &conn).unwrap());
    }

    #[test]
    fn create_fails_on_duplicate_name() {
        let mut conn = get_test_connection();
        create_account(&new_account("Everyday"), &mut conn).unwrap();

        let duplicate = create_account(&new_account("Everyday"), &mut conn);

        assert_eq!(
            duplicate,
            Err(Error::DuplicateAccountName("Everyday".to_owned()))
        );
    }

    #[test]
    fn create_default_clears_previous_default() {
        let mut conn = get_test_connection();
        let first = create_account(
            &NewAccount {
                is_default: true,
                ..new_account("First")
            },
            &mut conn,
        )
        .unwrap();

        let second = create_account(
            &NewAccount {
                is_default: true,
                ..new_account("Second")
            },
            &mut conn,
        )
        .unwrap();

        assert!(!get_account(first.id, &conn).unwrap().is_default);
        assert_eq!(get_default_account(&conn).unwrap(), Some(second));
    }

    #[test]
    fn get_all_orders_by_name() {
        let mut conn = get_test_connection();
        create_account(&new_account("Zebra"), &mut conn).unwrap();
        create_account(&new_account("Alpha"), &mut conn).unwrap();

        let accounts = get_all_accounts(&conn).unwrap();

        let names: Vec<&str> = accounts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Zebra"]);
    }

    #[test]
    fn set_default_moves_the_flag() {
        let mut conn = get_test_connection();
        let first = create_account(
            &NewAccount {
                is_default: true,
                ..new_account("First")
            },
            &mut conn,
        )
        .unwrap();
        let second = create_account(&new_account("Second"), &mut conn).unwrap();

        set_default_account(second.id, &mut conn).unwrap();

        assert!(!get_account(first.id, &conn).unwrap().is_default);
        assert!(get_account(second.id, &conn).unwrap().is_default);
    }

    #[test]
    fn set_default_fails_for_missing_account_and_keeps_previous_default() {
        let mut conn = get_test_connection();
        let account = create_account(
            &NewAccount {
                is_default: true,
                ..new_account("Only")
            },
            &mut conn,
        )
        .unwrap();

        let result = set_default_account(account.id + 1, &mut conn);

        assert_eq!(result, Err(Error::UpdateMissingAccount));
        assert!(
            get_account(account.id, &conn).unwrap().is_default,
            "a failed update should not clear the existing default"
        );
    }

    #[test]
    fn total_balance_sums_accounts() {
        let mut conn = get_test_connection();
        create_account(&new_account("First"), &mut conn).unwrap();
        create_account(
            &NewAccount {
                balance: -25.5,
                ..new_account("Second")
            },
            &mut conn,
        )
        .unwrap();

        assert_eq!(get_total_account_balance(&conn).unwrap(), 74.5);
    }

    #[test]
    fn total_balance_is_zero_with_no_accounts() {
        let conn = get_test_connection();

        assert_eq!(get_total_account_balance(&conn).unwrap(), 0.0);
    }
}
