//! Defines the database queries for transactions.

use rusqlite::{Connection, Row};

use crate::{Error, account::AccountId};

use super::{
    categories::get_category,
    models::{Transaction, TransactionBuilder, TransactionId},
};

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                kind TEXT NOT NULL,
                is_recurring INTEGER NOT NULL DEFAULT 0,
                recurring_interval TEXT,
                next_recurring_date TEXT,
                FOREIGN KEY(account_id) REFERENCES account(id) ON DELETE CASCADE
                )",
        (),
    )?;

    // Composite index used by the account page and dashboard.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_account_date
         ON \"transaction\"(account_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        account_id: row.get(1)?,
        date: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        amount: row.get(5)?,
        kind: row.get(6)?,
        is_recurring: row.get(7)?,
        recurring_interval: row.get(8)?,
        next_recurring_date: row.get(9)?,
    })
}

const TRANSACTION_COLUMNS: &str =
    "id, account_id, date, description, category, amount, kind, is_recurring, \
     recurring_interval, next_recurring_date";

fn validate_builder(builder: &TransactionBuilder) -> Result<(), Error> {
    if get_category(&builder.category).is_none() {
        return Err(Error::InvalidCategory(builder.category.clone()));
    }

    if builder.is_recurring && builder.recurring_interval.is_none() {
        return Err(Error::MissingRecurringInterval);
    }

    Ok(())
}

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category key is not in the category table,
/// - or [Error::MissingRecurringInterval] if the transaction is recurring
///   without an interval,
/// - or [Error::InvalidAccount] if the account ID does not refer to a real
///   account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate_builder(&builder)?;

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" \
             (account_id, date, description, category, amount, kind, is_recurring, \
              recurring_interval, next_recurring_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING {TRANSACTION_COLUMNS}",
        ))?
        .query_row(
            (
                builder.account_id,
                builder.date,
                &builder.description,
                &builder.category,
                builder.amount,
                builder.kind,
                builder.is_recurring,
                builder.recurring_interval,
                builder.next_recurring_date,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidAccount(Some(builder.account_id)),
            error => error.into(),
        })?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .query_one(
            &format!("SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"),
            &[(":id", &id)],
            map_transaction_row,
        )
        .map_err(Error::from)
}

/// Overwrite the transaction with `id` using the fields from `builder`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid
///   transaction,
/// - or any of the validation errors from [create_transaction],
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate_builder(&builder)?;

    let rows_affected = connection
        .execute(
            "UPDATE \"transaction\"
             SET account_id = ?1, date = ?2, description = ?3, category = ?4, amount = ?5,
                 kind = ?6, is_recurring = ?7, recurring_interval = ?8, next_recurring_date = ?9
             WHERE id = ?10",
            (
                builder.account_id,
                builder.date,
                &builder.description,
                &builder.category,
                builder.amount,
                builder.kind,
                builder.is_recurring,
                builder.recurring_interval,
                builder.next_recurring_date,
                id,
            ),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidAccount(Some(builder.account_id)),
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    get_transaction(id, connection)
}

type RowsAffected = usize;

/// Delete the transaction with `id`, returning the number of rows affected.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn delete_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}

/// Delete exactly the transactions with the given ids, all or nothing.
///
/// The deletes run inside a single SQL transaction. If any id does not refer
/// to an existing row the whole batch rolls back, so a failed bulk delete
/// leaves the table byte-for-byte unchanged.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if any id is not in the database,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transactions(
    ids: &[TransactionId],
    connection: &mut Connection,
) -> Result<(), Error> {
    if ids.is_empty() {
        return Ok(());
    }

    let sql_transaction = connection.transaction()?;

    for &id in ids {
        let rows_affected = sql_transaction
            .execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])?;

        if rows_affected == 0 {
            // Dropping the transaction rolls back the deletes so far.
            return Err(Error::DeleteMissingTransaction);
        }
    }

    sql_transaction.commit()?;

    Ok(())
}

/// Get all transactions in insertion order.
///
/// The table engine does its own filtering and sorting; insertion order gives
/// it a stable base ordering for tie-breaking.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" ORDER BY id ASC"
        ))?
        .query_map([], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Get all transactions belonging to an account, in insertion order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_transactions_for_account(
    account_id: AccountId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
             WHERE account_id = :account_id ORDER BY id ASC"
        ))?
        .query_map(&[(":account_id", &account_id)], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}
