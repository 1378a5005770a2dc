//! Database initialization for the application's domain models.

use rusqlite::Connection;

use crate::{
    account::create_account_table, prediction::create_prediction_snapshot_table,
    transaction::create_transaction_table,
};

/// Create the tables for all of the application's domain models.
///
/// Each model module owns its table definition; this function exists so that
/// binaries and tests have a single entry point for setting up a database.
///
/// # Errors
/// Returns an error if any table cannot be created or if there is an SQL
/// error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    // Foreign keys are off by default in SQLite and the transaction table
    // relies on ON DELETE CASCADE.
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    create_account_table(connection)?;
    create_transaction_table(connection)?;
    create_prediction_snapshot_table(connection)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_succeeds_on_empty_database() {
        let connection = Connection::open_in_memory().unwrap();

        assert_eq!(Ok(()), initialize(&connection));
    }

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        assert_eq!(Ok(()), initialize(&connection));
    }
}
