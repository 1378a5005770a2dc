//! Storage for the prediction snapshot pushed by the external service.
//!
//! The snapshot is kept verbatim as a single JSON payload rather than being
//! normalized into rows: the page re-derives everything it needs at render
//! time, and keeping the raw payload means a point the parser cannot read
//! today can still be read after a parser fix.

use rusqlite::Connection;
use time::Date;

use crate::Error;

/// Create the prediction snapshot table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_prediction_snapshot_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    // Only ever one snapshot: each import replaces the previous one.
    connection.execute(
        "CREATE TABLE IF NOT EXISTS prediction_snapshot (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            payload TEXT NOT NULL,
            imported_on TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Replace the stored snapshot with `payload`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn save_snapshot(payload: &str, imported_on: Date, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO prediction_snapshot (id, payload, imported_on) VALUES (1, ?1, ?2)
         ON CONFLICT(id) DO UPDATE SET payload = excluded.payload,
                                       imported_on = excluded.imported_on",
        (payload, imported_on),
    )?;

    Ok(())
}

/// The stored snapshot and the date it was imported, if one has been pushed.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn load_snapshot(connection: &Connection) -> Result<Option<(String, Date)>, Error> {
    let result = connection.query_one(
        "SELECT payload, imported_on FROM prediction_snapshot WHERE id = 1",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    );

    match result {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(error) => Err(error.into()),
    }
}
