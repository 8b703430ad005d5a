//! Database setup and teardown.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, transaction::create_transaction_table};

/// Create the tables for the domain models if they do not already exist.
///
/// # Errors
/// Returns an [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_transaction_table(connection)?;

    Ok(())
}

/// Close the database connection shared with the router.
///
/// Nothing happens if another clone of `connection` is still alive, e.g.
/// because a request is still being handled. The connection is then closed
/// when the last clone is dropped.
///
/// # Errors
/// Returns an error if the connection lock is poisoned or SQLite fails to
/// close the connection.
pub fn close(connection: Arc<Mutex<Connection>>) -> Result<(), Error> {
    let Ok(connection) = Arc::try_unwrap(connection) else {
        tracing::warn!("database connection is still in use, leaving it open");
        return Ok(());
    };

    let connection = connection
        .into_inner()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    connection.close().map_err(|(_, error)| Error::from(error))
}
