//! Loads the seed transactions from the seed source into the database.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, SeedSource,
    transaction::{NewTransaction, count_transactions, insert_transactions},
};

/// The default location of the seed data.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// The state needed for loading seed data.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection the seed data is inserted into.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Where to download the seed data from.
    pub seed_source: SeedSource,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            seed_source: state.seed_source.clone(),
        }
    }
}

/// Download the seed transactions.
///
/// # Errors
/// Returns an [Error::SeedFetch] if the request fails or the server responds
/// with an error status, or an [Error::SeedDecode] if the body is not a JSON
/// array of transactions.
pub async fn fetch_seed_data(source: &SeedSource) -> Result<Vec<NewTransaction>, Error> {
    let body = source
        .client
        .get(&source.url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|error| Error::SeedFetch(error.to_string()))?
        .bytes()
        .await
        .map_err(|error| Error::SeedFetch(error.to_string()))?;

    serde_json::from_slice(&body).map_err(|error| Error::SeedDecode(error.to_string()))
}

/// Download the seed data and insert all of it into the database.
///
/// Every call inserts a fresh copy of the seed data, so calling this twice
/// stores every transaction twice. The download finishes before the database
/// is locked.
async fn seed_database(state: &SeedState) -> Result<usize, Error> {
    let transactions = fetch_seed_data(&state.seed_source)
        .await
        .inspect_err(|error| tracing::error!("could not load seed data: {error}"))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let inserted = insert_transactions(&transactions, &connection)?;
    let total = count_transactions(&connection)?;
    tracing::info!("Inserted {inserted} seed transactions, {total} transactions in total");

    Ok(inserted)
}

/// A route handler that loads the seed data into the database.
pub async fn initialize_endpoint(State(state): State<SeedState>) -> Response {
    match seed_database(&state).await {
        Ok(_) => (StatusCode::CREATED, "Database initialized with seed data").into_response(),
        Err(error) => error.into_plain_text_response("Error initializing database"),
    }
}
