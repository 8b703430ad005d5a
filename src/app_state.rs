//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::Month;

use crate::{Error, db::initialize, pagination::PaginationConfig};

/// Where the initialize endpoint downloads the seed transactions from.
#[derive(Debug, Clone)]
pub struct SeedSource {
    /// The URL of a JSON array of transaction objects.
    pub url: String,
    /// The HTTP client used to fetch `url`.
    pub client: reqwest::Client,
}

impl SeedSource {
    /// Create a seed source for `url` with a default HTTP client.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            client: reqwest::Client::new(),
        }
    }
}

/// Settings for the HTML dashboard that are fixed at startup.
#[derive(Debug, Clone, Copy)]
pub struct DashboardConfig {
    /// The month selected when the dashboard is opened without a month.
    pub default_month: Month,
    /// The number of transactions shown per table page.
    pub page_size: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_month: Month::March,
            page_size: 4,
        }
    }
}

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The source of the data loaded by the initialize endpoint.
    pub seed_source: SeedSource,

    /// The config that controls the default paging of the transactions API.
    pub pagination_config: PaginationConfig,

    /// The config for the HTML dashboard.
    pub dashboard_config: DashboardConfig,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        seed_source: SeedSource,
        pagination_config: PaginationConfig,
        dashboard_config: DashboardConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            seed_source,
            pagination_config,
            dashboard_config,
        })
    }
}
