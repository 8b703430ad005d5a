//! A small sales reporting dashboard.
//!
//! The library loads a fixed JSON dataset of product transactions into a
//! SQLite database and serves month-filtered listings, totals and chart data
//! as a JSON API, plus an HTML dashboard built on top of the same queries.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod dashboard;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod not_found;
mod pagination;
mod routing;
mod seed;
#[cfg(test)]
mod test_utils;
mod transaction;

pub use app_state::{AppState, DashboardConfig, SeedSource};
pub use db::{close as close_db, initialize as initialize_db};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use seed::DEFAULT_SEED_URL;

use crate::{alert::Alert, internal_server_error::InternalServerError};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The seed data could not be downloaded from the seed source.
    ///
    /// The error string comes from the HTTP client and should only be logged.
    #[error("could not fetch seed data: {0}")]
    SeedFetch(String),

    /// The seed source responded, but the body was not a JSON array of
    /// transactions.
    #[error("could not decode seed data: {0}")]
    SeedDecode(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl Error {
    /// Whether the error happened while loading seed data, as opposed to
    /// while reading from the database.
    pub fn is_seed_error(&self) -> bool {
        matches!(self, Error::SeedFetch(_) | Error::SeedDecode(_))
    }

    /// Log the error and turn it into a bare 500 response with `message` as
    /// a plain text body.
    ///
    /// The JSON API never exposes the underlying error to the client.
    fn into_plain_text_response(self, message: &'static str) -> Response {
        if self.is_seed_error() {
            tracing::error!("{message}, the seed source is unavailable or invalid: {self}");
        } else {
            tracing::error!("{message}: {self}");
        }

        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }

    /// Render the error as an alert fragment for htmx requests.
    fn into_alert_response(self) -> Response {
        tracing::error!("An unexpected error occurred: {self}");
        Alert::error(
            "Error fetching data",
            "Showing the last data that loaded. Check the server logs for more details.",
        )
        .into_response()
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("An unexpected error occurred: {self}");
        InternalServerError::default().into_response()
    }
}
