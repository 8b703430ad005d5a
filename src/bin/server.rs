use std::{fs::OpenOptions, net::SocketAddr, process::ExitCode, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use time::Month;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use sales_dashboard::{
    AppState, DEFAULT_SEED_URL, DashboardConfig, PaginationConfig, SeedSource, build_router,
    close_db, graceful_shutdown, logging_middleware,
};

/// The web server for the sales dashboard and its JSON API.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "DB_PATH", default_value = "transactions.db")]
    db_path: String,

    /// The port to serve the dashboard and API from.
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// The URL of the JSON array of transactions loaded by the initialize endpoint.
    #[arg(long, env = "SEED_URL", default_value = DEFAULT_SEED_URL)]
    seed_url: String,

    /// The month (1-12) the dashboard shows when no month is selected.
    #[arg(long, env = "DEFAULT_MONTH", default_value = "3", value_parser = parse_month)]
    default_month: Month,

    /// The number of transactions per page in the dashboard table.
    #[arg(long, env = "PAGE_SIZE", default_value_t = 4)]
    page_size: u64,
}

fn parse_month(value: &str) -> Result<Month, String> {
    let number: u8 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a month number"))?;

    Month::try_from(number).map_err(|_| format!("{number} is not between 1 and 12"))
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));

    let conn = match Connection::open(&args.db_path) {
        Ok(conn) => conn,
        Err(error) => {
            tracing::error!("Could not open database at {}: {error}", args.db_path);
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::new(
        conn,
        SeedSource::new(&args.seed_url),
        PaginationConfig::default(),
        DashboardConfig {
            default_month: args.default_month,
            page_size: args.page_size,
        },
    ) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not initialize database: {error}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("Opened database at {}", args.db_path);

    let db_connection = state.db_connection.clone();

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on http://{addr}");
    let result = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await;

    if let Err(error) = close_db(db_connection) {
        tracing::error!("Could not close database: {error}");
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("Server stopped with an error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they happen, so don't log 5xx responses twice.
        .on_failure(());

    router.layer(tracing_layer)
}

#[cfg(test)]
mod tests {
    use time::Month;

    use super::parse_month;

    #[test]
    fn parses_month_numbers() {
        assert_eq!(parse_month("3"), Ok(Month::March));
        assert_eq!(parse_month("12"), Ok(Month::December));
    }

    #[test]
    fn rejects_invalid_months() {
        assert!(parse_month("0").is_err());
        assert!(parse_month("13").is_err());
        assert!(parse_month("March").is_err());
    }
}
