//! The JSON API for reading transactions and their month summaries.
//!
//! Every endpoint takes an optional `month` query parameter. A missing or
//! invalid month is not an error, it just selects no transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    pagination::{PageRequest, PaginationConfig},
    transaction::{
        MonthFilter, get_category_counts, get_month_summary, get_price_ranges, get_statistics,
        get_transactions,
    },
};

/// The state needed by the transaction API.
#[derive(Debug, Clone)]
pub struct TransactionApiState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The default paging for the list endpoint.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters for the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// The raw month, see [MonthFilter::parse].
    pub month: Option<String>,
    /// The 1-based page number.
    pub page: Option<u64>,
    /// The number of transactions per page, zero for all of them.
    #[serde(rename = "perPage")]
    pub per_page: Option<u64>,
}

/// The query parameters for the endpoints that only filter by month.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// The raw month, see [MonthFilter::parse].
    pub month: Option<String>,
}

impl MonthQuery {
    fn filter(&self) -> MonthFilter {
        MonthFilter::parse(self.month.as_deref())
    }
}

fn read_database<T>(
    db_connection: &Mutex<Connection>,
    read: impl FnOnce(&Connection) -> Result<T, Error>,
) -> Result<T, Error> {
    let connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    read(&connection)
}

/// List one page of the transactions in a month.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionApiState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let filter = MonthFilter::parse(query.month.as_deref());
    let page = PageRequest::from_query(query.page, query.per_page, &state.pagination_config);

    match read_database(&state.db_connection, |connection| {
        get_transactions(filter, page, connection)
    }) {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_plain_text_response("Error fetching transactions"),
    }
}

/// Get the sales totals for a month.
///
/// Responds with an empty body when the month has no transactions.
pub async fn get_statistics_endpoint(
    State(state): State<TransactionApiState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    match read_database(&state.db_connection, |connection| {
        get_statistics(query.filter(), connection)
    }) {
        Ok(Some(statistics)) => Json(statistics).into_response(),
        Ok(None) => StatusCode::OK.into_response(),
        Err(error) => error.into_plain_text_response("Error fetching statistics"),
    }
}

/// Get the price range histogram for a month.
pub async fn get_bar_chart_endpoint(
    State(state): State<TransactionApiState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    match read_database(&state.db_connection, |connection| {
        get_price_ranges(query.filter(), connection)
    }) {
        Ok(price_ranges) => Json(price_ranges).into_response(),
        Err(error) => error.into_plain_text_response("Error fetching bar chart data"),
    }
}

/// Get the number of transactions per category for a month.
pub async fn get_pie_chart_endpoint(
    State(state): State<TransactionApiState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    match read_database(&state.db_connection, |connection| {
        get_category_counts(query.filter(), connection)
    }) {
        Ok(categories) => Json(categories).into_response(),
        Err(error) => error.into_plain_text_response("Error fetching pie chart data"),
    }
}

/// Get the transactions, totals and chart data for a month in one response.
pub async fn get_combined_endpoint(
    State(state): State<TransactionApiState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    match read_database(&state.db_connection, |connection| {
        get_month_summary(query.filter(), connection)
    }) {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => error.into_plain_text_response("Error fetching combined data"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        db::initialize,
        endpoints,
        pagination::PaginationConfig,
        transaction::{
            CategoryCount, PriceRangeCount, Statistics, Transaction, insert_transactions,
            summary::MonthSummary,
        },
    };

    use super::{
        TransactionApiState, get_bar_chart_endpoint, get_combined_endpoint,
        get_pie_chart_endpoint, get_statistics_endpoint, get_transactions_endpoint,
    };

    fn get_test_state() -> TransactionApiState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        TransactionApiState {
            db_connection: Arc::new(Mutex::new(connection)),
            pagination_config: PaginationConfig::default(),
        }
    }

    fn get_test_server(state: TransactionApiState) -> TestServer {
        let app = Router::new()
            .route(endpoints::TRANSACTIONS_API, get(get_transactions_endpoint))
            .route(endpoints::STATISTICS_API, get(get_statistics_endpoint))
            .route(endpoints::BAR_CHART_API, get(get_bar_chart_endpoint))
            .route(endpoints::PIE_CHART_API, get(get_pie_chart_endpoint))
            .route(endpoints::COMBINED_API, get(get_combined_endpoint))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn seed_single_march_sale(state: &TransactionApiState) {
        insert_transactions(
            &[Transaction::build(150.0, datetime!(2022-03-10 0:00 UTC))
                .title("Headphones")
                .description("Noise cancelling")
                .category("Electronics")
                .sold(true)],
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not insert test transactions");
    }

    fn seed_march_sales(state: &TransactionApiState, count: u8) {
        let transactions: Vec<_> = (0..count)
            .map(|i| {
                Transaction::build(f64::from(i), datetime!(2022-03-01 0:00 UTC))
                    .title(&format!("product #{i}"))
            })
            .collect();

        insert_transactions(&transactions, &state.db_connection.lock().unwrap())
            .expect("Could not insert test transactions");
    }

    #[tokio::test]
    async fn single_march_sale_across_endpoints() {
        let state = get_test_state();
        seed_single_march_sale(&state);
        let server = get_test_server(state);

        let statistics = server
            .get(&format!("{}?month=3", endpoints::STATISTICS_API))
            .await
            .json::<Statistics>();
        let bar_chart = server
            .get(&format!("{}?month=3", endpoints::BAR_CHART_API))
            .await
            .json::<serde_json::Value>();
        let pie_chart = server
            .get(&format!("{}?month=3", endpoints::PIE_CHART_API))
            .await
            .json::<Vec<CategoryCount>>();

        assert_eq!(
            statistics,
            Statistics {
                total_amount: 150.0,
                total_sold: 1,
                total_not_sold: 0
            }
        );
        assert_eq!(bar_chart, json!([{ "_id": 100, "count": 1 }]));
        assert_eq!(
            pie_chart,
            vec![CategoryCount {
                category: "Electronics".to_owned(),
                count: 1
            }]
        );
    }

    #[tokio::test]
    async fn lists_transactions_as_json() {
        let state = get_test_state();
        seed_single_march_sale(&state);
        let server = get_test_server(state);

        let response = server
            .get(&format!("{}?month=3", endpoints::TRANSACTIONS_API))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!([{
            "id": 1,
            "title": "Headphones",
            "description": "Noise cancelling",
            "price": 150.0,
            "category": "Electronics",
            "dateOfSale": "2022-03-10T00:00:00Z",
            "sold": true
        }]));
    }

    #[tokio::test]
    async fn missing_month_lists_nothing() {
        let state = get_test_state();
        seed_single_march_sale(&state);
        let server = get_test_server(state);

        let response = server.get(endpoints::TRANSACTIONS_API).await;

        response.assert_status_ok();
        response.assert_json(&json!([]));
    }

    #[tokio::test]
    async fn non_numeric_month_lists_nothing() {
        let state = get_test_state();
        seed_single_march_sale(&state);
        let server = get_test_server(state);

        let response = server
            .get(&format!("{}?month=march", endpoints::TRANSACTIONS_API))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!([]));
    }

    #[tokio::test]
    async fn default_page_size_is_ten() {
        let state = get_test_state();
        seed_march_sales(&state, 12);
        let server = get_test_server(state);

        let transactions = server
            .get(&format!("{}?month=3", endpoints::TRANSACTIONS_API))
            .await
            .json::<Vec<serde_json::Value>>();

        assert_eq!(transactions.len(), 10);
    }

    #[tokio::test]
    async fn pages_reconstruct_all_matches() {
        let state = get_test_state();
        seed_march_sales(&state, 11);
        let server = get_test_server(state);

        let mut titles = Vec::new();
        for page in 1..=4 {
            let transactions = server
                .get(&format!(
                    "{}?month=3&page={page}&perPage=3",
                    endpoints::TRANSACTIONS_API
                ))
                .await
                .json::<Vec<serde_json::Value>>();
            titles.extend(
                transactions
                    .into_iter()
                    .map(|transaction| transaction["title"].as_str().unwrap().to_owned()),
            );
        }

        let want: Vec<String> = (0..11).map(|i| format!("product #{i}")).collect();
        assert_eq!(titles, want);
    }

    #[tokio::test]
    async fn zero_per_page_lists_everything() {
        let state = get_test_state();
        seed_march_sales(&state, 12);
        let server = get_test_server(state);

        let transactions = server
            .get(&format!("{}?month=3&perPage=0", endpoints::TRANSACTIONS_API))
            .await
            .json::<Vec<serde_json::Value>>();

        assert_eq!(transactions.len(), 12);
    }

    #[tokio::test]
    async fn non_numeric_page_is_rejected() {
        let server = get_test_server(get_test_state());

        let response = server
            .get(&format!("{}?month=3&page=two", endpoints::TRANSACTIONS_API))
            .expect_failure()
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn statistics_for_empty_month_has_empty_body() {
        let state = get_test_state();
        seed_single_march_sale(&state);
        let server = get_test_server(state);

        let response = server
            .get(&format!("{}?month=4", endpoints::STATISTICS_API))
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), "");
    }

    #[tokio::test]
    async fn bar_chart_puts_one_thousand_in_overflow() {
        let state = get_test_state();
        insert_transactions(
            &[Transaction::build(1000.0, datetime!(2022-03-10 0:00 UTC))],
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        let server = get_test_server(state);

        let response = server
            .get(&format!("{}?month=3", endpoints::BAR_CHART_API))
            .await;

        response.assert_json(&json!([{ "_id": "901-above", "count": 1 }]));
    }

    #[tokio::test]
    async fn combined_matches_individual_endpoints() {
        let state = get_test_state();
        seed_single_march_sale(&state);
        seed_march_sales(&state, 5);
        let server = get_test_server(state);

        let summary = server
            .get(&format!("{}?month=3", endpoints::COMBINED_API))
            .await
            .json::<MonthSummary>();
        let transactions = server
            .get(&format!("{}?month=3&perPage=0", endpoints::TRANSACTIONS_API))
            .await
            .json::<Vec<serde_json::Value>>();
        let statistics = server
            .get(&format!("{}?month=3", endpoints::STATISTICS_API))
            .await
            .json::<Statistics>();
        let price_ranges = server
            .get(&format!("{}?month=3", endpoints::BAR_CHART_API))
            .await
            .json::<Vec<PriceRangeCount>>();
        let categories = server
            .get(&format!("{}?month=3", endpoints::PIE_CHART_API))
            .await
            .json::<Vec<CategoryCount>>();

        assert_eq!(summary.transactions.len(), transactions.len());
        assert_eq!(summary.statistics, Some(statistics));
        assert_eq!(summary.price_ranges, price_ranges);
        assert_eq!(summary.categories, categories);
    }

    #[tokio::test]
    async fn combined_omits_statistics_for_empty_month() {
        let server = get_test_server(get_test_state());

        let response = server
            .get(&format!("{}?month=3", endpoints::COMBINED_API))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "transactions": [],
            "priceRanges": [],
            "categories": []
        }));
    }

    #[tokio::test]
    async fn database_errors_are_plain_text() {
        let state = get_test_state();
        state
            .db_connection
            .lock()
            .unwrap()
            .execute("DROP TABLE product_transaction", ())
            .unwrap();
        let server = get_test_server(state);

        let cases = [
            (endpoints::TRANSACTIONS_API, "Error fetching transactions"),
            (endpoints::STATISTICS_API, "Error fetching statistics"),
            (endpoints::BAR_CHART_API, "Error fetching bar chart data"),
            (endpoints::PIE_CHART_API, "Error fetching pie chart data"),
            (endpoints::COMBINED_API, "Error fetching combined data"),
        ];

        for (endpoint, want_message) in cases {
            let response = server
                .get(&format!("{endpoint}?month=3"))
                .expect_failure()
                .await;

            assert_eq!(
                response.status_code(),
                StatusCode::INTERNAL_SERVER_ERROR,
                "{endpoint}"
            );
            assert_eq!(response.text(), want_message, "{endpoint}");
        }
    }
}
