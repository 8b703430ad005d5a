//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for the dashboard page and its htmx partial
//! - HTML view functions for rendering the dashboard UI
//! - State and query types used by the handler

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRequest;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Month;

use crate::{
    AppState, DashboardConfig, Error,
    dashboard::{
        charts::{DashboardChart, category_chart, charts_view, price_range_chart},
        tables::{pagination_view, statistics_card, transactions_table},
    },
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_SELECT_STYLE, HeadElement, PAGE_CONTAINER_STYLE, alert_container,
        base, loading_spinner,
    },
    pagination::{PageRequest, clamp_page, create_pagination_indicators, page_count},
    transaction::{
        CategoryCount, MonthFilter, PriceRangeCount, Statistics, Transaction, get_category_counts,
        get_price_ranges, get_statistics, get_transactions,
    },
};

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The default month and table page size.
    pub dashboard_config: DashboardConfig,
    /// The maximum number of page links to show below the table.
    pub max_pages: u64,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            dashboard_config: state.dashboard_config,
            max_pages: state.pagination_config.max_pages,
        }
    }
}

/// The query parameters for the dashboard page.
///
/// Both are kept as text so that a bad value falls back to the default
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The month number, 1-12.
    pub month: Option<String>,
    /// The 1-based page of the transaction table.
    pub page: Option<String>,
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    month: Month,
    statistics: Option<Statistics>,
    transactions: Vec<Transaction>,
    page: u64,
    page_count: u64,
    price_ranges: Vec<PriceRangeCount>,
    categories: Vec<CategoryCount>,
}

/// Display the transactions, totals and charts for one month.
///
/// htmx requests only receive the dashboard content so that the month
/// selector and page links can swap it in place. If loading the data fails,
/// htmx requests receive an alert instead so that the previous content stays
/// on screen.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let month = MonthFilter::parse(query.month.as_deref())
        .month()
        .unwrap_or(state.dashboard_config.default_month);
    let requested_page = query
        .page
        .as_deref()
        .and_then(|page| page.trim().parse::<u64>().ok())
        .unwrap_or(1);

    let data = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| {
            get_dashboard_data(
                month,
                requested_page,
                state.dashboard_config.page_size,
                &connection,
            )
        });

    let data = match data {
        Ok(data) => data,
        Err(error) if is_htmx_request => return error.into_alert_response(),
        Err(error) => return error.into_response(),
    };

    let content = dashboard_content(&data, state.max_pages);

    if is_htmx_request {
        html! {
            (content)
            (alert_container(true))
        }
        .into_response()
    } else {
        dashboard_view(month, &content).into_response()
    }
}

/// Load one page of the month's transactions along with the totals and chart
/// data.
///
/// The requested page is clamped to the pages that exist, using the match
/// count from the totals. All queries read from the same snapshot.
fn get_dashboard_data(
    month: Month,
    requested_page: u64,
    page_size: u64,
    connection: &Connection,
) -> Result<DashboardData, Error> {
    let filter = MonthFilter::new(month);
    let snapshot = connection.unchecked_transaction()?;

    let statistics = get_statistics(filter, &snapshot)?;
    let match_count = statistics.map_or(0, |statistics| statistics.transaction_count());
    let page_count = page_count(match_count, page_size);
    let page = clamp_page(requested_page, page_count);

    let data = DashboardData {
        month,
        statistics,
        transactions: get_transactions(filter, PageRequest::new(page, page_size), &snapshot)?,
        page,
        page_count,
        price_ranges: get_price_ranges(filter, &snapshot)?,
        categories: get_category_counts(filter, &snapshot)?,
    };

    snapshot.commit()?;

    Ok(data)
}

/// The URL of the dashboard showing `page` of `month`.
fn dashboard_url(month: Month, page: u64) -> String {
    let params = [
        ("month", u8::from(month).to_string()),
        ("page", page.to_string()),
    ];

    match serde_urlencoded::to_string(params) {
        Ok(query) => format!("{}?{query}", endpoints::DASHBOARD_VIEW),
        Err(error) => {
            tracing::error!("Could not encode dashboard query for {month} page {page}: {error}");
            endpoints::DASHBOARD_VIEW.to_owned()
        }
    }
}

/// Renders the full dashboard page with the month selector.
fn dashboard_view(month: Month, content: &Markup) -> Markup {
    let page = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                h1 class="text-3xl font-bold mb-6" { "Transaction Dashboard" }

                form
                    hx-get=(endpoints::DASHBOARD_VIEW)
                    hx-trigger="change"
                    hx-target="#dashboard-content"
                    hx-target-error="#alert-container"
                    hx-indicator="#indicator"
                    hx-push-url="true"
                    class="flex items-end gap-4 mb-6"
                {
                    div
                    {
                        label for="month" class=(FORM_LABEL_STYLE) { "Select Month" }

                        select id="month" name="month" class=(FORM_SELECT_STYLE)
                        {
                            @for option in MONTHS
                            {
                                option value=(u8::from(option)) selected[option == month]
                                {
                                    (option.to_string())
                                }
                            }
                        }
                    }

                    span id="indicator" class="htmx-indicator text-sm"
                    {
                        (loading_spinner())
                        "Loading data..."
                    }
                }

                div id="dashboard-content" { (content) }
            }
        }
    );

    let scripts = [HeadElement::ScriptLink(
        "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js".to_owned(),
    )];

    base("Dashboard", &scripts, &page)
}

/// Renders the part of the dashboard that changes with the month and page.
fn dashboard_content(data: &DashboardData, max_pages: u64) -> Markup {
    let charts = [
        DashboardChart {
            id: "price-range-chart",
            options: price_range_chart(data.month, &data.price_ranges).to_string(),
        },
        DashboardChart {
            id: "category-chart",
            options: category_chart(data.month, &data.categories).to_string(),
        },
    ];
    let indicators = create_pagination_indicators(data.page, data.page_count, max_pages);
    let month = data.month;

    html!(
        (statistics_card(data.month, data.statistics))

        section id="transactions" class="w-full mb-8"
        {
            h2 class="text-2xl font-semibold mb-4" { "Transactions" }

            (transactions_table(&data.transactions))

            (pagination_view(data.page, data.page_count, &indicators, |page| {
                dashboard_url(month, page)
            }))
        }

        (charts_view(&charts))
    )
}
