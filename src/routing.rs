//! Application router configuration.

use axum::{Router, response::Redirect, routing::get};
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    dashboard::get_dashboard_page,
    endpoints,
    not_found::get_404_not_found,
    seed::initialize_endpoint,
    transaction::{
        get_bar_chart_endpoint, get_combined_endpoint, get_pie_chart_endpoint,
        get_statistics_endpoint, get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// The JSON API allows requests from any origin so that browser clients
/// served from elsewhere can use it.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(endpoints::INITIALIZE, get(initialize_endpoint))
        .route(endpoints::TRANSACTIONS_API, get(get_transactions_endpoint))
        .route(endpoints::STATISTICS_API, get(get_statistics_endpoint))
        .route(endpoints::BAR_CHART_API, get(get_bar_chart_endpoint))
        .route(endpoints::PIE_CHART_API, get(get_pie_chart_endpoint))
        .route(endpoints::COMBINED_API, get(get_combined_endpoint));

    let view_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page));

    api_routes
        .merge(view_routes)
        .fallback(get_404_not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }
}
