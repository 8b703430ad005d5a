//! The API endpoints URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The page showing the transactions, totals and charts for one month.
pub const DASHBOARD_VIEW: &str = "/dashboard";

/// The route that loads the seed data into the database.
pub const INITIALIZE: &str = "/api/initialize";
/// The route for listing a month's transactions one page at a time.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route for a month's sales totals.
pub const STATISTICS_API: &str = "/api/statistics";
/// The route for a month's price range histogram.
pub const BAR_CHART_API: &str = "/api/bar-chart";
/// The route for a month's category counts.
pub const PIE_CHART_API: &str = "/api/pie-chart";
/// The route returning the transactions, totals and both charts in one response.
pub const COMBINED_API: &str = "/api/combined";
