//! Dashboard module
//!
//! Provides a page showing one month of transactions as a paginated table,
//! the month's sales totals and charts of the price ranges and categories.

mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
