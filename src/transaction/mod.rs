//! Product transactions and the month-scoped queries over them.
//!
//! This module contains:
//! - The `Transaction` model and the `NewTransaction` seed record
//! - The month predicate shared by every query
//! - Queries for listing, totals, price ranges and categories
//! - The JSON API handlers built on those queries

mod api;
mod category;
mod core;
mod month;
mod price_range;
mod statistics;
mod summary;

pub use api::{
    get_bar_chart_endpoint, get_combined_endpoint, get_pie_chart_endpoint,
    get_statistics_endpoint, get_transactions_endpoint,
};
pub use category::{CategoryCount, get_category_counts};
pub use core::{
    NewTransaction, Transaction, count_transactions, create_transaction_table, get_transactions,
    insert_transactions,
};
pub use month::MonthFilter;
#[cfg(test)]
pub use price_range::PriceRange;
pub use price_range::{PriceRangeCount, get_price_ranges};
pub use statistics::{Statistics, get_statistics};
pub use summary::get_month_summary;
