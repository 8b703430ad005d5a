//! Everything the dashboard shows for a month, computed in one go.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    pagination::PageRequest,
    transaction::{
        CategoryCount, MonthFilter, PriceRangeCount, Statistics, Transaction, get_category_counts,
        get_price_ranges, get_statistics, get_transactions,
    },
};

/// The transactions in a month along with their totals and chart data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    /// Every transaction in the month, in insertion order.
    pub transactions: Vec<Transaction>,
    /// The sales totals, or `None` if there were no transactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
    /// The price range histogram.
    pub price_ranges: Vec<PriceRangeCount>,
    /// The number of transactions per category.
    pub categories: Vec<CategoryCount>,
}

/// Get the full summary for the month selected by `filter`.
///
/// The queries run inside a single read transaction so that all parts of the
/// summary describe the same data, even if a seed load commits in between.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_month_summary(
    filter: MonthFilter,
    connection: &Connection,
) -> Result<MonthSummary, Error> {
    let snapshot = connection.unchecked_transaction()?;

    let summary = MonthSummary {
        transactions: get_transactions(filter, PageRequest::all(), &snapshot)?,
        statistics: get_statistics(filter, &snapshot)?,
        price_ranges: get_price_ranges(filter, &snapshot)?,
        categories: get_category_counts(filter, &snapshot)?,
    };

    snapshot.commit()?;

    Ok(summary)
}
