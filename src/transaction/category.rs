//! Counts a month's transactions per product category for the pie chart.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, transaction::MonthFilter};

/// The number of transactions in a product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category name, exactly as stored.
    #[serde(rename = "_id")]
    pub category: String,
    /// How many transactions are in the category.
    pub count: u64,
}

/// Count the transactions per category for the month selected by `filter`.
///
/// Categories are compared with exact string equality, so "Electronics" and
/// "electronics" are counted separately. Categories are listed in the order
/// they first appear in the database.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_category_counts(
    filter: MonthFilter,
    connection: &Connection,
) -> Result<Vec<CategoryCount>, Error> {
    let query = format!(
        "SELECT category, COUNT(id)
        FROM product_transaction
        WHERE {}
        GROUP BY category
        ORDER BY MIN(id)",
        MonthFilter::SQL
    );

    connection
        .prepare(&query)?
        .query_map([filter.sql_param()], |row| {
            let count: i64 = row.get(1)?;

            Ok(CategoryCount {
                category: row.get(0)?,
                count: count.unsigned_abs(),
            })
        })?
        .collect::<Result<Vec<CategoryCount>, rusqlite::Error>>()
        .map_err(|error| error.into())
}
