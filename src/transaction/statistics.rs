//! Sales totals for a month.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, transaction::MonthFilter};

/// The sales totals for the transactions in a month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the prices of all transactions, sold or not.
    pub total_amount: f64,
    /// The number of transactions where the product was sold.
    pub total_sold: u64,
    /// The number of transactions where the product was not sold.
    pub total_not_sold: u64,
}

impl Statistics {
    /// The number of transactions the totals were computed over.
    pub fn transaction_count(&self) -> u64 {
        self.total_sold + self.total_not_sold
    }
}

/// Compute the sales totals for the month selected by `filter`.
///
/// Returns `None` when no transactions match, in which case callers should
/// treat every total as zero.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_statistics(
    filter: MonthFilter,
    connection: &Connection,
) -> Result<Option<Statistics>, Error> {
    let query = format!(
        "SELECT COUNT(id), TOTAL(price), COUNT(CASE WHEN sold THEN 1 END)
        FROM product_transaction
        WHERE {}",
        MonthFilter::SQL
    );

    let (count, total_amount, total_sold): (i64, f64, i64) = connection
        .prepare(&query)?
        .query_row([filter.sql_param()], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?;

    if count == 0 {
        return Ok(None);
    }

    Ok(Some(Statistics {
        total_amount,
        total_sold: total_sold.unsigned_abs(),
        total_not_sold: (count - total_sold).unsigned_abs(),
    }))
}
