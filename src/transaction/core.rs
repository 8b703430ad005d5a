//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, pagination::PageRequest, transaction::MonthFilter};

/// Alias for the integer type used for mapping to database IDs.
pub type TransactionId = i64;

// ============================================================================
// MODELS
// ============================================================================

/// The sale of a product, as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction. IDs increase in insertion order.
    pub id: TransactionId,
    /// The name of the product.
    pub title: String,
    /// A longer text description of the product.
    pub description: String,
    /// The price the product was listed at.
    pub price: f64,
    /// The product category, e.g. "electronics".
    pub category: String,
    /// When the product was sold, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// Whether the product was sold.
    pub sold: bool,
}

/// A transaction that has not been stored yet.
///
/// This is the shape of the objects in the seed data. Fields the database
/// does not store, such as the seed data's own `id` and `image`, are ignored
/// when deserializing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// The name of the product.
    pub title: String,
    /// A longer text description of the product.
    pub description: String,
    /// The price the product was listed at.
    pub price: f64,
    /// The product category, e.g. "electronics".
    pub category: String,
    /// When the product was sold. Any UTC offset is accepted.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// Whether the product was sold.
    pub sold: bool,
}

#[cfg(test)]
impl Transaction {
    /// Create a new, unsold transaction.
    ///
    /// Shortcut for building a [NewTransaction] with an empty title and
    /// description and the category "uncategorized".
    pub fn build(price: f64, date_of_sale: OffsetDateTime) -> NewTransaction {
        NewTransaction {
            title: String::new(),
            description: String::new(),
            price,
            category: "uncategorized".to_owned(),
            date_of_sale,
            sold: false,
        }
    }
}

#[cfg(test)]
impl NewTransaction {
    /// Set the title of the transaction.
    pub fn title(mut self, title: &str) -> Self {
        title.clone_into(&mut self.title);
        self
    }

    /// Set the description of the transaction.
    pub fn description(mut self, description: &str) -> Self {
        description.clone_into(&mut self.description);
        self
    }

    /// Set the category of the transaction.
    pub fn category(mut self, category: &str) -> Self {
        category.clone_into(&mut self.category);
        self
    }

    /// Set whether the product was sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = sold;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS product_transaction (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                category TEXT NOT NULL,
                date_of_sale INTEGER NOT NULL,
                sold INTEGER NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Insert every transaction in `transactions` as a new row.
///
/// The rows are inserted in a single database transaction, so either all of
/// them are stored or none are. Nothing is deduplicated: inserting the same
/// transactions twice stores them twice.
///
/// # Errors
/// Returns an [Error::SqlError] if any row could not be inserted.
pub fn insert_transactions(
    transactions: &[NewTransaction],
    connection: &Connection,
) -> Result<usize, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    {
        let mut statement = sql_transaction.prepare(
            "INSERT INTO product_transaction
                (title, description, price, category, date_of_sale, sold)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;

        for transaction in transactions {
            statement.execute((
                &transaction.title,
                &transaction.description,
                transaction.price,
                &transaction.category,
                transaction.date_of_sale.unix_timestamp(),
                transaction.sold,
            ))?;
        }
    }

    sql_transaction.commit()?;

    Ok(transactions.len())
}

/// Get one page of the transactions sold in the month selected by `filter`.
///
/// Transactions are returned in insertion order.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_transactions(
    filter: MonthFilter,
    page: PageRequest,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let query = format!(
        "SELECT id, title, description, price, category, date_of_sale, sold
        FROM product_transaction
        WHERE {}
        ORDER BY id
        LIMIT ?2 OFFSET ?3",
        MonthFilter::SQL
    );

    connection
        .prepare(&query)?
        .query_map(
            (filter.sql_param(), page.limit(), page.offset()),
            map_transaction_row,
        )?
        .collect::<Result<Vec<Transaction>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u64, Error> {
    let count: i64 =
        connection.query_row("SELECT COUNT(id) FROM product_transaction;", [], |row| {
            row.get(0)
        })?;

    Ok(count.unsigned_abs())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let description = row.get(2)?;
    let price = row.get(3)?;
    let category = row.get(4)?;
    let unix_timestamp: i64 = row.get(5)?;
    let sold = row.get(6)?;

    let date_of_sale = OffsetDateTime::from_unix_timestamp(unix_timestamp).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(5, Type::Integer, Box::new(error))
    })?;

    Ok(Transaction {
        id,
        title,
        description,
        price,
        category,
        date_of_sale,
        sold,
    })
}

// ============================================================================
// TESTS
// ============================================================================
