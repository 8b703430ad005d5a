//! Groups a month's transactions into fixed price ranges for the bar chart.

use std::fmt::Display;

use rusqlite::Connection;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, transaction::MonthFilter};

/// The width of each bounded price range.
const PRICE_RANGE_WIDTH: f64 = 100.0;

/// Prices at or above this value fall into [PriceRange::Overflow].
const PRICE_RANGE_UPPER_BOUND: f64 = 1000.0;

/// The number of bounded ranges between zero and [PRICE_RANGE_UPPER_BOUND].
const BOUNDED_RANGE_COUNT: usize = 10;

/// The label for prices outside of the bounded ranges.
pub const OVERFLOW_LABEL: &str = "901-above";

/// A half-open price interval.
///
/// Serializes as the lower bound for bounded ranges, e.g. `100` for
/// `[100, 200)`, and as [OVERFLOW_LABEL] for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PriceRange {
    /// The range `[lower_bound, lower_bound + 100)`.
    From(u32),
    /// Prices of 1000 or more, and negative prices.
    Overflow,
}

impl PriceRange {
    /// The range that contains `price`.
    pub fn containing(price: f64) -> Self {
        if (0.0..PRICE_RANGE_UPPER_BOUND).contains(&price) {
            let index = (price / PRICE_RANGE_WIDTH).floor();
            PriceRange::From(index as u32 * PRICE_RANGE_WIDTH as u32)
        } else {
            PriceRange::Overflow
        }
    }

    fn index(self) -> usize {
        match self {
            PriceRange::From(lower_bound) => (lower_bound / PRICE_RANGE_WIDTH as u32) as usize,
            PriceRange::Overflow => BOUNDED_RANGE_COUNT,
        }
    }

    fn from_index(index: usize) -> Self {
        if index < BOUNDED_RANGE_COUNT {
            PriceRange::From(index as u32 * PRICE_RANGE_WIDTH as u32)
        } else {
            PriceRange::Overflow
        }
    }
}

impl Display for PriceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceRange::From(lower_bound) => write!(f, "{lower_bound}"),
            PriceRange::Overflow => write!(f, "{OVERFLOW_LABEL}"),
        }
    }
}

impl Serialize for PriceRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PriceRange::From(lower_bound) => serializer.serialize_u32(*lower_bound),
            PriceRange::Overflow => serializer.serialize_str(OVERFLOW_LABEL),
        }
    }
}

impl<'de> Deserialize<'de> for PriceRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Label {
            LowerBound(u32),
            Text(String),
        }

        match Label::deserialize(deserializer)? {
            Label::LowerBound(lower_bound) => Ok(PriceRange::From(lower_bound)),
            Label::Text(text) if text == OVERFLOW_LABEL => Ok(PriceRange::Overflow),
            Label::Text(text) => Err(serde::de::Error::custom(format!(
                "unknown price range \"{text}\""
            ))),
        }
    }
}

/// The number of transactions in a price range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRangeCount {
    /// The price range.
    #[serde(rename = "_id")]
    pub range: PriceRange,
    /// How many transactions have a price in the range.
    pub count: u64,
}

/// Count the transactions in each price range for the month selected by
/// `filter`.
///
/// Ranges without any transactions are left out. The remaining ranges are in
/// ascending order, with the overflow range last.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_price_ranges(
    filter: MonthFilter,
    connection: &Connection,
) -> Result<Vec<PriceRangeCount>, Error> {
    let query = format!(
        "SELECT price FROM product_transaction WHERE {}",
        MonthFilter::SQL
    );

    let prices = connection
        .prepare(&query)?
        .query_map([filter.sql_param()], |row| row.get(0))?
        .collect::<Result<Vec<f64>, rusqlite::Error>>()?;

    Ok(count_price_ranges(&prices))
}

fn count_price_ranges(prices: &[f64]) -> Vec<PriceRangeCount> {
    let mut counts = [0u64; BOUNDED_RANGE_COUNT + 1];

    for &price in prices {
        counts[PriceRange::containing(price).index()] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .filter(|&(_, count)| count > 0)
        .map(|(index, count)| PriceRangeCount {
            range: PriceRange::from_index(index),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Month, macros::datetime};

    use crate::{
        db::initialize,
        transaction::{MonthFilter, Transaction, insert_transactions},
    };

    use super::{PriceRange, PriceRangeCount, count_price_ranges, get_price_ranges};

    #[test]
    fn ranges_are_labelled_by_lower_bound() {
        assert_eq!(PriceRange::containing(0.0), PriceRange::From(0));
        assert_eq!(PriceRange::containing(99.99), PriceRange::From(0));
        assert_eq!(PriceRange::containing(100.0), PriceRange::From(100));
        assert_eq!(PriceRange::containing(150.0), PriceRange::From(100));
        assert_eq!(PriceRange::containing(999.99), PriceRange::From(900));
    }

    #[test]
    fn price_of_one_thousand_overflows() {
        assert_eq!(PriceRange::containing(1000.0), PriceRange::Overflow);
        assert_eq!(PriceRange::containing(25_000.0), PriceRange::Overflow);
    }

    #[test]
    fn negative_price_overflows() {
        assert_eq!(PriceRange::containing(-0.01), PriceRange::Overflow);
    }

    #[test]
    fn counts_skip_empty_ranges_and_put_overflow_last() {
        let prices = [1500.0, 150.0, 5.0, 120.0, 950.0, 1000.0];

        let got = count_price_ranges(&prices);

        assert_eq!(
            got,
            vec![
                PriceRangeCount {
                    range: PriceRange::From(0),
                    count: 1
                },
                PriceRangeCount {
                    range: PriceRange::From(100),
                    count: 2
                },
                PriceRangeCount {
                    range: PriceRange::From(900),
                    count: 1
                },
                PriceRangeCount {
                    range: PriceRange::Overflow,
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn no_prices_gives_no_ranges() {
        assert!(count_price_ranges(&[]).is_empty());
    }

    #[test]
    fn serializes_like_the_bar_chart_api() {
        let counts = vec![
            PriceRangeCount {
                range: PriceRange::From(100),
                count: 1,
            },
            PriceRangeCount {
                range: PriceRange::Overflow,
                count: 3,
            },
        ];

        let json = serde_json::to_string(&counts).unwrap();

        assert_eq!(json, r#"[{"_id":100,"count":1},{"_id":"901-above","count":3}]"#);
        let parsed: Vec<PriceRangeCount> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, counts);
    }

    #[test]
    fn rejects_unknown_label() {
        let result = serde_json::from_str::<PriceRange>(r#""cheap""#);

        assert!(result.is_err());
    }

    #[test]
    fn counts_only_transactions_in_month() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        insert_transactions(
            &[
                Transaction::build(150.0, datetime!(2022-03-10 0:00 UTC)),
                Transaction::build(160.0, datetime!(2022-04-10 0:00 UTC)),
            ],
            &conn,
        )
        .unwrap();

        let got = get_price_ranges(MonthFilter::new(Month::March), &conn).unwrap();

        assert_eq!(
            got,
            vec![PriceRangeCount {
                range: PriceRange::From(100),
                count: 1
            }]
        );
    }
}
