//! The month predicate shared by every transaction query.
//!
//! All queries that are scoped to a month must build their `WHERE` clause from
//! [MonthFilter::SQL] and bind [MonthFilter::sql_param] as the first
//! parameter. This keeps the list, totals and chart queries in agreement about
//! which transactions belong to a month.

use std::fmt::Display;

use time::Month;

/// Selects the transactions whose sale date falls in one calendar month.
///
/// Sale dates are stored as unix timestamps, so the month is always taken in
/// UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthFilter(Option<Month>);

impl MonthFilter {
    /// The SQL condition for the month predicate.
    ///
    /// Expects the month number to be bound to `?1`.
    pub const SQL: &'static str =
        "CAST(strftime('%m', date_of_sale, 'unixepoch') AS INTEGER) = ?1";

    /// A filter for `month`.
    pub fn new(month: Month) -> Self {
        Self(Some(month))
    }

    /// A filter that matches no transactions.
    pub fn none() -> Self {
        Self(None)
    }

    /// Parse the raw `month` query parameter.
    ///
    /// Any number equal to 1-12 selects that month, e.g. "3", " 3 " and "3.0"
    /// all select March. Missing, non-numeric, fractional or out of range
    /// values give a filter that matches nothing rather than an error.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::none();
        };

        let Ok(number) = raw.trim().parse::<f64>() else {
            return Self::none();
        };

        if number.fract() != 0.0 || !(1.0..=12.0).contains(&number) {
            return Self::none();
        }

        Month::try_from(number as u8)
            .map(Self::new)
            .unwrap_or_else(|_| Self::none())
    }

    /// The selected month, or `None` if the filter matches nothing.
    pub fn month(&self) -> Option<Month> {
        self.0
    }

    /// The value to bind to `?1` in [MonthFilter::SQL].
    ///
    /// A filter that matches nothing binds 0, which no sale date can have.
    pub fn sql_param(&self) -> i64 {
        self.0.map_or(0, |month| i64::from(u8::from(month)))
    }
}

impl Display for MonthFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(month) => write!(f, "{month}"),
            None => write!(f, "no month"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Month, macros::datetime};

    use super::MonthFilter;

    #[test]
    fn parses_month_numbers() {
        assert_eq!(MonthFilter::parse(Some("1")), MonthFilter::new(Month::January));
        assert_eq!(MonthFilter::parse(Some("12")), MonthFilter::new(Month::December));
        assert_eq!(MonthFilter::parse(Some(" 3 ")), MonthFilter::new(Month::March));
        assert_eq!(MonthFilter::parse(Some("3.0")), MonthFilter::new(Month::March));
    }

    #[test]
    fn invalid_month_matches_nothing() {
        let invalid_months = [
            None,
            Some(""),
            Some("abc"),
            Some("0"),
            Some("13"),
            Some("-3"),
            Some("2.5"),
            Some("NaN"),
        ];

        for raw in invalid_months {
            assert_eq!(
                MonthFilter::parse(raw),
                MonthFilter::none(),
                "want {raw:?} to match nothing"
            );
        }
    }

    #[test]
    fn sql_param_is_month_number() {
        assert_eq!(MonthFilter::new(Month::March).sql_param(), 3);
        assert_eq!(MonthFilter::new(Month::December).sql_param(), 12);
        assert_eq!(MonthFilter::none().sql_param(), 0);
    }

    fn month_matches(filter: MonthFilter, unix_timestamp: i64) -> bool {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .query_row(
                &format!("SELECT {} FROM (SELECT ?2 AS date_of_sale)", MonthFilter::SQL),
                (filter.sql_param(), unix_timestamp),
                |row| row.get(0),
            )
            .unwrap()
    }

    #[test]
    fn sql_matches_month_of_sale_date() {
        let sale_date = datetime!(2021-03-15 12:00 UTC).unix_timestamp();

        assert!(month_matches(MonthFilter::new(Month::March), sale_date));
        assert!(!month_matches(MonthFilter::new(Month::April), sale_date));
        assert!(!month_matches(MonthFilter::none(), sale_date));
    }

    #[test]
    fn sql_uses_utc_month() {
        // 23:30 on the 31st of March at UTC-2 is already April in UTC.
        let sale_date = datetime!(2021-03-31 23:30 -2).unix_timestamp();

        assert!(month_matches(MonthFilter::new(Month::April), sale_date));
        assert!(!month_matches(MonthFilter::new(Month::March), sale_date));
    }

    #[test]
    fn displays_month_name() {
        assert_eq!(MonthFilter::new(Month::March).to_string(), "March");
        assert_eq!(MonthFilter::none().to_string(), "no month");
    }
}
