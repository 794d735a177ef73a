//! Conversions between BSON timestamps (storage) and chrono (API surface).
//!
//! Arithmetic is done on epoch milliseconds so the bson `chrono` feature is
//! not needed.

use chrono::{DateTime as ChronoDateTime, Utc};
use mongodb::bson::DateTime;

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// BSON → chrono, used by response DTOs
pub fn to_chrono(value: DateTime) -> ChronoDateTime<Utc> {
    ChronoDateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or_default()
}

pub fn to_chrono_opt(value: Option<DateTime>) -> Option<ChronoDateTime<Utc>> {
    value.map(to_chrono)
}

/// chrono → BSON, used when request DTOs carry dates
pub fn from_chrono(value: ChronoDateTime<Utc>) -> DateTime {
    DateTime::from_millis(value.timestamp_millis())
}

/// Whole UTC days since the epoch
pub fn day_index(value: DateTime) -> i64 {
    value.timestamp_millis().div_euclid(MILLIS_PER_DAY)
}

/// `now + days`
pub fn add_days(value: DateTime, days: i64) -> DateTime {
    DateTime::from_millis(value.timestamp_millis() + days * MILLIS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_chrono() {
        let original = DateTime::from_millis(1_700_000_000_123);
        assert_eq!(from_chrono(to_chrono(original)), original);
    }

    #[test]
    fn test_day_index_boundaries() {
        let midnight = DateTime::from_millis(19_000 * MILLIS_PER_DAY);
        let just_before = DateTime::from_millis(19_000 * MILLIS_PER_DAY - 1);

        assert_eq!(day_index(midnight), 19_000);
        assert_eq!(day_index(just_before), 18_999);
        assert_eq!(day_index(add_days(midnight, 2)), 19_002);
    }
}
