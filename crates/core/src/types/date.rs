//! Calendar date as shown in the product table ("Jan 15, 2024").

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer};

/// chrono format for the en-US short date (`Jan 5, 2024`).
pub const ADDED_DATE_FORMAT: &str = "%b %-d, %Y";

/// Format a date the way the product table displays it.
#[must_use]
pub fn format_added_date(date: NaiveDate) -> String {
    date.format(ADDED_DATE_FORMAT).to_string()
}

/// Parse a product table date. Single- and zero-padded days are accepted.
///
/// # Errors
///
/// Returns the chrono parse error if `s` is not of the form `Mon D, YYYY`.
pub fn parse_added_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), "%b %d, %Y")
}

/// `#[serde(with = "added_date")]` adapter for [`NaiveDate`] fields.
pub mod added_date {
    use super::{Deserialize, Deserializer, NaiveDate, Serializer, format_added_date, parse_added_date};

    /// Serialize as `Jan 15, 2024`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_added_date(*date))
    }

    /// Deserialize from `Jan 15, 2024`.
    ///
    /// # Errors
    ///
    /// Fails if the string is not a short en-US date.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_added_date(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_does_not_pad_day() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_added_date(date), "Jan 5, 2024");
    }

    #[test]
    fn test_parse_seed_dates() {
        assert_eq!(
            parse_added_date("Dec 28, 2023").unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 28).unwrap()
        );
        assert_eq!(
            parse_added_date("Jan 5, 2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_iso_dates() {
        assert!(parse_added_date("2024-01-05").is_err());
    }
}
