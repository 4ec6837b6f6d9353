//! Calendar-date parsing shared by validation, form pre-fill and display.

use chrono::{DateTime, NaiveDate};

const INPUT_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Parse a date as submitted by a date input or returned by the API.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, and any string starting with a
/// `YYYY-MM-DD` prefix. Timestamps keep the calendar date of their own
/// offset; no conversion to the server's zone happens.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, INPUT_FORMAT) {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamp.date_naive());
    }
    trimmed
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, INPUT_FORMAT).ok())
}

/// `YYYY-MM-DD`, the value format of an HTML date input.
#[must_use]
pub fn input_value(date: NaiveDate) -> String {
    date.format(INPUT_FORMAT).to_string()
}

/// `dd/mm/yyyy`, the table cell format.
#[must_use]
pub fn display_value(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("2024-03-09")]
    #[case::padded("  2024-03-09 ")]
    #[case::utc_stamp("2024-03-09T00:00:00.000Z")]
    #[case::offset_stamp("2024-03-09T23:30:00-05:00")]
    #[case::mongo_like("2024-03-09T00:00:00")]
    fn parses_supported_shapes(#[case] raw: &str) {
        let date = parse_date(raw).expect("date parses");
        assert_eq!(input_value(date), "2024-03-09");
        assert_eq!(display_value(date), "09/03/2024");
    }

    #[rstest]
    #[case("")]
    #[case("09/03/2024")]
    #[case("2024-13-01")]
    #[case("mañana")]
    fn rejects_other_shapes(#[case] raw: &str) {
        assert!(parse_date(raw).is_none());
    }
}
