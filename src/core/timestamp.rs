//! Timestamp rendering shared by both output channels

use chrono::{DateTime, Utc};

/// ISO 8601 UTC at second precision: `2025-01-08T10:30:45Z`
pub const ISO8601_SECONDS: &str = "%Y-%m-%dT%H:%M:%SZ";

#[must_use]
pub fn format_timestamp(datetime: &DateTime<Utc>) -> String {
    datetime.format(ISO8601_SECONDS).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_second_precision_iso8601() {
        let datetime = Utc
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456);

        assert_eq!(format_timestamp(&datetime), "2025-01-08T10:30:45Z");
    }

    #[test]
    fn test_zero_padding() {
        let datetime = Utc
            .with_ymd_and_hms(2024, 3, 4, 5, 6, 7)
            .single()
            .expect("valid datetime");

        assert_eq!(format_timestamp(&datetime), "2024-03-04T05:06:07Z");
    }
}
