//! Timestamp rendering for API responses

use chrono::{DateTime, Utc};

/// Fixed layout used for every timestamp handed back to callers:
/// `day.month.year hour:minute:second`.
pub const DISPLAY_LAYOUT: &str = "%d.%m.%Y %H:%M:%S";

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(DISPLAY_LAYOUT).to_string()
}

pub fn format_optional_timestamp(ts: Option<&DateTime<Utc>>) -> Option<String> {
    ts.map(format_timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn renders_day_month_year_layout() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(format_timestamp(&ts), "05.03.2024 07:08:09");
    }

    #[test]
    fn optional_timestamp_passes_none_through() {
        assert_eq!(format_optional_timestamp(None), None);
    }
}
