use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

/// Format used by `<input type="datetime-local">`
const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// The browser's current UTC offset
pub fn local_offset() -> FixedOffset {
    offset_from_js_minutes(js_sys::Date::new_0().get_timezone_offset())
}

/// Today in the browser's timezone
pub fn today() -> NaiveDate {
    now_local().date()
}

pub fn now_local() -> NaiveDateTime {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
        .and_then(|d| d.and_hms_opt(now.get_hours(), now.get_minutes(), 0))
        .unwrap_or_default()
}

/// Current local time in the datetime-local input format
pub fn now_input_value() -> String {
    now_local().format(INPUT_FORMAT).to_string()
}

/// `Date.getTimezoneOffset()` is minutes *behind* UTC, so UTC+8 reports -480
pub fn offset_from_js_minutes(minutes: f64) -> FixedOffset {
    let seconds = (-minutes * 60.0).round() as i32;
    FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix())
}

/// datetime-local value -> RFC 3339 timestamp in `offset`
pub fn input_to_rfc3339(value: &str, offset: FixedOffset) -> Option<String> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), INPUT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%dT%H:%M:%S"))
        .ok()?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.to_rfc3339())
}

/// API timestamp -> datetime-local value shown in `offset`
pub fn rfc3339_to_input(value: &str, offset: FixedOffset) -> String {
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => dt.with_timezone(&offset).format(INPUT_FORMAT).to_string(),
        Err(_) => value.chars().take(16).collect(),
    }
}

/// API timestamp -> "YYYY-MM-DD HH:MM" in `offset`; unparsable values are shown as sent
pub fn format_timestamp(value: &str, offset: FixedOffset) -> String {
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => dt.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => value.replace('T', " ").chars().take(16).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plus8() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    #[test]
    fn test_offset_from_js_minutes() {
        assert_eq!(offset_from_js_minutes(-480.0), plus8());
        assert_eq!(offset_from_js_minutes(300.0), FixedOffset::west_opt(5 * 3600).unwrap());
        assert_eq!(offset_from_js_minutes(0.0).local_minus_utc(), 0);
    }

    #[test]
    fn test_input_to_rfc3339() {
        assert_eq!(
            input_to_rfc3339("2024-03-01T10:30", plus8()).as_deref(),
            Some("2024-03-01T10:30:00+08:00")
        );
        assert_eq!(input_to_rfc3339("", plus8()), None);
        assert_eq!(input_to_rfc3339("yesterday", plus8()), None);
    }

    #[test]
    fn test_rfc3339_to_input_converts_offset() {
        assert_eq!(rfc3339_to_input("2024-03-01T02:30:00Z", plus8()), "2024-03-01T10:30");
        assert_eq!(rfc3339_to_input("2024-03-01T10:30:00.123", plus8()), "2024-03-01T10:30");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("2024-01-01T23:30:00-02:00", plus8()), "2024-01-02 09:30");
        assert_eq!(format_timestamp("garbage", plus8()), "garbage");
    }
}
