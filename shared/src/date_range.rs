//! Date presets for the transaction filter and their query bounds.

use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone};

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// RFC 3339 start-of-first-day and end-of-last-day in `offset`
    pub fn to_query_bounds(&self, offset: FixedOffset) -> (String, String) {
        let start = self.start.and_time(NaiveTime::MIN);
        let end = self
            .end
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap_or_else(|| self.end.and_time(NaiveTime::MIN));

        let format = |naive: chrono::NaiveDateTime| match offset.from_local_datetime(&naive).single() {
            Some(dt) => dt.to_rfc3339(),
            None => naive.format("%Y-%m-%dT%H:%M:%S").to_string(),
        };
        (format(start), format(end))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePreset {
    ThisYear,
    LastYear,
    ThisMonth,
    LastMonth,
    LastThreeMonths,
    ThisWeek,
    LastWeek,
}

impl DatePreset {
    pub const ALL: [DatePreset; 7] = [
        DatePreset::ThisMonth,
        DatePreset::LastMonth,
        DatePreset::LastThreeMonths,
        DatePreset::ThisWeek,
        DatePreset::LastWeek,
        DatePreset::ThisYear,
        DatePreset::LastYear,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DatePreset::ThisYear => "This year",
            DatePreset::LastYear => "Last year",
            DatePreset::ThisMonth => "This month",
            DatePreset::LastMonth => "Last month",
            DatePreset::LastThreeMonths => "Last three months",
            DatePreset::ThisWeek => "This week",
            DatePreset::LastWeek => "Last week",
        }
    }

    /// Stable identifier for `<select>` values
    pub fn key(&self) -> &'static str {
        match self {
            DatePreset::ThisYear => "this-year",
            DatePreset::LastYear => "last-year",
            DatePreset::ThisMonth => "this-month",
            DatePreset::LastMonth => "last-month",
            DatePreset::LastThreeMonths => "last-three-months",
            DatePreset::ThisWeek => "this-week",
            DatePreset::LastWeek => "last-week",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    pub fn range(&self, today: NaiveDate) -> DateRange {
        match self {
            DatePreset::ThisYear => year_range(today.year()),
            DatePreset::LastYear => year_range(today.year() - 1),
            DatePreset::ThisMonth => month_range(today.year(), today.month()),
            DatePreset::LastMonth => {
                let (year, month) = shift_month(today.year(), today.month(), -1);
                month_range(year, month)
            }
            DatePreset::LastThreeMonths => {
                let (year, month) = shift_month(today.year(), today.month(), -2);
                DateRange {
                    start: first_of_month(year, month),
                    end: month_range(today.year(), today.month()).end,
                }
            }
            DatePreset::ThisWeek => {
                let start = week_start(today);
                DateRange {
                    start,
                    end: start + Duration::days(6),
                }
            }
            DatePreset::LastWeek => {
                let this_week = week_start(today);
                DateRange {
                    start: this_week - Duration::days(7),
                    end: this_week - Duration::days(1),
                }
            }
        }
    }
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Move `(year, month)` by `delta` months
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let zero_based = year * 12 + month as i32 - 1 + delta;
    (zero_based.div_euclid(12), zero_based.rem_euclid(12) as u32 + 1)
}

/// "YYYY-MM"
pub fn month_label(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

fn month_range(year: i32, month: u32) -> DateRange {
    let start = first_of_month(year, month);
    let (next_year, next_month) = shift_month(year, month, 1);
    let end = first_of_month(next_year, next_month) - Duration::days(1);
    DateRange { start, end }
}

fn year_range(year: i32) -> DateRange {
    DateRange {
        start: first_of_month(year, 1),
        end: NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_month_presets() {
        let today = date("2024-03-15");
        assert_eq!(
            DatePreset::ThisMonth.range(today),
            DateRange { start: date("2024-03-01"), end: date("2024-03-31") }
        );
        assert_eq!(
            DatePreset::LastMonth.range(today),
            DateRange { start: date("2024-02-01"), end: date("2024-02-29") }
        );
        assert_eq!(
            DatePreset::LastThreeMonths.range(today),
            DateRange { start: date("2024-01-01"), end: date("2024-03-31") }
        );
    }

    #[test]
    fn test_presets_cross_year_boundary() {
        let today = date("2024-01-10");
        assert_eq!(DatePreset::LastMonth.range(today).start, date("2023-12-01"));
        assert_eq!(DatePreset::LastThreeMonths.range(today).start, date("2023-11-01"));
        assert_eq!(
            DatePreset::LastYear.range(today),
            DateRange { start: date("2023-01-01"), end: date("2023-12-31") }
        );
    }

    #[test]
    fn test_weeks_start_on_monday() {
        // 2024-03-17 is a Sunday
        let sunday = date("2024-03-17");
        assert_eq!(week_start(sunday), date("2024-03-11"));
        assert_eq!(
            DatePreset::ThisWeek.range(sunday),
            DateRange { start: date("2024-03-11"), end: date("2024-03-17") }
        );
        assert_eq!(
            DatePreset::LastWeek.range(sunday),
            DateRange { start: date("2024-03-04"), end: date("2024-03-10") }
        );
        assert_eq!(week_start(date("2024-03-11")), date("2024-03-11"));
    }

    #[test]
    fn test_query_bounds_carry_offset() {
        let range = DateRange { start: date("2024-03-01"), end: date("2024-03-31") };
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        let (start, end) = range.to_query_bounds(offset);
        assert_eq!(start, "2024-03-01T00:00:00+08:00");
        assert_eq!(end, "2024-03-31T23:59:59.999+08:00");
    }

    #[test]
    fn test_shift_month() {
        assert_eq!(shift_month(2024, 1, -1), (2023, 12));
        assert_eq!(shift_month(2024, 12, 1), (2025, 1));
        assert_eq!(shift_month(2024, 5, -14), (2023, 3));
        assert_eq!(month_label(2024, 3), "2024-03");
    }

    #[test]
    fn test_preset_keys_round_trip() {
        for preset in DatePreset::ALL {
            assert_eq!(DatePreset::from_key(preset.key()), Some(preset));
        }
        assert_eq!(DatePreset::from_key("someday"), None);
    }

    #[test]
    fn test_range_contains() {
        let range = DatePreset::ThisMonth.range(date("2024-03-15"));
        assert!(range.contains(date("2024-03-31")));
        assert!(!range.contains(date("2024-04-01")));
    }
}
