//! Formatting and date helpers shared by the dashboard and the API server.

mod debounce;
mod local_store;

pub use debounce::Debouncer;
pub use local_store::LocalStore;

use chrono::{Datelike, Duration, Local, NaiveDate};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Formats an amount as Korean won: no fraction digits, comma separated.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-₩{grouped}")
    } else {
        format!("₩{grouped}")
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn format_relative_date(date: NaiveDate, today: NaiveDate) -> String {
    let days = (today - date).num_days().abs();
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=7 => format!("{days} days ago"),
        8..=30 => format!("{} weeks ago", (days + 6) / 7),
        _ => format_date(date),
    }
}

/// Whole-number percentage of `value` in `total`; zero when `total` is zero.
pub fn calculate_percentage(value: f64, total: f64) -> i64 {
    if total == 0.0 {
        return 0;
    }
    (value / total * 100.0).round() as i64
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub date_string: String,
}

impl CurrentDate {
    pub fn now() -> Self {
        Self::at(today())
    }

    pub fn at(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            date_string: date.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

pub fn current_month_range(today: NaiveDate) -> MonthRange {
    // `today` always names a real month, so the bounds exist.
    let (start, end) = month_bounds(today.year(), today.month()).unwrap_or((today, today));
    MonthRange { start, end }
}

/// First and last day of a month, or `None` for an invalid year/month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, next - Duration::days(1)))
}

pub fn days_left_in_month(today: NaiveDate) -> u32 {
    let range = current_month_range(today);
    range.end.day() - today.day()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn percentage_guards_zero_total() {
        assert_eq!(calculate_percentage(0.0, 0.0), 0);
        assert_eq!(calculate_percentage(15.0, 0.0), 0);
    }

    #[test]
    fn percentage_rounds_to_whole_numbers() {
        assert_eq!(calculate_percentage(50.0, 200.0), 25);
        assert_eq!(calculate_percentage(1.0, 3.0), 33);
        assert_eq!(calculate_percentage(2.0, 3.0), 67);
        assert_eq!(calculate_percentage(300.0, 200.0), 150);
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "₩0");
        assert_eq!(format_currency(999.0), "₩999");
        assert_eq!(format_currency(12_345.0), "₩12,345");
        assert_eq!(format_currency(1_234_567.4), "₩1,234,567");
        assert_eq!(format_currency(-1_000.0), "-₩1,000");
        assert_eq!(format_currency(-0.2), "₩0");
    }

    #[test]
    fn long_date_format() {
        assert_eq!(format_date(date(2024, 1, 5)), "January 5, 2024");
    }

    #[test]
    fn relative_dates() {
        let today = date(2026, 3, 20);
        assert_eq!(format_relative_date(today, today), "Today");
        assert_eq!(format_relative_date(date(2026, 3, 19), today), "Yesterday");
        assert_eq!(format_relative_date(date(2026, 3, 15), today), "5 days ago");
        assert_eq!(format_relative_date(date(2026, 3, 10), today), "2 weeks ago");
        assert_eq!(format_relative_date(date(2026, 1, 1), today), "January 1, 2026");
    }

    #[test]
    fn month_range_handles_month_lengths() {
        let range = current_month_range(date(2024, 2, 10));
        assert_eq!(range.start, date(2024, 2, 1));
        assert_eq!(range.end, date(2024, 2, 29));

        let december = current_month_range(date(2025, 12, 31));
        assert_eq!(december.end, date(2025, 12, 31));
        assert!(month_bounds(2025, 13).is_none());
    }

    #[test]
    fn days_left_counts_to_month_end() {
        assert_eq!(days_left_in_month(date(2026, 4, 10)), 20);
        assert_eq!(days_left_in_month(date(2026, 1, 31)), 0);
    }

    #[test]
    fn current_date_parts() {
        let current = CurrentDate::at(date(2026, 7, 4));
        assert_eq!(current.year, 2026);
        assert_eq!(current.month, 7);
        assert_eq!(current.day, 4);
        assert_eq!(current.date_string, "2026-07-04");
    }
}
