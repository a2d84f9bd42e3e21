//! Date arithmetic for age and interval calculations.
//!
//! The printed CDC schedules mix three kinds of arithmetic and this module
//! keeps them distinct:
//!
//! - exact day counts for grace-period comparisons,
//! - calendar addition for projecting minimum dates ("6 months after
//!   dose 3"), where month overflow clamps to the end of the target month,
//! - ratio ages for classification ("age in months" is days / 30.44
//!   truncated, "age in years" is days / 365.25 truncated), matching how
//!   the schedule's age buckets are applied in practice.
//!
//! All date parsing is strict `YYYY-MM-DD`. A malformed date is an error,
//! never a silent fallback.

use chrono::{Days, Months, NaiveDate};

use acip_model::{CatchUpError, Result};

/// Average days per month used for ratio ages.
const DAYS_PER_MONTH: f64 = 30.44;
/// Average days per year used for ratio ages.
const DAYS_PER_YEAR: f64 = 365.25;

/// Parses a strict `YYYY-MM-DD` date. `field` names the offending request
/// field in the error.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| CatchUpError::invalid_date(field, value))
}

/// Whole days from `from` to `to`; negative when `to` precedes `from`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Age in whole months, as days / 30.44 truncated.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (days_between(from, to) as f64 / DAYS_PER_MONTH).floor() as i64
}

/// Age in whole years, as days / 365.25 truncated.
pub fn years_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (days_between(from, to) as f64 / DAYS_PER_YEAR).floor() as i64
}

pub fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

pub fn sub_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

/// Calendar-month addition with the day clamped to the end of a short
/// target month (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// ISO `YYYY-MM-DD` rendering.
pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Human-readable age, e.g. "4 years 2 months", "7 months", "12 days".
pub fn describe_age(birth: NaiveDate, current: NaiveDate) -> String {
    let days = days_between(birth, current).max(0);
    let years = years_between(birth, current).max(0);
    let months = months_between(birth, current).max(0);

    if years >= 1 {
        let remainder = months - years * 12;
        let year_part = plural(years, "year");
        if remainder > 0 {
            format!("{year_part} {}", plural(remainder, "month"))
        } else {
            year_part
        }
    } else if months >= 1 {
        plural(months, "month")
    } else {
        plural(days, "day")
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_parse_date_strict() {
        assert_eq!(
            parse_date("birthDate", "2020-02-29").expect("leap day"),
            date(2020, 2, 29)
        );
        assert!(parse_date("birthDate", "2021-02-29").is_err());
        assert!(parse_date("birthDate", "02/29/2020").is_err());
        assert!(parse_date("birthDate", "2020-13-01").is_err());
        assert!(parse_date("birthDate", "").is_err());

        let err = parse_date("currentDate", "not-a-date").expect_err("must fail");
        assert!(err.to_string().contains("currentDate"));
    }

    #[test]
    fn test_ratio_ages_truncate() {
        let birth = date(2020, 1, 1);
        // 365 days is still 11 ratio months and 0 ratio years.
        assert_eq!(months_between(birth, date(2020, 12, 31)), 11);
        assert_eq!(years_between(birth, date(2020, 12, 31)), 0);
        assert_eq!(years_between(birth, date(2021, 1, 2)), 1);
    }

    #[test]
    fn test_add_months_clamps() {
        assert_eq!(add_months(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(add_months(date(2023, 8, 31), 6), date(2024, 2, 29));
        assert_eq!(add_months(date(2024, 3, 15), 12), date(2025, 3, 15));
    }

    #[test]
    fn test_describe_age() {
        let birth = date(2010, 9, 21);
        assert_eq!(describe_age(birth, date(2015, 2, 1)), "4 years 4 months");
        assert_eq!(describe_age(date(2024, 1, 1), date(2024, 8, 15)), "7 months");
        assert_eq!(describe_age(date(2024, 1, 1), date(2024, 1, 13)), "12 days");
        assert_eq!(describe_age(date(2024, 1, 1), date(2024, 1, 2)), "1 day");
        assert_eq!(describe_age(date(2023, 1, 1), date(2024, 1, 10)), "1 year");
    }
}
