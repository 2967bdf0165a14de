use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{ProfileError, Result};
use crate::types::Granularity;

pub const HOURS_PER_DAY: u32 = 24;
pub const MONTHS_PER_YEAR: u32 = 12;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn leap_year(year: i32) -> bool {
    (year % 400 == 0) || (year % 4 == 0 && year % 100 != 0)
}

pub fn days_in_months(year: i32) -> [u32; 12] {
    [
        31,
        if leap_year(year) { 29 } else { 28 },
        31, 30, 31, 30, 31, 31, 30, 31, 30, 31,
    ]
}

/// `None` unless `month` is in `1..=12`.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let idx = month.checked_sub(1)? as usize;
    days_in_months(year).get(idx).copied()
}

pub fn days_in_year(year: i32) -> u32 {
    if leap_year(year) { 366 } else { 365 }
}

/// Month and day of a 1-based ordinal. Out-of-range ordinals clamp to Dec 31.
pub fn doy_to_month_day(year: i32, doy: u32) -> (u32, u32) {
    let mut remaining = doy;
    for (month_idx, &dim) in days_in_months(year).iter().enumerate() {
        if remaining <= dim {
            return (month_idx as u32 + 1, remaining);
        }
        remaining -= dim;
    }
    (12, 31)
}

pub fn month_abbreviation(month: u32) -> &'static str {
    MONTH_ABBREVIATIONS[((month.clamp(1, 12)) - 1) as usize]
}

pub fn hour_label(hour: u32) -> String {
    format!("{:02}:00", hour)
}

pub fn time_label(ts: &NaiveDateTime) -> String {
    format!("{:02}:{:02}", ts.hour(), ts.minute())
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Hour,
        Granularity::Day,
        Granularity::Month,
        Granularity::YearOfDays,
    ];

    pub fn route(&self) -> &'static str {
        match self {
            Granularity::Hour => "pd",
            Granularity::Day => "pm",
            Granularity::Month => "pym",
            Granularity::YearOfDays => "pyd",
        }
    }

    /// Number of buckets in the period containing `date`.
    pub fn bucket_count(&self, date: NaiveDate) -> usize {
        let n = match self {
            Granularity::Hour => HOURS_PER_DAY,
            Granularity::Day => days_in_months(date.year())[date.month0() as usize],
            Granularity::Month => MONTHS_PER_YEAR,
            Granularity::YearOfDays => days_in_year(date.year()),
        };
        n as usize
    }

    /// Whether `ts` falls in the period containing `date`.
    pub fn contains(&self, date: NaiveDate, ts: &NaiveDateTime) -> bool {
        let d = ts.date();
        match self {
            Granularity::Hour => d == date,
            Granularity::Day => d.year() == date.year() && d.month() == date.month(),
            Granularity::Month | Granularity::YearOfDays => d.year() == date.year(),
        }
    }

    /// Zero-based bucket of `ts` inside its period.
    pub fn bucket_index(&self, ts: &NaiveDateTime) -> usize {
        let i = match self {
            Granularity::Hour => ts.hour(),
            Granularity::Day => ts.day() - 1,
            Granularity::Month => ts.month() - 1,
            Granularity::YearOfDays => ts.ordinal() - 1,
        };
        i as usize
    }

    pub fn bucket_label(&self, date: NaiveDate, index: usize) -> String {
        let year = date.year();
        let i = index as u32;
        match self {
            Granularity::Hour => hour_label(i),
            Granularity::Day => format!("{:04}-{:02}-{:02}", year, date.month(), i + 1),
            Granularity::Month => month_abbreviation(i + 1).to_string(),
            Granularity::YearOfDays => {
                let (month, day) = doy_to_month_day(year, i + 1);
                format!("{:04}-{:02}-{:02}", year, month, day)
            }
        }
    }

    pub fn period_label(&self, date: NaiveDate) -> String {
        match self {
            Granularity::Hour => {
                format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
            }
            Granularity::Day => format!("{:04}-{:02}", date.year(), date.month()),
            Granularity::Month | Granularity::YearOfDays => format!("{:04}", date.year()),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}

impl FromStr for Granularity {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self> {
        Granularity::ALL
            .into_iter()
            .find(|g| g.route() == s)
            .ok_or_else(|| ProfileError::InvalidGranularity(s.to_string()))
    }
}
