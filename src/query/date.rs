//! Date resolution
//!
//! Turns the date fragments people actually type ("2023-10-05", "yesterday",
//! "5th of October", "March 2024", "2023") into a concrete day/month/year
//! granularity filter. Granularity is inferred from how much was supplied;
//! a month with no year defaults to the current year.

use chrono::{DateTime, Duration, Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{MemoirError, Result};

/// Full month names, January first
pub const MONTHS_FULL: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Three-letter abbreviations, matched on word boundaries only
pub const MONTHS_ABBREV: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

static ISO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap());

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(20\d{2})\b").unwrap());

static ABBREV_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    MONTHS_ABBREV
        .iter()
        .map(|a| Regex::new(&format!(r"\b{}\b", a)).unwrap())
        .collect()
});

/// "5th of october" / "5 oct"
static DAY_MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?(?:{}|{})\b",
        MONTHS_FULL.join("|"),
        MONTHS_ABBREV.join("|")
    ))
    .unwrap()
});

/// "october 5th" / "oct 5"
static MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(?:{}|{})\s+(\d{{1,2}})(?:st|nd|rd|th)?\b",
        MONTHS_FULL.join("|"),
        MONTHS_ABBREV.join("|")
    ))
    .unwrap()
});

/// Creation-date filter at one of three granularities
///
/// Months are 1-based. A finer variant always carries the coarser fields,
/// so granularity nesting holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "granularity")]
pub enum DateFilter {
    Day { year: i32, month: u32, day: u32 },
    Month { year: i32, month: u32 },
    Year { year: i32 },
}

/// Concrete UTC bounds for a date filter
///
/// Day windows are closed at 23:59:59.999; month and year windows exclude
/// their upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub end_inclusive: bool,
}

fn day_start(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| {
            MemoirError::InvalidInput(format!("Invalid calendar date: {year}-{month}-{day}"))
        })
}

impl DateFilter {
    /// Lower the filter into concrete bounds
    pub fn to_range(&self) -> Result<DateRange> {
        match *self {
            DateFilter::Day { year, month, day } => {
                let start = day_start(year, month, day)?;
                let end = NaiveDate::from_ymd_opt(year, month, day)
                    .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
                    .map(|dt| dt.and_utc())
                    .ok_or_else(|| {
                        MemoirError::InvalidInput(format!(
                            "Invalid calendar date: {year}-{month}-{day}"
                        ))
                    })?;
                Ok(DateRange {
                    start,
                    end,
                    end_inclusive: true,
                })
            }
            DateFilter::Month { year, month } => {
                let start = day_start(year, month, 1)?;
                let end = if month == 12 {
                    day_start(year + 1, 1, 1)?
                } else {
                    day_start(year, month + 1, 1)?
                };
                Ok(DateRange {
                    start,
                    end,
                    end_inclusive: false,
                })
            }
            DateFilter::Year { year } => Ok(DateRange {
                start: day_start(year, 1, 1)?,
                end: day_start(year + 1, 1, 1)?,
                end_inclusive: false,
            }),
        }
    }
}

/// Extract at most one date filter from a lowercased utterance
///
/// Resolution order, first match wins: ISO date, "today", "yesterday",
/// then an independent scan for year / month name / adjacent day number.
/// A day number with no month nearby is silently dropped, as is a day
/// that does not exist in the named month.
pub fn resolve(lower: &str, today: NaiveDate) -> Option<DateFilter> {
    if let Some(caps) = ISO_RE.captures(lower) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        // Reject impossible dates rather than wrapping them
        return NaiveDate::from_ymd_opt(year, month, day).map(|_| DateFilter::Day {
            year,
            month,
            day,
        });
    }

    if lower.contains("today") {
        return Some(DateFilter::Day {
            year: today.year(),
            month: today.month(),
            day: today.day(),
        });
    }

    if lower.contains("yesterday") {
        let yesterday = today - Duration::days(1);
        return Some(DateFilter::Day {
            year: yesterday.year(),
            month: yesterday.month(),
            day: yesterday.day(),
        });
    }

    let year: Option<i32> = YEAR_RE
        .captures(lower)
        .and_then(|caps| caps[1].parse().ok());

    // Month names are checked in calendar order; full names match as
    // substrings, abbreviations only on word boundaries.
    let month: Option<u32> = (0..12)
        .find(|&i| lower.contains(MONTHS_FULL[i]) || ABBREV_RES[i].is_match(lower))
        .map(|i| i as u32 + 1);

    let day: Option<u32> = if month.is_some() {
        DAY_MONTH_RE
            .captures(lower)
            .or_else(|| MONTH_DAY_RE.captures(lower))
            .and_then(|caps| caps[1].parse().ok())
    } else {
        None
    };

    match (year, month) {
        (Some(year), None) => Some(DateFilter::Year { year }),
        (year, Some(month)) => {
            let year = year.unwrap_or_else(|| today.year());
            match day {
                Some(day) if NaiveDate::from_ymd_opt(year, month, day).is_some() => {
                    Some(DateFilter::Day { year, month, day })
                }
                _ => Some(DateFilter::Month { year, month }),
            }
        }
        (None, None) => None,
    }
}
