//! Best-effort statement date parsing.
//!
//! Accepted shapes (separators `/`, `-`, `.`, `,` and spaces are interchangeable):
//!   2024-01-31, 2024/01/31, 20240131         year first, never ambiguous
//!   31/01/2024, 01/31/2024, 31-01-24         day/month resolved by [`DateOrder`]
//!   31-Jan-2024, 31 January 2024             textual month after the day
//!   Jan 31, 2024, January 31st 2024          textual month before the day
//!   2024 Jan 31
//! A leading weekday name and a trailing time of day are ignored.
//! Two-digit years pivot at 69: `24` is 2024, `85` is 1985.

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::DateOrder;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised date `{raw}`")]
pub struct DateParseError {
    pub raw: String,
}

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

const WEEKDAYS: [&str; 7] = [
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
];

/// Parse free-form statement date text into a calendar date.
pub fn parse_date(raw: &str, order: DateOrder) -> Result<NaiveDate, DateParseError> {
    let err = || DateParseError {
        raw: raw.to_string(),
    };

    let without_time = strip_time(raw.trim());
    let tokens: Vec<&str> = without_time
        .split(|c: char| c.is_whitespace() || matches!(c, '/' | '-' | '.' | ','))
        .filter(|t| !t.is_empty())
        .map(strip_ordinal)
        .filter(|t| !is_weekday(t))
        .collect();

    match tokens.as_slice() {
        [compact] if compact.len() == 8 && is_digits(compact) => {
            NaiveDate::parse_from_str(compact, "%Y%m%d").map_err(|_| err())
        }
        [a, b, c] => parse_triple(a, b, c, order).ok_or_else(err),
        _ => Err(err()),
    }
}

fn parse_triple(a: &str, b: &str, c: &str, order: DateOrder) -> Option<NaiveDate> {
    match (month_from_name(a), month_from_name(b)) {
        // 31 Jan 2024 / 2024 Jan 31
        (None, Some(month)) => {
            if a.len() == 4 {
                ymd(year(a)?, month, day(c)?)
            } else {
                ymd(year(c)?, month, day(a)?)
            }
        }
        // Jan 31 2024
        (Some(month), None) => ymd(year(c)?, month, day(b)?),
        (None, None) if a.len() == 4 => ymd(year(a)?, number(b)?, day(c)?),
        (None, None) if a.len() <= 2 && b.len() <= 2 => {
            let (first, second, y) = (number(a)?, number(b)?, year(c)?);
            let (month_first, day_first) = (ymd(y, first, second), ymd(y, second, first));
            match order {
                DateOrder::MonthFirst => month_first.or(day_first),
                DateOrder::DayFirst => day_first.or(month_first),
            }
        }
        _ => None,
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn year(s: &str) -> Option<i32> {
    if !is_digits(s) {
        return None;
    }
    let y: i32 = s.parse().ok()?;
    match s.len() {
        2 if y < 69 => Some(2000 + y),
        2 => Some(1900 + y),
        4 => Some(y),
        _ => None,
    }
}

fn day(s: &str) -> Option<u32> {
    if s.len() > 2 {
        return None;
    }
    number(s)
}

fn number(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !is_digits(s) {
        return None;
    }
    s.parse().ok()
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn month_from_name(s: &str) -> Option<u32> {
    if s.len() < 3 || !s.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let lower = s.to_ascii_lowercase();
    if lower == "sept" {
        return Some(9);
    }
    MONTHS
        .iter()
        .position(|m| m.starts_with(&lower))
        .map(|i| i as u32 + 1)
}

fn is_weekday(s: &str) -> bool {
    if s.len() < 3 || !s.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    let lower = s.to_ascii_lowercase();
    WEEKDAYS.iter().any(|d| d.starts_with(&lower))
}

/// "1st" -> "1", "22nd" -> "22"
fn strip_ordinal(token: &str) -> &str {
    for suffix in ["st", "nd", "rd", "th"] {
        if let Some(digits) = token.strip_suffix(suffix) {
            if !digits.is_empty() && is_digits(digits) {
                return digits;
            }
        }
    }
    token
}

/// Drop a trailing time of day ("10:22", "10:22:05 PM", ISO "T10:22:05Z").
fn strip_time(s: &str) -> String {
    let mut kept = Vec::new();
    for part in s.split_whitespace() {
        if part.contains(':') {
            if let Some((date, _)) = part.split_once('T') {
                kept.push(date);
            }
            break;
        }
        kept.push(part);
    }
    kept.join(" ")
}
