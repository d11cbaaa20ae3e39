//! Bilingual date/time normalization.
//!
//! Site logs mix Thai and English month names, Buddhist-era years and `.` as a
//! time separator (`14.30`). This module rewrites those into a form chrono can
//! parse, tries a fixed list of layouts, and produces the stored layout
//! `YYYY-MM-DD HH:MM:SS`.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{Local, NaiveDateTime, Timelike};
use cmm_model::{DATETIME_FORMAT, Field};
use regex::{Captures, Regex};

use crate::error::FieldRejection;

/// Offset between the Buddhist-era and Gregorian calendars.
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

/// Years above this are taken to be Buddhist era.
pub const BUDDHIST_ERA_THRESHOLD: i32 = 2500;

/// Thai month spellings and their English equivalents.
///
/// Abbreviations map to `%b` names and full names to `%B` names.
pub const THAI_MONTHS: [(&str, &str); 24] = [
    ("ม.ค.", "Jan"),
    ("ก.พ.", "Feb"),
    ("มี.ค.", "Mar"),
    ("เม.ย.", "Apr"),
    ("พ.ค.", "May"),
    ("มิ.ย.", "Jun"),
    ("ก.ค.", "Jul"),
    ("ส.ค.", "Aug"),
    ("ก.ย.", "Sep"),
    ("ต.ค.", "Oct"),
    ("พ.ย.", "Nov"),
    ("ธ.ค.", "Dec"),
    ("มกราคม", "January"),
    ("กุมภาพันธ์", "February"),
    ("มีนาคม", "March"),
    ("เมษายน", "April"),
    ("พฤษภาคม", "May"),
    ("มิถุนายน", "June"),
    ("กรกฎาคม", "July"),
    ("สิงหาคม", "August"),
    ("กันยายน", "September"),
    ("ตุลาคม", "October"),
    ("พฤศจิกายน", "November"),
    ("ธันวาคม", "December"),
];

/// Accepted input layouts, tried in order. The first that parses wins, so
/// numeric day-first layouts take precedence over month-name ones.
pub const DATETIME_LAYOUTS: [&str; 8] = [
    "%d/%m/%Y %H:%M",
    "%Y/%m/%d %H:%M",
    "%d-%m-%Y %H:%M",
    "%Y-%m-%d %H:%M",
    "%d %b %Y %H:%M",
    "%d %B %Y %H:%M",
    "%b %d, %Y %H:%M",
    "%d-%b-%Y %H:%M",
];

const REJECTION_REASON: &str = "expected 'YYYY-MM-DD HH:MM:SS', 'now', 'today', or a Thai/English \
     date such as '1/1/2568 14.30', '2025-01-01 14:30' or '1 ม.ค. 2568 14:30'";

static TIME_DOT_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\.(\d{2})").expect("valid time separator pattern"));

static FOUR_DIGIT_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}\b").expect("valid year pattern"));

/// Source of the current time for `now` / `today`.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stuck at one instant, for reproducible normalization.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Normalize a datetime value.
///
/// - `now` / `today` (any case) resolve to `clock.now()`, truncated to seconds
/// - Thai month names become English, `H.MM` becomes `H:MM`
/// - Buddhist-era years (> 2500) become Gregorian
/// - values already in the stored layout pass through unchanged
pub fn normalize_datetime<C: Clock + ?Sized>(
    raw: &str,
    clock: &C,
) -> Result<NaiveDateTime, FieldRejection> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("now") || trimmed.eq_ignore_ascii_case("today") {
        return Ok(truncate_to_seconds(clock.now()));
    }

    let prepared = to_gregorian_years(&to_colon_time(&replace_thai_months(trimmed))).into_owned();

    if let Ok(dt) = NaiveDateTime::parse_from_str(&prepared, DATETIME_FORMAT) {
        return Ok(dt);
    }

    DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| {
            NaiveDateTime::parse_from_str(&prepared, layout)
                .ok()
                .inspect(|_| tracing::trace!(layout, "datetime layout matched"))
        })
        .ok_or_else(|| FieldRejection::new(Field::Datetime, raw, REJECTION_REASON))
}

/// Normalize a datetime value against the system clock.
pub fn normalize_datetime_now(raw: &str) -> Result<NaiveDateTime, FieldRejection> {
    normalize_datetime(raw, &SystemClock)
}

/// Replace every Thai month spelling with its English name.
pub fn replace_thai_months(value: &str) -> String {
    THAI_MONTHS
        .iter()
        .fold(value.to_string(), |acc, (thai, english)| {
            if acc.contains(thai) {
                acc.replace(thai, english)
            } else {
                acc
            }
        })
}

/// Rewrite `H.MM` time separators to `H:MM`.
pub fn to_colon_time(value: &str) -> Cow<'_, str> {
    TIME_DOT_SEPARATOR.replace_all(value, "$1:$2")
}

/// Convert Buddhist-era years to Gregorian.
///
/// Done on the text rather than on a parsed date so that 29 February in a
/// Buddhist leap year (e.g. 2567) is validated against the Gregorian year.
fn to_gregorian_years(value: &str) -> Cow<'_, str> {
    FOUR_DIGIT_YEAR.replace_all(value, |caps: &Captures<'_>| {
        let token = &caps[0];
        match token.parse::<i32>() {
            Ok(year) if year > BUDDHIST_ERA_THRESHOLD => (year - BUDDHIST_ERA_OFFSET).to_string(),
            _ => token.to_string(),
        }
    })
}

fn truncate_to_seconds(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_nanosecond(0).unwrap_or(dt)
}
