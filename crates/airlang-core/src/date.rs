//! Date and clock resolution for schedule rendering
//!
//! Notice windows arrive as fixed `YYMMDDHHMM` text. This module resolves
//! that encoding into anchor year/month pairs, renders and re-parses the
//! absolute `DD MON YYYY HH:MM` form, and infers calendar-year rollover
//! for schedule entries that name a month earlier than the window's
//! anchor month (the common convention for windows spanning a year
//! boundary).
//!
//! Month and weekday tables live on the resolver value rather than as
//! process-wide globals so tests can substitute them.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Sentinel rendered when a `YYMMDDHHMM` field is not ten digits.
pub const INVALID_DATE: &str = "INVALID_DATE";

static ABSOLUTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2}) (\w{3}) (\d{4}) (\d{2}):(\d{2})$").expect("valid pattern"));

/// Anchor year and zero-based month parsed from an overall window bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowAnchor {
    pub year: i32,
    /// Zero-based month index (0 = January).
    pub month0: usize,
}

/// Resolves window anchors and renders date/time text.
#[derive(Debug, Clone)]
pub struct DateResolver {
    month_names: [&'static str; 12],
    weekday_names: [&'static str; 7],
}

impl Default for DateResolver {
    fn default() -> Self {
        Self {
            month_names: [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov",
                "Dec",
            ],
            weekday_names: ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"],
        }
    }
}

impl DateResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Month name for a zero-based index, `"Unk"` when out of range.
    pub fn month_name(&self, month0: usize) -> &'static str {
        self.month_names.get(month0).copied().unwrap_or("Unk")
    }

    /// Zero-based index of a 3-letter month abbreviation, any case.
    pub fn month_index(&self, abbrev: &str) -> Option<usize> {
        self.month_names
            .iter()
            .position(|m| m.eq_ignore_ascii_case(abbrev))
    }

    /// The weekday following `day`, wrapping Saturday to Sunday.
    pub fn next_weekday(&self, day: &str) -> Option<&'static str> {
        self.weekday_names
            .iter()
            .position(|d| d.eq_ignore_ascii_case(day))
            .map(|i| self.weekday_names[(i + 1) % 7])
    }

    /// Parse an overall window bound into its anchor year and month.
    ///
    /// Returns `None` unless the text is exactly ten digits with a month
    /// of 01-12. Years are anchored in the 2000s.
    pub fn parse_window(&self, raw: &str) -> Option<WindowAnchor> {
        if !is_ten_digits(raw) {
            return None;
        }
        let year = 2000 + raw[0..2].parse::<i32>().ok()?;
        let month = raw[2..4].parse::<usize>().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(WindowAnchor {
            year,
            month0: month - 1,
        })
    }

    /// Render `YYMMDDHHMM` as `DD MON YYYY HH:MM`.
    ///
    /// Returns `None` when the input is not exactly ten digits. An
    /// out-of-range month renders as `Unk` rather than failing.
    pub fn render_absolute(&self, raw: &str) -> Option<String> {
        if !is_ten_digits(raw) {
            return None;
        }
        let month: usize = raw[2..4].parse().ok()?;
        let month_name = match month {
            0 => "Unk",
            m => self.month_name(m - 1),
        };
        Some(format!(
            "{} {} 20{} {}:{}",
            &raw[4..6],
            month_name,
            &raw[0..2],
            &raw[6..8],
            &raw[8..10]
        ))
    }

    /// Inverse of [`render_absolute`](Self::render_absolute): recover the
    /// instant from `DD MON YYYY HH:MM` text. Month matching is
    /// case-insensitive (schedule clauses render months uppercase).
    pub fn parse_absolute(&self, text: &str) -> Option<NaiveDateTime> {
        let caps = ABSOLUTE_RE.captures(text)?;
        let day: u32 = caps[1].parse().ok()?;
        let month0 = self.month_index(&caps[2])?;
        let year: i32 = caps[3].parse().ok()?;
        let hour: u32 = caps[4].parse().ok()?;
        let minute: u32 = caps[5].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month0 as u32 + 1, day)?.and_hms_opt(hour, minute, 0)
    }

    /// Calendar year for a schedule entry month relative to the anchor.
    ///
    /// A month index below the anchor month falls in the following year.
    pub fn resolve_year(&self, anchor: &WindowAnchor, month0: usize) -> i32 {
        if month0 < anchor.month0 {
            anchor.year + 1
        } else {
            anchor.year
        }
    }
}

/// Build a date from a possibly-overflowing day-of-month.
///
/// Day 32 of July normalizes to 1 August, day 0 to the last day of the
/// previous month, matching how upstream records encode spans that run
/// past a month end.
pub(crate) fn day_in_month(year: i32, month0: usize, day: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month0 as u32 + 1, 1)?;
    first.checked_add_signed(Duration::days(i64::from(day) - 1))
}

/// True when an interval's end-of-day clock value is numerically at or
/// below its start, implying the interval spans into the following day.
pub fn crosses_midnight(start: &str, end: &str) -> bool {
    match (start.parse::<u32>(), end.parse::<u32>()) {
        (Ok(s), Ok(e)) => s >= e,
        _ => false,
    }
}

/// Render `HHMM` clock text as `HH:MM`. Non-conforming input passes
/// through unchanged.
pub fn format_clock(hhmm: &str) -> String {
    if hhmm.len() == 4 && hhmm.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}:{}", &hhmm[0..2], &hhmm[2..4])
    } else {
        hhmm.to_string()
    }
}

fn is_ten_digits(raw: &str) -> bool {
    raw.len() == 10 && raw.bytes().all(|b| b.is_ascii_digit())
}
