//! Schedule normalization - temporal-validity shapes to TIMEDEF text
//!
//! A notice record can encode *when it applies* in seven mutually
//! exclusive shapes, from weekly-recurring weekday clauses down to a bare
//! overall window. This module selects exactly one shape per record under
//! a fixed precedence, sorts its entries chronologically, and renders the
//! canonical `TIMEDEF` block that rule statements bind to.
//!
//! Precedence (highest first): weekly-recurring, daily-with-date-ranges,
//! per-day-detailed, cross-product, multi-time-range, explicit-date-list,
//! window-only. A record that populates more than one shape keeps the
//! highest-precedence usable one; every other populated shape is flagged
//! with an `AmbiguousSchedule` warning rather than silently discarded.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use notam_types::{
    ComplexSchedule, DailyRangeEntry, DateRange, DetailedScheduleEntry, NotamRecord,
    RecurringSchedule, ScheduleEntry, TimeRange,
};

use crate::date::{
    crosses_midnight, day_in_month, format_clock, DateResolver, WindowAnchor, INVALID_DATE,
};
use crate::diagnostics::{Diagnostic, DiagnosticCode};

/// Name bound to the time definition unless the record supplies one.
pub const DEFAULT_TIMEDEF_NAME: &str = "DURATION";

/// Month sentinel on the first explicit-date entry meaning "every day".
const DAILY_SENTINEL: &str = "DLY";

const MISSING_START: &str = "INVALID_START_DATE";
const MISSING_END: &str = "INVALID_END_DATE";

/// Sort anchor used when the overall window is absent or malformed.
const DEFAULT_ANCHOR: WindowAnchor = WindowAnchor {
    year: 2024,
    month0: 0,
};

/// A named, rendered time-validity definition.
///
/// Constructed once per compile, consumed immediately by rule synthesis
/// (which binds rule statements to `name`), not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeDefinition {
    pub name: String,
    pub text: String,
}

/// The single temporal-validity shape selected from a record.
#[derive(Debug, Clone, Copy)]
pub enum ScheduleShape<'a> {
    Recurring(&'a RecurringSchedule),
    DailyRanges(&'a [DailyRangeEntry]),
    Detailed(&'a [DetailedScheduleEntry]),
    CrossProduct(&'a ComplexSchedule),
    MultiTimeRange(&'a [TimeRange]),
    DateList(&'a [ScheduleEntry]),
    WindowOnly,
}

impl ScheduleShape<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            ScheduleShape::Recurring(_) => "weekly-recurring",
            ScheduleShape::DailyRanges(_) => "daily-with-date-ranges",
            ScheduleShape::Detailed(_) => "per-day-detailed",
            ScheduleShape::CrossProduct(_) => "cross-product",
            ScheduleShape::MultiTimeRange(_) => "multi-time-range",
            ScheduleShape::DateList(_) => "explicit-date-list",
            ScheduleShape::WindowOnly => "window-only",
        }
    }
}

/// Select the applicable shape for a record.
///
/// Returns the shape plus the labels of populated-but-discarded shapes,
/// or `None` when no shape is usable and no overall window exists.
///
/// A populated shape is only usable when the fields its rendering needs
/// are present (e.g. per-day-detailed entries anchor to the window start,
/// so without a start time the shape is skipped).
pub fn select_shape(record: &NotamRecord) -> Option<(ScheduleShape<'_>, Vec<&'static str>)> {
    let recurring = record
        .recurring_schedule
        .as_ref()
        .filter(|r| !r.clauses.is_empty());
    let daily = record
        .daily_schedule_with_ranges
        .as_deref()
        .filter(|d| !d.is_empty());
    let detailed = record.detailed_schedule.as_deref().filter(|d| !d.is_empty());
    let complex = record
        .complex_schedule
        .as_ref()
        .filter(|c| !c.date_ranges.is_empty() && !c.time_ranges.is_empty());
    let multi = record
        .multi_time_range_schedule
        .as_deref()
        .filter(|m| !m.is_empty());
    let dates = record.parsed_schedule.as_deref().filter(|p| !p.is_empty());

    let has_start = record.start_time.is_some();

    let shape = if let Some(r) = recurring {
        ScheduleShape::Recurring(r)
    } else if let Some(d) = daily.filter(|_| has_start) {
        ScheduleShape::DailyRanges(d)
    } else if let Some(d) = detailed.filter(|_| has_start) {
        ScheduleShape::Detailed(d)
    } else if let Some(c) = complex.filter(|_| has_start) {
        ScheduleShape::CrossProduct(c)
    } else if let Some(m) = multi.filter(|_| record.has_overall_window()) {
        ScheduleShape::MultiTimeRange(m)
    } else if let Some(p) = dates {
        ScheduleShape::DateList(p)
    } else if record.has_overall_window() {
        ScheduleShape::WindowOnly
    } else {
        return None;
    };

    let mut discarded = Vec::new();
    let populated: [(&'static str, bool); 6] = [
        ("weekly-recurring", recurring.is_some()),
        ("daily-with-date-ranges", daily.is_some()),
        ("per-day-detailed", detailed.is_some()),
        ("cross-product", complex.is_some()),
        ("multi-time-range", multi.is_some()),
        ("explicit-date-list", dates.is_some()),
    ];
    for (label, present) in populated {
        if present && label != shape.label() {
            discarded.push(label);
        }
    }

    Some((shape, discarded))
}

/// Normalizes a record's temporal validity into a [`TimeDefinition`].
#[derive(Debug, Default)]
pub struct ScheduleNormalizer {
    resolver: DateResolver,
}

impl ScheduleNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the time definition for a record.
    ///
    /// Pushes an error diagnostic and returns `None` when the record has
    /// neither a usable schedule shape nor an overall window; warnings
    /// for ambiguity and degraded dates accumulate in `diagnostics`.
    pub fn normalize(
        &self,
        record: &NotamRecord,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<TimeDefinition> {
        let Some((shape, discarded)) = select_shape(record) else {
            diagnostics.push(Diagnostic::error(
                DiagnosticCode::MissingTimeDefinition,
                "time definition is missing: record carries no schedule and no overall validity window",
            ));
            return None;
        };

        for label in discarded {
            tracing::warn!(kept = shape.label(), discarded = label, "schedule shape ambiguity");
            diagnostics.push(Diagnostic::warning(
                DiagnosticCode::AmbiguousSchedule,
                format!(
                    "schedule shape '{}' was populated but discarded in favor of '{}'",
                    label,
                    shape.label()
                ),
            ));
        }

        Some(match shape {
            ScheduleShape::Recurring(s) => self.recurring(s, record, diagnostics),
            ScheduleShape::DailyRanges(e) => self.daily_ranges(e, record, diagnostics),
            ScheduleShape::Detailed(e) => self.detailed(e, record, diagnostics),
            ScheduleShape::CrossProduct(s) => self.cross_product(s, record, diagnostics),
            ScheduleShape::MultiTimeRange(r) => self.multi_time_range(r, record, diagnostics),
            ScheduleShape::DateList(e) => self.date_list(e, record, diagnostics),
            ScheduleShape::WindowOnly => self.window_only(record, diagnostics),
        })
    }

    // =========================================================================
    // Shape renderers
    // =========================================================================

    fn recurring(
        &self,
        schedule: &RecurringSchedule,
        record: &NotamRecord,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> TimeDefinition {
        let name = schedule
            .time_def_name
            .clone()
            .unwrap_or_else(|| DEFAULT_TIMEDEF_NAME.to_string());
        let start = self.window_bound(record.start_time.as_deref(), MISSING_START, diagnostics);
        let end = self.window_bound(record.end_time.as_deref(), MISSING_END, diagnostics);

        let daily_same_time = schedule.clauses.len() == 7
            && schedule.clauses.windows(2).all(|pair| {
                pair[0].start_time == pair[1].start_time && pair[0].end_time == pair[1].end_time
            });

        let text = if daily_same_time {
            let first = &schedule.clauses[0];
            format!(
                "TIMEDEF {} = {} TO {}: ({} TO {});",
                name,
                start,
                end,
                format_clock(&first.start_time),
                format_clock(&first.end_time)
            )
        } else {
            let clauses: Vec<String> = schedule
                .clauses
                .iter()
                .map(|clause| {
                    let s = format_clock(&clause.start_time);
                    let e = format_clock(&clause.end_time);
                    let day = clause.day.to_uppercase();
                    let end_day = if crosses_midnight(&clause.start_time, &clause.end_time) {
                        self.resolver
                            .next_weekday(&day)
                            .map(str::to_string)
                            .unwrap_or_else(|| day.clone())
                    } else {
                        day.clone()
                    };
                    format!("{day} {s} TO {end_day} {e}")
                })
                .collect();

            let prefix = format!("TIMEDEF {name} = {start} TO {end}: ");
            let padding = " ".repeat(prefix.len() + 1);
            format!("{}({});", prefix, clauses.join(&format!(",\n{padding}")))
        };

        TimeDefinition { name, text }
    }

    fn daily_ranges(
        &self,
        entries: &[DailyRangeEntry],
        record: &NotamRecord,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> TimeDefinition {
        let anchor = self.anchor_or_default(record, diagnostics);

        let mut sorted: Vec<&DailyRangeEntry> = entries.iter().collect();
        sorted.sort_by(|a, b| {
            let date_a = self.span_start_date(&anchor, a.month.as_deref(), a.start_day);
            let date_b = self.span_start_date(&anchor, b.month.as_deref(), b.start_day);
            date_a.cmp(&date_b).then_with(|| {
                let time_a = first_start_time(&a.time_ranges);
                let time_b = first_start_time(&b.time_ranges);
                time_a.cmp(time_b)
            })
        });

        let clauses: Vec<String> = sorted
            .iter()
            .map(|entry| {
                let month0 = self.entry_month0(&anchor, entry.month.as_deref());
                let year = self.resolver.resolve_year(&anchor, month0);
                let month = self.resolver.month_name(month0).to_uppercase();
                let line_prefix = format!(
                    "{:02} {} {} TO {:02} {} {}:",
                    entry.start_day, month, year, entry.end_day, month, year
                );
                let time_padding = " ".repeat(line_prefix.len() + 1);
                let times = render_time_clauses(&entry.time_ranges, &time_padding);
                format!("{line_prefix}{times}")
            })
            .collect();

        TimeDefinition {
            name: DEFAULT_TIMEDEF_NAME.to_string(),
            text: join_under_header(&clauses),
        }
    }

    fn detailed(
        &self,
        entries: &[DetailedScheduleEntry],
        record: &NotamRecord,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> TimeDefinition {
        let anchor = self.anchor_or_default(record, diagnostics);

        let mut clauses: Vec<(NaiveDateTime, String)> = Vec::new();
        for entry in entries {
            for range in &entry.time_ranges {
                let Some(start_date) = day_in_month(anchor.year, anchor.month0, entry.day) else {
                    continue;
                };
                let end_date = if crosses_midnight(&range.start_time, &range.end_time) {
                    start_date + Duration::days(1)
                } else {
                    start_date
                };

                let clause = format!(
                    "{} {} TO {} {}",
                    self.render_date_upper(start_date),
                    format_clock(&range.start_time),
                    self.render_date_upper(end_date),
                    format_clock(&range.end_time)
                );

                let (hour, minute) = clock_components(&range.start_time);
                let instant = start_date
                    .and_hms_opt(hour, minute, 0)
                    .or_else(|| start_date.and_hms_opt(0, 0, 0))
                    .expect("midnight is always valid");
                clauses.push((instant, clause));
            }
        }

        clauses.sort_by(|a, b| a.0.cmp(&b.0));
        let texts: Vec<String> = clauses.into_iter().map(|(_, clause)| clause).collect();

        TimeDefinition {
            name: DEFAULT_TIMEDEF_NAME.to_string(),
            text: join_under_header(&texts),
        }
    }

    fn cross_product(
        &self,
        schedule: &ComplexSchedule,
        record: &NotamRecord,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> TimeDefinition {
        let anchor = self.anchor_or_default(record, diagnostics);
        let month = self.resolver.month_name(anchor.month0);
        let year = anchor.year;

        let mut ranges: Vec<&DateRange> = schedule.date_ranges.iter().collect();
        ranges.sort_by_key(|r| r.start_day);

        // Time ranges are shared across every date line; the line header
        // spans from the first range's start to the last range's end
        // (ranges arrive pre-sorted from extraction).
        let earliest = schedule
            .time_ranges
            .first()
            .map(|r| format_clock(&r.start_time))
            .unwrap_or_default();
        let latest = schedule
            .time_ranges
            .last()
            .map(|r| format_clock(&r.end_time))
            .unwrap_or_default();

        let lines: Vec<String> = ranges
            .iter()
            .map(|dr| {
                let line_prefix = format!(
                    "{:02} {} {} {} TO {:02} {} {} {}: ",
                    dr.start_day, month, year, earliest, dr.end_day, month, year, latest
                );
                let time_padding = " ".repeat(line_prefix.len());
                let times = render_time_clauses(&schedule.time_ranges, &time_padding);
                format!("{line_prefix}{times}")
            })
            .collect();

        TimeDefinition {
            name: DEFAULT_TIMEDEF_NAME.to_string(),
            text: join_under_header(&lines),
        }
    }

    fn multi_time_range(
        &self,
        ranges: &[TimeRange],
        record: &NotamRecord,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> TimeDefinition {
        let start = self.window_bound(record.start_time.as_deref(), MISSING_START, diagnostics);
        let end = self.window_bound(record.end_time.as_deref(), MISSING_END, diagnostics);

        let prefix = format!("TIMEDEF {DEFAULT_TIMEDEF_NAME} = {start} TO {end}:");
        let padding = " ".repeat(prefix.len() + 1);
        let clauses = render_time_clauses(ranges, &padding);

        TimeDefinition {
            name: DEFAULT_TIMEDEF_NAME.to_string(),
            text: format!("{prefix}{clauses};"),
        }
    }

    fn date_list(
        &self,
        entries: &[ScheduleEntry],
        record: &NotamRecord,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> TimeDefinition {
        // A leading "DLY" entry means every day of the window shares one
        // interval, which collapses to the simplified per-window form.
        if let Some(first) = entries.first().filter(|e| e.month == DAILY_SENTINEL) {
            let start = self.window_bound(record.start_time.as_deref(), MISSING_START, diagnostics);
            let end = self.window_bound(record.end_time.as_deref(), MISSING_END, diagnostics);
            let text = format!(
                "TIMEDEF {} = {} TO {}: ({} TO {});",
                DEFAULT_TIMEDEF_NAME,
                start,
                end,
                format_clock(&first.start_time),
                format_clock(&first.end_time)
            );
            return TimeDefinition {
                name: DEFAULT_TIMEDEF_NAME.to_string(),
                text,
            };
        }

        let anchor = self.anchor_or_default(record, diagnostics);

        let mut sorted: Vec<&ScheduleEntry> = entries.iter().collect();
        sorted.sort_by(|a, b| {
            let date_a = self.span_start_date(&anchor, Some(a.month.as_str()), a.day);
            let date_b = self.span_start_date(&anchor, Some(b.month.as_str()), b.day);
            date_a
                .cmp(&date_b)
                .then_with(|| a.start_time.cmp(&b.start_time))
        });

        let clauses: Vec<String> = sorted
            .iter()
            .map(|entry| {
                format!(
                    "{:02} {}: ({} TO {})",
                    entry.day,
                    entry.month.to_uppercase(),
                    format_clock(&entry.start_time),
                    format_clock(&entry.end_time)
                )
            })
            .collect();

        TimeDefinition {
            name: DEFAULT_TIMEDEF_NAME.to_string(),
            text: join_under_header(&clauses),
        }
    }

    fn window_only(
        &self,
        record: &NotamRecord,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> TimeDefinition {
        let start = self.window_bound(record.start_time.as_deref(), MISSING_START, diagnostics);
        let end = self.window_bound(record.end_time.as_deref(), MISSING_END, diagnostics);
        TimeDefinition {
            name: DEFAULT_TIMEDEF_NAME.to_string(),
            text: format!("TIMEDEF {DEFAULT_TIMEDEF_NAME} = {start} TO {end};"),
        }
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    /// Render a window bound, degrading to sentinels: a missing bound
    /// renders as `missing_sentinel`, a malformed one as `INVALID_DATE`
    /// with a warning.
    fn window_bound(
        &self,
        raw: Option<&str>,
        missing_sentinel: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> String {
        match raw {
            None => missing_sentinel.to_string(),
            Some(raw) => match self.resolver.render_absolute(raw) {
                Some(text) => text,
                None => {
                    diagnostics.push(Diagnostic::warning(
                        DiagnosticCode::MalformedDate,
                        format!("window bound '{raw}' is not YYMMDDHHMM; rendered as sentinel"),
                    ));
                    INVALID_DATE.to_string()
                }
            },
        }
    }

    /// Anchor year/month from the window start, or the fixed default
    /// anchor (with a warning) when the start is absent or malformed.
    fn anchor_or_default(
        &self,
        record: &NotamRecord,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> WindowAnchor {
        match record
            .start_time
            .as_deref()
            .and_then(|raw| self.resolver.parse_window(raw))
        {
            Some(anchor) => anchor,
            None => {
                tracing::warn!(
                    "overall window start is absent or malformed; anchoring schedule to Jan 2024"
                );
                diagnostics.push(Diagnostic::warning(
                    DiagnosticCode::MissingAnchorWindow,
                    "overall window start is absent or malformed; schedule ordering anchored to Jan 2024",
                ));
                DEFAULT_ANCHOR
            }
        }
    }

    fn entry_month0(&self, anchor: &WindowAnchor, month: Option<&str>) -> usize {
        month
            .and_then(|m| self.resolver.month_index(m))
            .unwrap_or(anchor.month0)
    }

    /// Absolute start date of a schedule span, with rollover-year
    /// resolution. `None` sorts first, mirroring an unresolvable month.
    fn span_start_date(
        &self,
        anchor: &WindowAnchor,
        month: Option<&str>,
        day: u32,
    ) -> Option<NaiveDate> {
        let month0 = self.entry_month0(anchor, month);
        let year = self.resolver.resolve_year(anchor, month0);
        day_in_month(year, month0, day)
    }

    fn render_date_upper(&self, date: NaiveDate) -> String {
        use chrono::Datelike;
        format!(
            "{:02} {} {}",
            date.day(),
            self.resolver.month_name(date.month0() as usize).to_uppercase(),
            date.year()
        )
    }
}

fn render_time_clauses(ranges: &[TimeRange], continuation_padding: &str) -> String {
    ranges
        .iter()
        .map(|range| {
            format!(
                "({} TO {})",
                format_clock(&range.start_time),
                format_clock(&range.end_time)
            )
        })
        .collect::<Vec<_>>()
        .join(&format!(",\n{continuation_padding}"))
}

/// Join clause lines under the `TIMEDEF DURATION = ` header, each
/// continuation line aligned under the first clause.
fn join_under_header(clauses: &[String]) -> String {
    let prefix = format!("TIMEDEF {DEFAULT_TIMEDEF_NAME} = ");
    let padding = " ".repeat(prefix.len());
    format!("{}{};", prefix, clauses.join(&format!(",\n{padding}")))
}

fn first_start_time(ranges: &[TimeRange]) -> &str {
    ranges.first().map(|r| r.start_time.as_str()).unwrap_or("0000")
}

fn clock_components(hhmm: &str) -> (u32, u32) {
    if hhmm.len() == 4 && hhmm.bytes().all(|b| b.is_ascii_digit()) {
        let hour = hhmm[0..2].parse().unwrap_or(0);
        let minute = hhmm[2..4].parse().unwrap_or(0);
        (hour, minute)
    } else {
        (0, 0)
    }
}
