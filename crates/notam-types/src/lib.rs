//! NOTAM record types - foundation structures for the AIRlang compiler
//!
//! This crate contains the pure data structures describing a structured
//! aeronautical notice as produced by the external extraction step. It is
//! the bottom layer of the workspace: `airlang-core` depends on it, it
//! depends on nothing else in the workspace.
//!
//! ## Wire contract
//!
//! Records arrive as JSON with camelCase field names (`notamId`,
//! `startTime`, `areaDefinitions`, ...). Every optional field may be
//! absent or `null`; both deserialize to `None`. The record is trusted in
//! shape but never in completeness - consumers must tolerate any missing
//! optional field.
//!
//! ## Contents
//!
//! - `NotamRecord` - the full extracted notice
//! - `NotamType` - ten-way classification of the notice effect
//! - Temporal-validity structures (recurring, daily-with-ranges,
//!   per-day-detailed, cross-product, multi-time-range, explicit dates)
//! - `AreaDefinition` - polygon or circle geometry with altitude limits
//! - `RecordError` - non-fatal record lint findings

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// NOTICE CLASSIFICATION
// ============================================================================

/// Classified effect of a notice.
///
/// Produced upstream by the extraction step; `Unknown` covers both an
/// explicit `"UNKNOWN"` and any classification string this crate does not
/// recognize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotamType {
    RunwayClosure,
    TaxiwayClosure,
    ApronClosure,
    NavaidUnserviceable,
    LightingFailure,
    AirspaceActivation,
    DangerAreaActivation,
    MilitaryAreaActivation,
    RestrictedAreaActivation,
    #[default]
    #[serde(other)]
    Unknown,
}

impl NotamType {
    /// True for the three area-activation variants.
    pub fn is_area_activation(&self) -> bool {
        matches!(
            self,
            NotamType::DangerAreaActivation
                | NotamType::MilitaryAreaActivation
                | NotamType::RestrictedAreaActivation
        )
    }
}

// ============================================================================
// TEMPORAL VALIDITY STRUCTURES
// ============================================================================

/// A single `HHMM`-to-`HHMM` clock interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    /// Start of the interval, zero-padded 24h clock text (`"0600"`).
    pub start_time: String,
    /// End of the interval, same encoding. May be numerically below the
    /// start, which means the interval crosses midnight.
    pub end_time: String,
}

/// One entry of an explicit date list: a calendar day plus one interval.
///
/// `month` is a 3-letter uppercase abbreviation (`"NOV"`), or the sentinel
/// `"DLY"` on the first entry to mean "every day of the overall window".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub day: u32,
    pub month: String,
    pub start_time: String,
    pub end_time: String,
}

/// One weekday clause of a weekly-recurring schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringClause {
    /// Weekday abbreviation: `"SUN"`, `"MON"`, ... `"SAT"`.
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

/// Weekly-recurring schedule: optional custom time-definition name plus
/// ordered weekday clauses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringSchedule {
    #[serde(default)]
    pub time_def_name: Option<String>,
    #[serde(default)]
    pub clauses: Vec<RecurringClause>,
}

/// A start-day/end-day pair within the anchor month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_day: u32,
    pub end_day: u32,
}

/// Cross-product schedule: every date range applies every time range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexSchedule {
    #[serde(default)]
    pub date_ranges: Vec<DateRange>,
    #[serde(default)]
    pub time_ranges: Vec<TimeRange>,
}

/// Per-day detail: one day of the anchor month with its own intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedScheduleEntry {
    pub day: u32,
    #[serde(default)]
    pub time_ranges: Vec<TimeRange>,
}

/// Daily schedule over a day span, optionally in a named month.
///
/// When `month` is absent the span falls in the overall window's anchor
/// month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRangeEntry {
    #[serde(default)]
    pub month: Option<String>,
    pub start_day: u32,
    pub end_day: u32,
    #[serde(default)]
    pub time_ranges: Vec<TimeRange>,
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// Circle geometry: center coordinate text plus radius in nautical miles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleDefinition {
    /// Coordinate string, e.g. `"380930N0013321W"`.
    pub center: String,
    #[serde(rename = "radiusNM")]
    pub radius_nm: f64,
}

/// One affected area: polygon or circle, with an altitude band in feet.
///
/// Exactly one of `polygon`/`circle` is expected; an entry with neither is
/// degraded (not fatal) by the compiler. A lower altitude of 0 means the
/// surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaDefinition {
    #[serde(default)]
    pub polygon: Option<Vec<String>>,
    #[serde(default)]
    pub circle: Option<CircleDefinition>,
    pub upper_altitude_feet: f64,
    pub lower_altitude_feet: f64,
}

impl AreaDefinition {
    /// True when the entry carries a non-empty polygon or a circle.
    pub fn has_geometry(&self) -> bool {
        self.polygon.as_ref().is_some_and(|p| !p.is_empty()) || self.circle.is_some()
    }
}

// ============================================================================
// THE RECORD
// ============================================================================

/// The structured notice record - sole input to the compiler.
///
/// At most one of the temporal-validity fields is meaningful; when several
/// are populated the compiler resolves the ambiguity under a fixed
/// precedence and flags it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotamRecord {
    #[serde(default)]
    pub notam_id: Option<String>,
    /// ICAO codes of the affected sites.
    #[serde(default)]
    pub aerodromes: Option<Vec<String>>,
    /// Overall validity start, `YYMMDDHHMM` text.
    #[serde(default)]
    pub start_time: Option<String>,
    /// Overall validity end, `YYMMDDHHMM` text.
    #[serde(default)]
    pub end_time: Option<String>,
    /// Explicit date list (shape 6).
    #[serde(default)]
    pub parsed_schedule: Option<Vec<ScheduleEntry>>,
    /// Weekly-recurring clauses (shape 1).
    #[serde(default)]
    pub recurring_schedule: Option<RecurringSchedule>,
    /// Flat interval list over the whole window (shape 5).
    #[serde(default)]
    pub multi_time_range_schedule: Option<Vec<TimeRange>>,
    /// Date-range x time-range cross product (shape 4).
    #[serde(default)]
    pub complex_schedule: Option<ComplexSchedule>,
    /// Per-day detailed intervals (shape 3).
    #[serde(default)]
    pub detailed_schedule: Option<Vec<DetailedScheduleEntry>>,
    /// Daily spans with ranges (shape 2).
    #[serde(default)]
    pub daily_schedule_with_ranges: Option<Vec<DailyRangeEntry>>,
    #[serde(default)]
    pub notam_type: NotamType,
    /// Affected element label, e.g. `"RWY 09L/27R"`, `"TWY A"`, `"ILS"`.
    #[serde(default)]
    pub affected_element: Option<String>,
    /// Free-text cause, e.g. `"WIP"`, `"MAINTENANCE"`.
    #[serde(default)]
    pub reason: Option<String>,
    /// Pre-defined airspace type, e.g. `"DANGER"`, `"TRA"`.
    #[serde(default)]
    pub airspace_type: Option<String>,
    /// Pre-defined airspace identifier, e.g. `"D123"`.
    #[serde(default)]
    pub airspace_id: Option<String>,
    #[serde(default)]
    pub area_definitions: Option<Vec<AreaDefinition>>,
}

impl NotamRecord {
    /// True when both ends of the overall window are present.
    pub fn has_overall_window(&self) -> bool {
        self.start_time.is_some() && self.end_time.is_some()
    }

    /// First affected aerodrome, if any.
    pub fn primary_aerodrome(&self) -> Option<&str> {
        self.aerodromes
            .as_ref()
            .and_then(|a| a.first())
            .map(String::as_str)
    }

    /// Non-fatal record lint: surfaces data-model violations that the
    /// compiler will degrade around rather than reject.
    pub fn lint(&self) -> Vec<RecordError> {
        let mut findings = Vec::new();
        if let Some(areas) = &self.area_definitions {
            for (index, area) in areas.iter().enumerate() {
                if !area.has_geometry() {
                    findings.push(RecordError::MissingGeometry { index });
                }
                if area.lower_altitude_feet > area.upper_altitude_feet {
                    findings.push(RecordError::AltitudeInversion {
                        index,
                        lower: area.lower_altitude_feet,
                        upper: area.upper_altitude_feet,
                    });
                }
            }
        }
        findings
    }
}

// ============================================================================
// RECORD LINT FINDINGS
// ============================================================================

/// Data-model violations detectable on the raw record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// An area entry carries neither a polygon nor a circle.
    #[error("area {index}: no polygon or circle geometry")]
    MissingGeometry { index: usize },

    /// Altitude band is inverted (lower above upper).
    #[error("area {index}: lower altitude {lower} ft exceeds upper altitude {upper} ft")]
    AltitudeInversion { index: usize, lower: f64, upper: f64 },
}

// ============================================================================
// Tests
// ============================================================================
