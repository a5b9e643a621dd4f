//! Rule synthesis - notice classification to AIRlang rule statements
//!
//! Dispatches on the classified notice type and produces the rule text
//! that binds a physical or airspace effect to the time definition.
//! Every handler returns a typed outcome rather than mutating shared
//! state: a rule, an incomplete-data marker naming what was missing, or
//! not-applicable for an unclassifiable notice.
//!
//! Rules are synthesized against the default time-definition name; the
//! orchestrator substitutes a custom name afterwards when the schedule
//! supplied one.

use once_cell::sync::Lazy;
use regex::Regex;

use notam_types::{AreaDefinition, NotamRecord, NotamType};

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::geometry;
use crate::schedule::DEFAULT_TIMEDEF_NAME;

static RUNWAY_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^RWY\s+").expect("valid pattern"));

/// Outcome of dispatching one notice record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// One or more rule statements, blocks separated by blank lines.
    Rule(String),
    /// The dispatched type is known but required fields are absent.
    Incomplete { missing: &'static str },
    /// The notice type is unknown; no rule applies.
    Unclassified,
}

/// Synthesizes rule statements from a classified record.
#[derive(Debug, Default)]
pub struct RuleSynthesizer;

impl RuleSynthesizer {
    pub fn new() -> Self {
        Self
    }

    pub fn synthesize(
        &self,
        record: &NotamRecord,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> RuleOutcome {
        match self.effective_type(record) {
            NotamType::RunwayClosure => self.runway_closure(record),
            NotamType::TaxiwayClosure => self.element_closure(record, "TWYDEF"),
            NotamType::ApronClosure => self.element_closure(record, "APRONDEF"),
            NotamType::NavaidUnserviceable => self.element_unserviceable(record, "NAVAID"),
            NotamType::LightingFailure => self.element_unserviceable(record, "LIGHTING"),
            NotamType::AirspaceActivation => self.airspace_activation(record),
            NotamType::DangerAreaActivation => {
                self.area_activation(record, "DANGER", diagnostics)
            }
            NotamType::MilitaryAreaActivation => {
                self.area_activation(record, "MILITARY", diagnostics)
            }
            NotamType::RestrictedAreaActivation => {
                self.area_activation(record, "RESTRICTED", diagnostics)
            }
            NotamType::Unknown => RuleOutcome::Unclassified,
        }
    }

    /// An unclassified notice that nonetheless carries area geometry is
    /// promoted to a restricted-area activation.
    fn effective_type(&self, record: &NotamRecord) -> NotamType {
        if record.notam_type == NotamType::Unknown
            && record
                .area_definitions
                .as_ref()
                .is_some_and(|areas| !areas.is_empty())
        {
            NotamType::RestrictedAreaActivation
        } else {
            record.notam_type
        }
    }

    fn runway_closure(&self, record: &NotamRecord) -> RuleOutcome {
        let (Some(aerodrome), Some(element)) = (
            record.primary_aerodrome(),
            record.affected_element.as_deref(),
        ) else {
            return RuleOutcome::Incomplete {
                missing: "an aerodrome and the affected runway",
            };
        };
        let designator = RUNWAY_PREFIX_RE.replace(element, "");
        RuleOutcome::Rule(format!(
            "RWYDEF {aerodrome} {designator} CLOSED {DEFAULT_TIMEDEF_NAME};"
        ))
    }

    fn element_closure(&self, record: &NotamRecord, keyword: &str) -> RuleOutcome {
        let (Some(aerodrome), Some(element)) = (
            record.primary_aerodrome(),
            record.affected_element.as_deref(),
        ) else {
            return RuleOutcome::Incomplete {
                missing: "an aerodrome and the affected element",
            };
        };
        RuleOutcome::Rule(format!(
            "{keyword} {aerodrome} {element} CLOSED {DEFAULT_TIMEDEF_NAME};"
        ))
    }

    fn element_unserviceable(&self, record: &NotamRecord, keyword: &str) -> RuleOutcome {
        let (Some(aerodrome), Some(element)) = (
            record.primary_aerodrome(),
            record.affected_element.as_deref(),
        ) else {
            return RuleOutcome::Incomplete {
                missing: "an aerodrome and the affected element",
            };
        };
        RuleOutcome::Rule(format!(
            "{keyword} {aerodrome} {element} U/S {DEFAULT_TIMEDEF_NAME};"
        ))
    }

    fn airspace_activation(&self, record: &NotamRecord) -> RuleOutcome {
        let (Some(id), Some(kind)) = (
            record.airspace_id.as_deref(),
            record.airspace_type.as_deref(),
        ) else {
            return RuleOutcome::Incomplete {
                missing: "an airspace identifier and type",
            };
        };
        RuleOutcome::Rule(format!(
            "AIRSPACE {id} TYPE {kind} ACTIVE {DEFAULT_TIMEDEF_NAME};"
        ))
    }

    fn area_activation(
        &self,
        record: &NotamRecord,
        kind: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> RuleOutcome {
        let aerodromes = record.aerodromes.as_deref().filter(|a| !a.is_empty());
        let areas = record.area_definitions.as_deref().filter(|a| !a.is_empty());
        let (Some(aerodromes), Some(areas)) = (aerodromes, areas) else {
            return RuleOutcome::Incomplete {
                missing: "affected aerodromes and at least one area geometry",
            };
        };

        let mut sites: Vec<&str> = aerodromes.iter().map(String::as_str).collect();
        sites.sort_unstable();
        let sites = sites.join(",");
        let notam_id = record.notam_id.as_deref().unwrap_or("NO_ID");
        let multiple = areas.len() > 1;

        let blocks: Vec<String> = areas
            .iter()
            .enumerate()
            .map(|(index, area)| {
                self.area_block(index, area, &sites, notam_id, multiple, kind, diagnostics)
            })
            .collect();

        RuleOutcome::Rule(blocks.join("\n\n"))
    }

    fn area_block(
        &self,
        index: usize,
        area: &AreaDefinition,
        sites: &str,
        notam_id: &str,
        multiple: bool,
        kind: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> String {
        let geometry_def = if let Some(polygon) =
            area.polygon.as_deref().filter(|p| !p.is_empty())
        {
            self.flag_malformed_coordinates(polygon.iter().map(String::as_str), diagnostics);
            geometry::render_polygon(polygon)
        } else if let Some(circle) = &area.circle {
            self.flag_malformed_coordinates(std::iter::once(circle.center.as_str()), diagnostics);
            geometry::render_circle(circle)
        } else {
            diagnostics.push(Diagnostic::warning(
                DiagnosticCode::InvalidGeometryEntry,
                format!("area {} has no polygon or circle; emitted as a comment", index + 1),
            ));
            return format!(
                "// ERROR: Area {} has no valid geometry (polygon or circle).",
                index + 1
            );
        };

        let lower = geometry::lower_flight_level(area.lower_altitude_feet);
        let upper = geometry::feet_to_flight_level(area.upper_altitude_feet);
        let suffix = if multiple {
            char::from_u32('A' as u32 + index as u32)
                .unwrap_or('?')
                .to_string()
        } else {
            String::new()
        };
        let name = format!("\"{sites}_{notam_id}{suffix}\"");

        format!(
            "AREADEF {name}\n    {lower} TO {upper}\n    TYPE({kind})\n    {geometry_def}\n    ACTIVE {DEFAULT_TIMEDEF_NAME};"
        )
    }

    fn flag_malformed_coordinates<'a>(
        &self,
        coords: impl Iterator<Item = &'a str>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        for coord in coords {
            if geometry::try_format_coordinate(coord).is_none() {
                diagnostics.push(Diagnostic::warning(
                    DiagnosticCode::MalformedCoordinate,
                    format!("coordinate '{coord}' does not match the literal grammar; passed through"),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notam_types::CircleDefinition;
    use pretty_assertions::assert_eq;

    fn synthesize(record: &NotamRecord) -> (RuleOutcome, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let outcome = RuleSynthesizer::new().synthesize(record, &mut diagnostics);
        (outcome, diagnostics)
    }

    fn closure_record(notam_type: NotamType, element: &str) -> NotamRecord {
        NotamRecord {
            aerodromes: Some(vec!["LFPG".to_string()]),
            affected_element: Some(element.to_string()),
            notam_type,
            ..Default::default()
        }
    }

    fn polygon_area() -> AreaDefinition {
        AreaDefinition {
            polygon: Some(vec![
                "380930N0013321W".to_string(),
                "404040N0030303W".to_string(),
            ]),
            circle: None,
            upper_altitude_feet: 25000.0,
            lower_altitude_feet: 0.0,
        }
    }

    #[test]
    fn runway_closure_strips_prefix() {
        let (outcome, _) = synthesize(&closure_record(NotamType::RunwayClosure, "RWY 09L/27R"));
        assert_eq!(
            outcome,
            RuleOutcome::Rule("RWYDEF LFPG 09L/27R CLOSED DURATION;".to_string())
        );

        // Case-insensitive prefix, and designators without one pass as-is.
        let (outcome, _) = synthesize(&closure_record(NotamType::RunwayClosure, "rwy 05/23"));
        assert_eq!(
            outcome,
            RuleOutcome::Rule("RWYDEF LFPG 05/23 CLOSED DURATION;".to_string())
        );
        let (outcome, _) = synthesize(&closure_record(NotamType::RunwayClosure, "05/23"));
        assert_eq!(
            outcome,
            RuleOutcome::Rule("RWYDEF LFPG 05/23 CLOSED DURATION;".to_string())
        );
    }

    #[test]
    fn taxiway_and_apron_closures() {
        let (outcome, _) = synthesize(&closure_record(NotamType::TaxiwayClosure, "TWY A"));
        assert_eq!(
            outcome,
            RuleOutcome::Rule("TWYDEF LFPG TWY A CLOSED DURATION;".to_string())
        );

        let (outcome, _) = synthesize(&closure_record(NotamType::ApronClosure, "APRON 2"));
        assert_eq!(
            outcome,
            RuleOutcome::Rule("APRONDEF LFPG APRON 2 CLOSED DURATION;".to_string())
        );
    }

    #[test]
    fn unserviceable_statements() {
        let (outcome, _) = synthesize(&closure_record(NotamType::NavaidUnserviceable, "ILS"));
        assert_eq!(
            outcome,
            RuleOutcome::Rule("NAVAID LFPG ILS U/S DURATION;".to_string())
        );

        let (outcome, _) = synthesize(&closure_record(NotamType::LightingFailure, "PAPI RWY 23"));
        assert_eq!(
            outcome,
            RuleOutcome::Rule("LIGHTING LFPG PAPI RWY 23 U/S DURATION;".to_string())
        );
    }

    #[test]
    fn airspace_activation_statement() {
        let record = NotamRecord {
            airspace_id: Some("D123".to_string()),
            airspace_type: Some("DANGER".to_string()),
            notam_type: NotamType::AirspaceActivation,
            ..Default::default()
        };
        let (outcome, _) = synthesize(&record);
        assert_eq!(
            outcome,
            RuleOutcome::Rule("AIRSPACE D123 TYPE DANGER ACTIVE DURATION;".to_string())
        );
    }

    #[test]
    fn missing_fields_yield_incomplete() {
        let record = NotamRecord {
            notam_type: NotamType::RunwayClosure,
            ..Default::default()
        };
        let (outcome, _) = synthesize(&record);
        assert!(matches!(outcome, RuleOutcome::Incomplete { .. }));

        let record = NotamRecord {
            notam_type: NotamType::AirspaceActivation,
            airspace_id: Some("D123".to_string()),
            ..Default::default()
        };
        let (outcome, _) = synthesize(&record);
        assert!(matches!(outcome, RuleOutcome::Incomplete { .. }));
    }

    #[test]
    fn unknown_type_is_unclassified() {
        let (outcome, _) = synthesize(&NotamRecord::default());
        assert_eq!(outcome, RuleOutcome::Unclassified);
    }

    #[test]
    fn unknown_type_with_geometry_promotes_to_restricted() {
        let record = NotamRecord {
            notam_id: Some("B0123/25".to_string()),
            aerodromes: Some(vec!["LECM".to_string()]),
            area_definitions: Some(vec![polygon_area()]),
            ..Default::default()
        };
        let (outcome, _) = synthesize(&record);
        let RuleOutcome::Rule(text) = outcome else {
            panic!("expected a rule");
        };
        assert!(text.contains("TYPE(RESTRICTED)"));
        assert!(text.starts_with("AREADEF \"LECM_B0123/25\""));
    }

    #[test]
    fn single_area_block_layout() {
        let record = NotamRecord {
            notam_id: Some("D0456/25".to_string()),
            aerodromes: Some(vec!["LEMD".to_string(), "LECM".to_string()]),
            area_definitions: Some(vec![polygon_area()]),
            notam_type: NotamType::DangerAreaActivation,
            ..Default::default()
        };
        let (outcome, diagnostics) = synthesize(&record);
        let expected = "AREADEF \"LECM,LEMD_D0456/25\"\n    FL001 TO FL250\n    TYPE(DANGER)\n    POLYGON(3809N00133W+A+P,\n            4040N00303W+A+P)\n    ACTIVE DURATION;";
        assert_eq!(outcome, RuleOutcome::Rule(expected.to_string()));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn multiple_areas_get_letter_suffixes() {
        let circle_area = AreaDefinition {
            polygon: None,
            circle: Some(CircleDefinition {
                center: "380930N0013321W".to_string(),
                radius_nm: 5.0,
            }),
            upper_altitude_feet: 12000.0,
            lower_altitude_feet: 3000.0,
        };
        let record = NotamRecord {
            notam_id: Some("M0001/25".to_string()),
            aerodromes: Some(vec!["LEZL".to_string()]),
            area_definitions: Some(vec![polygon_area(), circle_area]),
            notam_type: NotamType::MilitaryAreaActivation,
            ..Default::default()
        };

        let (outcome, _) = synthesize(&record);
        let RuleOutcome::Rule(text) = outcome else {
            panic!("expected a rule");
        };
        let blocks: Vec<&str> = text.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("AREADEF \"LEZL_M0001/25A\""));
        assert!(blocks[1].starts_with("AREADEF \"LEZL_M0001/25B\""));
        assert!(blocks[1].contains("CIRCLE(3809N00133W+A+P, 5 NM)"));
        assert!(blocks[1].contains("FL030 TO FL120"));
    }

    #[test]
    fn missing_notam_id_uses_placeholder() {
        let record = NotamRecord {
            aerodromes: Some(vec!["LEZL".to_string()]),
            area_definitions: Some(vec![polygon_area()]),
            notam_type: NotamType::RestrictedAreaActivation,
            ..Default::default()
        };
        let (outcome, _) = synthesize(&record);
        let RuleOutcome::Rule(text) = outcome else {
            panic!("expected a rule");
        };
        assert!(text.starts_with("AREADEF \"LEZL_NO_ID\""));
    }

    #[test]
    fn geometryless_entry_degrades_to_comment_siblings_survive() {
        let empty_area = AreaDefinition {
            polygon: None,
            circle: None,
            upper_altitude_feet: 10000.0,
            lower_altitude_feet: 0.0,
        };
        let record = NotamRecord {
            notam_id: Some("D0456/25".to_string()),
            aerodromes: Some(vec!["LEMD".to_string()]),
            area_definitions: Some(vec![empty_area, polygon_area()]),
            notam_type: NotamType::DangerAreaActivation,
            ..Default::default()
        };

        let (outcome, diagnostics) = synthesize(&record);
        let RuleOutcome::Rule(text) = outcome else {
            panic!("expected a rule");
        };
        let blocks: Vec<&str> = text.split("\n\n").collect();
        assert_eq!(
            blocks[0],
            "// ERROR: Area 1 has no valid geometry (polygon or circle)."
        );
        assert!(blocks[1].starts_with("AREADEF \"LEMD_D0456/25B\""));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::InvalidGeometryEntry);
        assert!(!diagnostics[0].is_error());
    }

    #[test]
    fn malformed_coordinate_is_flagged_but_rendered() {
        let record = NotamRecord {
            aerodromes: Some(vec!["LEZL".to_string()]),
            area_definitions: Some(vec![AreaDefinition {
                polygon: Some(vec!["somewhere".to_string()]),
                circle: None,
                upper_altitude_feet: 10000.0,
                lower_altitude_feet: 0.0,
            }]),
            notam_type: NotamType::RestrictedAreaActivation,
            ..Default::default()
        };

        let (outcome, diagnostics) = synthesize(&record);
        let RuleOutcome::Rule(text) = outcome else {
            panic!("expected a rule");
        };
        assert!(text.contains("POLYGON(somewhere+A+P)"));
        assert_eq!(diagnostics[0].code, DiagnosticCode::MalformedCoordinate);
    }
}
