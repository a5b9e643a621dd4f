//! Compile orchestration - record in, AIRlang text plus diagnostics out
//!
//! `compile` sequences schedule normalization and rule synthesis and
//! merges their output. It is a pure function of its argument: no I/O,
//! no shared state, no panics across the boundary, and byte-identical
//! output for identical input. Every failure is carried as a diagnostic
//! value next to whatever partial code could still be produced.

use serde::{Deserialize, Serialize};

use notam_types::NotamRecord;

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::rules::{RuleOutcome, RuleSynthesizer};
use crate::schedule::{ScheduleNormalizer, DEFAULT_TIMEDEF_NAME};

/// Result of one compile invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileOutput {
    /// Generated AIRlang text; empty only when no time definition could
    /// be produced at all.
    pub code: String,
    /// Errors and warnings accumulated across the pipeline.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileOutput {
    /// First error-severity diagnostic, if any.
    pub fn error(&self) -> Option<&Diagnostic> {
        self.diagnostics.iter().find(|d| d.is_error())
    }

    /// True when no error-severity diagnostic was produced.
    pub fn is_success(&self) -> bool {
        self.error().is_none()
    }
}

/// Compile a notice record into AIRlang text.
pub fn compile(record: &NotamRecord) -> CompileOutput {
    let mut diagnostics = Vec::new();

    let Some(time_def) = ScheduleNormalizer::new().normalize(record, &mut diagnostics) else {
        return CompileOutput {
            code: String::new(),
            diagnostics,
        };
    };

    match RuleSynthesizer::new().synthesize(record, &mut diagnostics) {
        RuleOutcome::Rule(rule) => {
            // Rules are synthesized against the default name; bind them
            // to the schedule's custom name when one was supplied.
            let rule = if time_def.name == DEFAULT_TIMEDEF_NAME {
                rule
            } else {
                rule.replace(DEFAULT_TIMEDEF_NAME, &time_def.name)
            };
            CompileOutput {
                code: format!("{}\n\n{}", time_def.text, rule),
                diagnostics,
            }
        }
        RuleOutcome::Unclassified => {
            diagnostics.push(Diagnostic::warning(
                DiagnosticCode::UnclassifiedNotamType,
                match record.reason.as_deref() {
                    Some(reason) => format!(
                        "could not classify the notice type (reason: {reason}); only the time definition was generated"
                    ),
                    None => "could not classify the notice type; only the time definition was generated"
                        .to_string(),
                },
            ));
            let code = match record.reason.as_deref() {
                Some(reason) => {
                    format!("// No specific rule generated: {reason}\n{}", time_def.text)
                }
                None => time_def.text,
            };
            CompileOutput { code, diagnostics }
        }
        RuleOutcome::Incomplete { missing } => {
            diagnostics.push(Diagnostic::error(
                DiagnosticCode::IncompleteRuleData,
                format!("rule synthesis needs {missing}; only the time definition was generated"),
            ));
            CompileOutput {
                code: format!(
                    "// Rule generation failed. Required elements were missing from the extracted record.\n{}",
                    time_def.text
                ),
                diagnostics,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notam_types::{NotamType, RecurringClause, RecurringSchedule};
    use pretty_assertions::assert_eq;

    fn window_record() -> NotamRecord {
        NotamRecord {
            start_time: Some("2507291000".to_string()),
            end_time: Some("2507301200".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn window_only_unknown_type_is_clean_success() {
        let output = compile(&window_record());
        assert_eq!(
            output.code,
            "TIMEDEF DURATION = 29 Jul 2025 10:00 TO 30 Jul 2025 12:00;"
        );
        assert!(output.is_success());
        // Still flagged, but below error severity.
        assert_eq!(
            output.diagnostics[0].code,
            DiagnosticCode::UnclassifiedNotamType
        );
    }

    #[test]
    fn unknown_type_with_reason_gets_placeholder_comment() {
        let record = NotamRecord {
            reason: Some("WIP".to_string()),
            ..window_record()
        };
        let output = compile(&record);
        assert_eq!(
            output.code,
            "// No specific rule generated: WIP\nTIMEDEF DURATION = 29 Jul 2025 10:00 TO 30 Jul 2025 12:00;"
        );
        assert!(output.is_success());
    }

    #[test]
    fn no_time_definition_is_fatal_with_empty_code() {
        let output = compile(&NotamRecord::default());
        assert_eq!(output.code, "");
        assert!(!output.is_success());
        assert_eq!(
            output.error().unwrap().code,
            DiagnosticCode::MissingTimeDefinition
        );
    }

    #[test]
    fn incomplete_rule_keeps_time_definition_as_partial_output() {
        let record = NotamRecord {
            notam_type: NotamType::RunwayClosure,
            ..window_record()
        };
        let output = compile(&record);
        assert_eq!(
            output.code,
            "// Rule generation failed. Required elements were missing from the extracted record.\nTIMEDEF DURATION = 29 Jul 2025 10:00 TO 30 Jul 2025 12:00;"
        );
        assert_eq!(
            output.error().unwrap().code,
            DiagnosticCode::IncompleteRuleData
        );
    }

    #[test]
    fn rule_and_time_definition_joined_by_blank_line() {
        let record = NotamRecord {
            aerodromes: Some(vec!["LFPG".to_string()]),
            affected_element: Some("RWY 09L/27R".to_string()),
            notam_type: NotamType::RunwayClosure,
            ..window_record()
        };
        let output = compile(&record);
        assert_eq!(
            output.code,
            "TIMEDEF DURATION = 29 Jul 2025 10:00 TO 30 Jul 2025 12:00;\n\nRWYDEF LFPG 09L/27R CLOSED DURATION;"
        );
        assert!(output.is_success());
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn custom_schedule_name_substitutes_into_rule() {
        let record = NotamRecord {
            recurring_schedule: Some(RecurringSchedule {
                time_def_name: Some("NIGHT_OPS".to_string()),
                clauses: vec![RecurringClause {
                    day: "MON".to_string(),
                    start_time: "2200".to_string(),
                    end_time: "0600".to_string(),
                }],
            }),
            aerodromes: Some(vec!["LFPG".to_string()]),
            affected_element: Some("TWY A".to_string()),
            notam_type: NotamType::TaxiwayClosure,
            ..window_record()
        };
        let output = compile(&record);
        assert!(output
            .code
            .ends_with("TWYDEF LFPG TWY A CLOSED NIGHT_OPS;"));
        assert!(!output.code.contains("CLOSED DURATION"));
    }

    #[test]
    fn identical_input_compiles_to_identical_output() {
        let record = NotamRecord {
            aerodromes: Some(vec!["LFPG".to_string()]),
            affected_element: Some("ILS".to_string()),
            notam_type: NotamType::NavaidUnserviceable,
            ..window_record()
        };
        let first = compile(&record);
        let second = compile(&record);
        assert_eq!(first, second);
    }
}
