//! Compiler diagnostics
//!
//! Single diagnostic type used across schedule normalization and rule
//! synthesis. Every failure is represented as a value returned alongside
//! whatever partial AIRlang text could be produced; nothing is thrown
//! across the public compile boundary.

use serde::{Deserialize, Serialize};

/// Diagnostic severity level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// Diagnostic codes for categorizing issues
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // =========================================================================
    // Fatal to the whole compile
    // =========================================================================
    /// No temporal-validity shape and no overall window.
    MissingTimeDefinition,

    // =========================================================================
    // Rule synthesis failures (time definition already produced)
    // =========================================================================
    /// Notice type is unknown; no specific rule can be generated.
    UnclassifiedNotamType,
    /// Required fields for the dispatched notice type are absent.
    IncompleteRuleData,
    /// An area entry carries neither polygon nor circle; that entry
    /// degrades to a comment, siblings are still emitted.
    InvalidGeometryEntry,

    // =========================================================================
    // Best-effort degradations
    // =========================================================================
    /// Coordinate text did not match the literal grammar; passed through.
    MalformedCoordinate,
    /// A `YYMMDDHHMM` field was not ten digits; rendered as a sentinel.
    MalformedDate,
    /// More than one temporal-validity shape was populated; precedence
    /// picked one and the rest were discarded.
    AmbiguousSchedule,
    /// Schedule ordering fell back to the default anchor because the
    /// overall window was absent or malformed.
    MissingAnchorWindow,
}

/// A diagnostic message with severity and category
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
}

impl Diagnostic {
    /// Create an error diagnostic
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    /// Create a warning diagnostic
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{} [{:?}]: {}", level, self.code, self.message)
    }
}
