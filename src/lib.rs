//! flylang: NOTAM-to-AIRlang compilation workspace
//!
//! Thin facade over the workspace crates:
//! - `notam-types` - record structures shared with the extraction boundary
//! - `airlang-core` - the deterministic compiler
//!
//! Free-text notice extraction and any user interface live outside this
//! workspace; callers hand over an already-structured record (or its raw
//! JSON) and receive AIRlang text plus diagnostics.

use anyhow::Context;

// Re-export the compiler surface
pub use airlang_core::{
    compile, CompileOutput, Diagnostic, DiagnosticCode, ScheduleNormalizer, Severity,
    TimeDefinition, DEFAULT_TIMEDEF_NAME,
};
pub use notam_types::{AreaDefinition, NotamRecord, NotamType, RecordError};

/// Compile a JSON-encoded extraction payload.
///
/// Convenience entry point for callers holding the raw extraction
/// response rather than a deserialized record.
pub fn compile_json(payload: &str) -> anyhow::Result<CompileOutput> {
    let record: NotamRecord =
        serde_json::from_str(payload).context("payload is not a valid notice record")?;
    Ok(compile(&record))
}
