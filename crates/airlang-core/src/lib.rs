//! airlang-core: deterministic NOTAM-to-AIRlang compiler
//!
//! This crate contains the pure compilation pipeline with no service
//! dependencies:
//! - Date resolution (`YYMMDDHHMM` anchors, rollover inference, absolute
//!   rendering and re-parsing)
//! - Schedule normalization (seven temporal-validity shapes to one
//!   canonical `TIMEDEF` block)
//! - Geometry encoding (flight levels, coordinate literals)
//! - Rule synthesis (ten-way notice-type dispatch)
//! - The `compile` orchestrator and its diagnostics
//!
//! # Architecture
//!
//! Data flows one way through the pipeline:
//!
//! ```text
//! NotamRecord ──► ScheduleNormalizer ──► TimeDefinition ──► RuleSynthesizer
//!                                                                 │
//!                          CompileOutput { code, diagnostics } ◄──┘
//! ```
//!
//! The whole pipeline is a pure function: no I/O, no shared state, safe
//! to call concurrently, and idempotent - identical records compile to
//! byte-identical output.

pub mod compiler;
pub mod date;
pub mod diagnostics;
pub mod geometry;
pub mod rules;
pub mod schedule;

// Re-export commonly used types
pub use compiler::{compile, CompileOutput};
pub use date::{crosses_midnight, DateResolver, WindowAnchor};
pub use diagnostics::{Diagnostic, DiagnosticCode, Severity};
pub use rules::{RuleOutcome, RuleSynthesizer};
pub use schedule::{
    select_shape, ScheduleNormalizer, ScheduleShape, TimeDefinition, DEFAULT_TIMEDEF_NAME,
};
