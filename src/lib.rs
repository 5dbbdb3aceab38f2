//! tscond: unnecessary-condition analysis over a typed IR.
//!
//! The work is split across the workspace crates, re-exported here:
//!
//! - [`common`]: spans, positions, comparison operators, diagnostics
//! - [`types`]: interned types with truthiness, nullishness and
//!   literal-comparison predicates
//! - [`ir`]: lowered statement bodies, syntax fragments and the mapping
//!   between them
//! - [`checker`]: constrained-type resolution, site location and the
//!   per-statement / per-body entry points
//!
//! A host lowers a function into a [`Body`], supplies a [`SyntaxProvider`]
//! for statement text and collects [`Diagnostic`]s:
//!
//! ```ignore
//! let mut session = AnalysisSession::new();
//! let mut diagnostics: Vec<Diagnostic> = Vec::new();
//! analyze_body(&types, &body, &parser, options, host, &mut session, &mut diagnostics);
//! ```

pub use tscond_checker as checker;
pub use tscond_common as common;
pub use tscond_ir as ir;
pub use tscond_types as types;

// Opt-in subscriber setup driven by TSCOND_LOG / TSCOND_LOG_FORMAT
pub mod tracing_config;

pub use tscond_checker::{
    AnalysisError, AnalysisSession, ConditionChecker, ConditionOptions, DiagnosticSink,
    HostOptions, OptionsError, ResolveLimits, analyze_body, analyze_statement,
};
pub use tscond_common::{ConditionCategory, Diagnostic, Fix, Position, Span};
pub use tscond_ir::{Body, SyntaxFragment, SyntaxProvider};
pub use tscond_types::{TypeId, TypeInterner};
