//! Unnecessary-condition analysis
//!
//! Reports conditions whose outcome is fixed by the types of their operands:
//!
//! - **Resolution** (`resolver`): the narrowest type provable for an IR
//!   value, following local uses back to bounded chains of assignments
//! - **Classification** (`classifier`): truthiness, nullishness and
//!   comparison findings over constrained types
//! - **Site location** (`walker`): the condition-bearing sub-expressions of
//!   one statement's syntax
//! - **Checking** (`checker`, `driver`): per-statement and per-body entry
//!   points producing positioned [`Diagnostic`](tscond_common::Diagnostic)s
//!
//! All caches live in an [`AnalysisSession`]; analysis itself holds no
//! global state.

pub mod checker;
pub mod classifier;
pub mod driver;
pub mod error;
pub mod options;
pub mod resolver;
pub mod session;
pub mod walker;

pub use checker::ConditionChecker;
pub use classifier::{
    ComparisonFinding, classify_callback_return, classify_comparison, classify_nullish,
    classify_optional_chain, classify_truthiness,
};
pub use driver::{DiagnosticSink, analyze_body, analyze_statement};
pub use error::{AnalysisError, OptionsError};
pub use options::{ConditionOptions, HostOptions};
pub use resolver::{ConstrainedTypeResolver, OnExceeded, ResolveLimits, SiteContext};
pub use session::AnalysisSession;
pub use walker::{ConditionSite, SiteRole, locate_sites};
