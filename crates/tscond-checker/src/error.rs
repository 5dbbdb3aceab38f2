//! Analysis errors.
//!
//! None of these are fatal to a file: a statement that fails is skipped and
//! logged, and resolution gaps never surface as errors at all.

use thiserror::Error;
use tscond_ir::{FragmentError, StmtId, ValueId};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("statement s{stmt} has no source text")]
    EmptySource { stmt: u32 },
    #[error("statement s{stmt} is not in the body")]
    UnknownStatement { stmt: u32 },
    #[error("value v{value} is not in the body")]
    UnknownValue { value: u32 },
    #[error(transparent)]
    Fragment(#[from] FragmentError),
}

impl AnalysisError {
    pub(crate) fn empty_source(stmt: StmtId) -> Self {
        AnalysisError::EmptySource { stmt: stmt.0 }
    }

    pub(crate) fn unknown_statement(stmt: StmtId) -> Self {
        AnalysisError::UnknownStatement { stmt: stmt.0 }
    }

    pub(crate) fn unknown_value(value: ValueId) -> Self {
        AnalysisError::UnknownValue { value: value.0 }
    }
}

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid condition options: {0}")]
    Json(#[from] serde_json::Error),
}
