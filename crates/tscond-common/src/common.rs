//! Operator enums shared by the IR, the syntax model and the type algebra.

use serde::Serialize;
use std::fmt;

/// Relational and equality operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ComparisonOperator {
    /// `===`
    StrictEqual,
    /// `!==`
    StrictNotEqual,
    /// `==`
    LooseEqual,
    /// `!=`
    LooseNotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
}

impl ComparisonOperator {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StrictEqual => "===",
            Self::StrictNotEqual => "!==",
            Self::LooseEqual => "==",
            Self::LooseNotEqual => "!=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
        }
    }

    /// `===`, `!==`, `==` or `!=`.
    pub const fn is_equality(self) -> bool {
        matches!(
            self,
            Self::StrictEqual | Self::StrictNotEqual | Self::LooseEqual | Self::LooseNotEqual
        )
    }

    /// `==` or `!=`.
    pub const fn is_loose(self) -> bool {
        matches!(self, Self::LooseEqual | Self::LooseNotEqual)
    }

    /// `!==` or `!=`.
    pub const fn is_negated_equality(self) -> bool {
        matches!(self, Self::StrictNotEqual | Self::LooseNotEqual)
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "===" => Self::StrictEqual,
            "!==" => Self::StrictNotEqual,
            "==" => Self::LooseEqual,
            "!=" => Self::LooseNotEqual,
            "<" => Self::LessThan,
            "<=" => Self::LessThanOrEqual,
            ">" => Self::GreaterThan,
            ">=" => Self::GreaterThanOrEqual,
            _ => return None,
        })
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
