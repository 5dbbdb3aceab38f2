//! Diagnostic categories, message templates and the diagnostic record.
//!
//! Message templates use `{0}`, `{1}`, ... placeholders; use
//! [`format_message`] to fill them in.

use crate::position::Position;
use crate::span::Span;
use serde::Serialize;
use std::fmt;

// =============================================================================
// Categories
// =============================================================================

/// What a finding says about a condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionCategory {
    AlwaysTruthy,
    AlwaysFalsy,
    Never,
    NeverNullish,
    AlwaysNullish,
    LiteralComparison,
    NoOverlapComparison,
    RedundantOptionalChain,
    CallbackAlwaysTruthy,
    CallbackAlwaysFalsy,
    /// Advisory emitted once per file when strict null checks are off.
    NoStrictNullChecks,
}

impl ConditionCategory {
    pub const ALL: [ConditionCategory; 11] = [
        Self::AlwaysTruthy,
        Self::AlwaysFalsy,
        Self::Never,
        Self::NeverNullish,
        Self::AlwaysNullish,
        Self::LiteralComparison,
        Self::NoOverlapComparison,
        Self::RedundantOptionalChain,
        Self::CallbackAlwaysTruthy,
        Self::CallbackAlwaysFalsy,
        Self::NoStrictNullChecks,
    ];

    /// Stable kebab-case code, as hosts receive it.
    pub const fn code(self) -> &'static str {
        match self {
            Self::AlwaysTruthy => "always-truthy",
            Self::AlwaysFalsy => "always-falsy",
            Self::Never => "never",
            Self::NeverNullish => "never-nullish",
            Self::AlwaysNullish => "always-nullish",
            Self::LiteralComparison => "literal-comparison",
            Self::NoOverlapComparison => "no-overlap-comparison",
            Self::RedundantOptionalChain => "redundant-optional-chain",
            Self::CallbackAlwaysTruthy => "callback-always-truthy",
            Self::CallbackAlwaysFalsy => "callback-always-falsy",
            Self::NoStrictNullChecks => "no-strict-null-checks",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.code() == code)
    }

    /// The category a truthiness finding turns into under a logical `!`.
    pub const fn negated(self) -> Self {
        match self {
            Self::AlwaysTruthy => Self::AlwaysFalsy,
            Self::AlwaysFalsy => Self::AlwaysTruthy,
            Self::CallbackAlwaysTruthy => Self::CallbackAlwaysFalsy,
            Self::CallbackAlwaysFalsy => Self::CallbackAlwaysTruthy,
            other => other,
        }
    }

    /// Message template for this category.
    pub const fn message_template(self) -> &'static str {
        match self {
            Self::AlwaysTruthy => messages::ALWAYS_TRUTHY,
            Self::AlwaysFalsy => messages::ALWAYS_FALSY,
            Self::Never => messages::NEVER,
            Self::NeverNullish => messages::NEVER_NULLISH,
            Self::AlwaysNullish => messages::ALWAYS_NULLISH,
            Self::LiteralComparison => messages::LITERAL_COMPARISON,
            Self::NoOverlapComparison => messages::NO_OVERLAP_COMPARISON,
            Self::RedundantOptionalChain => messages::REDUNDANT_OPTIONAL_CHAIN,
            Self::CallbackAlwaysTruthy => messages::CALLBACK_ALWAYS_TRUTHY,
            Self::CallbackAlwaysFalsy => messages::CALLBACK_ALWAYS_FALSY,
            Self::NoStrictNullChecks => messages::NO_STRICT_NULL_CHECKS,
        }
    }
}

impl fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// Messages
// =============================================================================

pub mod messages {
    pub const ALWAYS_TRUTHY: &str = "Unnecessary conditional, value is always truthy.";
    pub const ALWAYS_FALSY: &str = "Unnecessary conditional, value is always falsy.";
    pub const NEVER: &str = "Unnecessary conditional, value is `never`.";
    pub const NEVER_NULLISH: &str = "Unnecessary conditional, expected left-hand side of `{0}` operator to be possibly null or undefined.";
    pub const ALWAYS_NULLISH: &str =
        "Unnecessary conditional, left-hand side of `{0}` operator is always `null` or `undefined`.";
    pub const LITERAL_COMPARISON: &str =
        "Unnecessary conditional, both sides of the expression are literal values.";
    /// Literal comparison whose outcome was evaluated: {0} = true/false, {1} left, {2} operator, {3} right.
    pub const LITERAL_COMPARISON_EVALUATED: &str =
        "Unnecessary conditional, comparison is always {0}, since `{1} {2} {3}` is {0}.";
    pub const NO_OVERLAP_COMPARISON: &str =
        "Unnecessary conditional, the types have no overlap.";
    pub const REDUNDANT_OPTIONAL_CHAIN: &str = "Unnecessary optional chain on a non-nullish value.";
    pub const CALLBACK_ALWAYS_TRUTHY: &str =
        "This callback should return a conditional, but return is always truthy.";
    pub const CALLBACK_ALWAYS_FALSY: &str =
        "This callback should return a conditional, but return is always falsy.";
    pub const NO_STRICT_NULL_CHECKS: &str = "This rule requires the `strictNullChecks` compiler option to be turned on to function correctly.";
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

// =============================================================================
// Diagnostic Types
// =============================================================================

/// A suggested text replacement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Fix {
    pub span: Span,
    pub text: String,
}

/// One finding, placed in absolute file coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub span: Span,
    pub line: u32,
    pub column: u32,
    pub category: ConditionCategory,
    pub message_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Diagnostic {
    /// Create a diagnostic with the category's default message.
    #[must_use]
    pub fn new(category: ConditionCategory, span: Span, position: Position) -> Self {
        Self {
            span,
            line: position.line,
            column: position.column,
            category,
            message_text: category.message_template().to_string(),
            fix: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: String) -> Self {
        self.message_text = message;
        self
    }

    #[must_use]
    pub fn with_fix(mut self, span: Span, text: impl Into<String>) -> Self {
        self.fix = Some(Fix {
            span,
            text: text.into(),
        });
        self
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// Sort diagnostics by location, then by category.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then(a.span.end.cmp(&b.span.end))
            .then(a.category.cmp(&b.category))
            .then(a.message_text.cmp(&b.message_text))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for category in ConditionCategory::ALL {
            assert_eq!(ConditionCategory::from_code(category.code()), Some(category));
        }
        assert_eq!(ConditionCategory::from_code("sometimes-truthy"), None);
    }

    #[test]
    fn negation_flips_truthiness_only() {
        assert_eq!(
            ConditionCategory::AlwaysTruthy.negated(),
            ConditionCategory::AlwaysFalsy
        );
        assert_eq!(
            ConditionCategory::AlwaysTruthy.negated().negated(),
            ConditionCategory::AlwaysTruthy
        );
        assert_eq!(
            ConditionCategory::NoOverlapComparison.negated(),
            ConditionCategory::NoOverlapComparison
        );
    }

    #[test]
    fn format_message_fills_placeholders() {
        let message = format_message(
            messages::LITERAL_COMPARISON_EVALUATED,
            &["true", "1", "===", "1"],
        );
        assert_eq!(
            message,
            "Unnecessary conditional, comparison is always true, since `1 === 1` is true."
        );
    }

    #[test]
    fn serializes_category_as_code() {
        let diagnostic = Diagnostic::new(
            ConditionCategory::RedundantOptionalChain,
            Span::new(3, 7),
            Position::new(1, 4),
        );
        let json = serde_json::to_value(&diagnostic).expect("serialize");
        assert_eq!(json["category"], "redundant-optional-chain");
        assert!(json.get("fix").is_none());
    }
}
