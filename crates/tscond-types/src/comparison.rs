//! Literal-domain types and compile-time evaluation of comparisons.
//!
//! A type is in the literal domain when it has exactly one value: a literal,
//! `null`, `undefined` or `void`. Comparing two such types always produces
//! the same result, which [`evaluate_comparison`] computes with the
//! language's coercion rules:
//!
//! ```typescript
//! 1 === 1          // true
//! "1" == 1         // true  (string -> number)
//! null == undefined // true
//! null >= 0        // true  (null -> 0)
//! undefined < 1    // false (undefined -> NaN)
//! ```

use crate::flatten::strip_aliases;
use crate::intern::TypeInterner;
use crate::types::{IntrinsicKind, LiteralValue, TypeData, TypeId};
use std::cmp::Ordering;
use std::sync::Arc;
use tscond_common::ComparisonOperator;

/// `ty` has a single, statically known value.
///
/// The `boolean` type has two values and is not in the literal domain, so
/// `flag === true` is never reported as a literal comparison.
pub fn is_literal_type(types: &TypeInterner, ty: TypeId) -> bool {
    literal_domain_value(types, ty).is_some()
}

/// The single value of a literal-domain type.
#[derive(Clone, Debug, PartialEq)]
pub enum DomainValue {
    Literal(LiteralValue),
    Null,
    Undefined,
}

pub fn literal_domain_value(types: &TypeInterner, ty: TypeId) -> Option<DomainValue> {
    match types.lookup(strip_aliases(types, ty))? {
        TypeData::Literal(value) => Some(DomainValue::Literal(value)),
        TypeData::Intrinsic(IntrinsicKind::Null) => Some(DomainValue::Null),
        TypeData::Intrinsic(IntrinsicKind::Undefined | IntrinsicKind::Void) => {
            Some(DomainValue::Undefined)
        }
        _ => None,
    }
}

/// Evaluate `left op right` for two literal-domain types.
///
/// Returns `None` when either side is not in the literal domain or the
/// outcome cannot be decided (e.g. a bigint too large to compare).
pub fn evaluate_comparison(
    types: &TypeInterner,
    op: ComparisonOperator,
    left: TypeId,
    right: TypeId,
) -> Option<bool> {
    let left = literal_domain_value(types, left)?;
    let right = literal_domain_value(types, right)?;
    evaluate_values(op, &left, &right)
}

pub fn evaluate_values(op: ComparisonOperator, left: &DomainValue, right: &DomainValue) -> Option<bool> {
    match op {
        ComparisonOperator::StrictEqual => strict_equals(left, right),
        ComparisonOperator::StrictNotEqual => strict_equals(left, right).map(|eq| !eq),
        ComparisonOperator::LooseEqual => loose_equals(left, right),
        ComparisonOperator::LooseNotEqual => loose_equals(left, right).map(|eq| !eq),
        ComparisonOperator::LessThan => Some(relational(left, right)? == Some(Ordering::Less)),
        ComparisonOperator::GreaterThan => Some(relational(left, right)? == Some(Ordering::Greater)),
        ComparisonOperator::LessThanOrEqual => Some(matches!(
            relational(left, right)?,
            Some(Ordering::Less | Ordering::Equal)
        )),
        ComparisonOperator::GreaterThanOrEqual => Some(matches!(
            relational(left, right)?,
            Some(Ordering::Greater | Ordering::Equal)
        )),
    }
}

// =============================================================================
// Equality
// =============================================================================

fn strict_equals(left: &DomainValue, right: &DomainValue) -> Option<bool> {
    use DomainValue::{Literal, Null, Undefined};
    Some(match (left, right) {
        (Null, Null) | (Undefined, Undefined) => true,
        (Literal(a), Literal(b)) => match (a, b) {
            (LiteralValue::String(a), LiteralValue::String(b)) => a == b,
            (LiteralValue::Number(a), LiteralValue::Number(b)) => a.value() == b.value(),
            (LiteralValue::BigInt(a), LiteralValue::BigInt(b)) => {
                parse_bigint(a)? == parse_bigint(b)?
            }
            (LiteralValue::Boolean(a), LiteralValue::Boolean(b)) => a == b,
            _ => false,
        },
        _ => false,
    })
}

fn loose_equals(left: &DomainValue, right: &DomainValue) -> Option<bool> {
    use DomainValue::{Literal, Null, Undefined};
    match (left, right) {
        (Null | Undefined, Null | Undefined) => Some(true),
        (Null | Undefined, Literal(_)) | (Literal(_), Null | Undefined) => Some(false),
        (Literal(a), Literal(b)) => loose_literal_equals(a, b),
    }
}

fn loose_literal_equals(a: &LiteralValue, b: &LiteralValue) -> Option<bool> {
    use LiteralValue::{BigInt, Boolean, Number, String};
    match (a, b) {
        (Boolean(a), other) => loose_literal_equals(&number_literal(bool_to_number(*a)), other),
        (other, Boolean(b)) => loose_literal_equals(other, &number_literal(bool_to_number(*b))),
        (String(a), String(b)) => Some(a == b),
        (Number(a), Number(b)) => Some(a.value() == b.value()),
        (BigInt(a), BigInt(b)) => Some(parse_bigint(a)? == parse_bigint(b)?),
        (Number(n), String(s)) | (String(s), Number(n)) => Some(n.value() == string_to_number(s)),
        (BigInt(digits), Number(n)) | (Number(n), BigInt(digits)) => {
            Some(compare_bigint_number(parse_bigint(digits)?, n.value()) == Some(Ordering::Equal))
        }
        (BigInt(digits), String(s)) | (String(s), BigInt(digits)) => {
            match string_to_bigint(s) {
                Some(value) => Some(value == parse_bigint(digits)?),
                None => Some(false),
            }
        }
    }
}

// =============================================================================
// Relational
// =============================================================================

/// Ordering of two values, `Some(None)` when unordered (a `NaN` was involved).
fn relational(left: &DomainValue, right: &DomainValue) -> Option<Option<Ordering>> {
    if let (
        DomainValue::Literal(LiteralValue::String(a)),
        DomainValue::Literal(LiteralValue::String(b)),
    ) = (left, right)
    {
        return Some(Some(compare_utf16(a, b)));
    }

    match (to_numeric(left)?, to_numeric(right)?) {
        (Numeric::Number(a), Numeric::Number(b)) => Some(a.partial_cmp(&b)),
        (Numeric::BigInt(a), Numeric::BigInt(b)) => Some(Some(a.cmp(&b))),
        (Numeric::BigInt(a), Numeric::Number(b)) => Some(compare_bigint_number(a, b)),
        (Numeric::Number(a), Numeric::BigInt(b)) => {
            Some(compare_bigint_number(b, a).map(Ordering::reverse))
        }
        // A string that is not a valid bigint compares as undefined.
        (Numeric::Unordered, _) | (_, Numeric::Unordered) => Some(None),
    }
}

enum Numeric {
    Number(f64),
    BigInt(i128),
    Unordered,
}

fn to_numeric(value: &DomainValue) -> Option<Numeric> {
    Some(match value {
        DomainValue::Null => Numeric::Number(0.0),
        DomainValue::Undefined => Numeric::Number(f64::NAN),
        DomainValue::Literal(LiteralValue::Boolean(b)) => Numeric::Number(bool_to_number(*b)),
        DomainValue::Literal(LiteralValue::Number(n)) => Numeric::Number(n.value()),
        DomainValue::Literal(LiteralValue::String(s)) => Numeric::Number(string_to_number(s)),
        DomainValue::Literal(LiteralValue::BigInt(digits)) => Numeric::BigInt(parse_bigint(digits)?),
    })
    .map(|numeric| match numeric {
        Numeric::Number(n) if n.is_nan() => Numeric::Unordered,
        other => other,
    })
}

fn compare_utf16(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

fn compare_bigint_number(big: i128, number: f64) -> Option<Ordering> {
    if number.is_nan() {
        return None;
    }
    if number == f64::INFINITY {
        return Some(Ordering::Less);
    }
    if number == f64::NEG_INFINITY {
        return Some(Ordering::Greater);
    }
    (big as f64).partial_cmp(&number).map(|ordering| {
        if ordering != Ordering::Equal {
            return ordering;
        }
        // Equal after rounding: settle on the integer part.
        let truncated = number.trunc();
        if truncated != number {
            return if number > truncated {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        Ordering::Equal
    })
}

// =============================================================================
// Coercions
// =============================================================================

fn bool_to_number(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

fn number_literal(value: f64) -> LiteralValue {
    LiteralValue::Number(crate::types::OrderedFloat(value))
}

fn parse_bigint(digits: &Arc<str>) -> Option<i128> {
    digits.parse().ok()
}

/// String-to-number conversion as the language's `Number(s)` performs it.
pub fn string_to_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            return u64::from_str_radix(rest, radix)
                .map(|value| value as f64)
                .unwrap_or(f64::NAN);
        }
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    // Rust accepts "inf"/"nan" spellings the language does not.
    let valid = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !valid {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

fn string_to_bigint(text: &str) -> Option<i128> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    trimmed.parse().ok()
}
