//! Truthiness classification.
//!
//! Pure functions from constrained types to finding categories. They never
//! see syntax; the walker decides which classifier applies to a site and
//! applies the syntax-level tie-breaks.

use tscond_common::{ComparisonOperator, ConditionCategory};
use tscond_types::{
    IntrinsicKind, TypeData, TypeId, TypeInterner, evaluate_comparison, is_always_nullish,
    is_literal_type, is_possibly_falsy, is_possibly_nullish, is_possibly_truthy, strip_aliases,
    union_members,
};

fn is_never(types: &TypeInterner, ty: TypeId) -> bool {
    strip_aliases(types, ty) == TypeId::NEVER
}

fn is_any_or_unknown(types: &TypeInterner, ty: TypeId) -> bool {
    strip_aliases(types, ty).is_any_or_unknown()
}

/// Truthiness of a value used as a condition.
pub fn classify_truthiness(types: &TypeInterner, ty: TypeId) -> Option<ConditionCategory> {
    if is_never(types, ty) {
        return Some(ConditionCategory::Never);
    }
    if !is_possibly_falsy(types, ty) {
        return Some(ConditionCategory::AlwaysTruthy);
    }
    if !is_possibly_truthy(types, ty) {
        return Some(ConditionCategory::AlwaysFalsy);
    }
    None
}

/// Nullishness of the left operand of `??` or `??=`.
pub fn classify_nullish(types: &TypeInterner, ty: TypeId) -> Option<ConditionCategory> {
    if is_never(types, ty) {
        return Some(ConditionCategory::Never);
    }
    if !is_possibly_nullish(types, ty) {
        return Some(ConditionCategory::NeverNullish);
    }
    if is_always_nullish(types, ty) {
        return Some(ConditionCategory::AlwaysNullish);
    }
    None
}

/// Outcome of classifying `left op right`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonFinding {
    /// Both sides are literal values; `outcome` is the folded result when decidable.
    Literal { outcome: Option<bool> },
    /// One side is `null`/`undefined` and the other can never be.
    NoOverlap,
}

impl ComparisonFinding {
    pub const fn category(self) -> ConditionCategory {
        match self {
            ComparisonFinding::Literal { .. } => ConditionCategory::LiteralComparison,
            ComparisonFinding::NoOverlap => ConditionCategory::NoOverlapComparison,
        }
    }
}

pub fn classify_comparison(
    types: &TypeInterner,
    op: ComparisonOperator,
    left: TypeId,
    right: TypeId,
) -> Option<ComparisonFinding> {
    if is_literal_type(types, left) && is_literal_type(types, right) {
        return Some(ComparisonFinding::Literal {
            outcome: evaluate_comparison(types, op, left, right),
        });
    }
    if !op.is_equality() {
        return None;
    }

    let (nullish, other) = match (nullish_kind(types, left), nullish_kind(types, right)) {
        (Some(kind), None) => (kind, right),
        (None, Some(kind)) => (kind, left),
        _ => return None,
    };
    // An operand with no values is unreachable code, not a missed overlap.
    if is_never(types, other) {
        return None;
    }
    let members = union_members(types, other);
    if !members.complete || members.members.is_empty() {
        return None;
    }
    let overlaps = members
        .iter()
        .any(|member| member_tolerates(types, member, nullish, op.is_loose()));
    (!overlaps).then_some(ComparisonFinding::NoOverlap)
}

/// `null` or `undefined` as a comparison operand.
fn nullish_kind(types: &TypeInterner, ty: TypeId) -> Option<IntrinsicKind> {
    match strip_aliases(types, ty) {
        TypeId::NULL => Some(IntrinsicKind::Null),
        TypeId::UNDEFINED => Some(IntrinsicKind::Undefined),
        _ => None,
    }
}

/// `member` may hold a value equal to `nullish`.
fn member_tolerates(
    types: &TypeInterner,
    member: TypeId,
    nullish: IntrinsicKind,
    loose: bool,
) -> bool {
    match types.lookup(member) {
        Some(TypeData::Intrinsic(kind)) => match kind {
            IntrinsicKind::Any | IntrinsicKind::Unknown => true,
            IntrinsicKind::Null | IntrinsicKind::Undefined | IntrinsicKind::Void if loose => true,
            IntrinsicKind::Void => nullish == IntrinsicKind::Undefined,
            kind => kind == nullish,
        },
        // Left whole by flattening: unresolved aliases, unconstrained
        // generics, external symbols.
        Some(TypeData::Alias(_) | TypeData::TypeParameter(_) | TypeData::Unclear(_)) => true,
        Some(TypeData::Intersection(_)) => is_possibly_nullish(types, member),
        _ => false,
    }
}

/// An optional-chain access on a base of type `base`.
pub fn classify_optional_chain(types: &TypeInterner, base: TypeId) -> Option<ConditionCategory> {
    let stripped = strip_aliases(types, base);
    if stripped == TypeId::NEVER || is_possibly_nullish(types, stripped) {
        return None;
    }
    Some(ConditionCategory::RedundantOptionalChain)
}

/// Return type of an array-predicate callback.
pub fn classify_callback_return(types: &TypeInterner, ret: TypeId) -> Option<ConditionCategory> {
    if is_any_or_unknown(types, ret) || is_never(types, ret) {
        return None;
    }
    if !is_possibly_falsy(types, ret) {
        return Some(ConditionCategory::CallbackAlwaysTruthy);
    }
    if !is_possibly_truthy(types, ret) {
        return Some(ConditionCategory::CallbackAlwaysFalsy);
    }
    None
}

/// Every member of `ty` is an array or a tuple.
pub fn is_array_like(types: &TypeInterner, ty: TypeId) -> bool {
    let members = union_members(types, ty);
    members.complete
        && !members.members.is_empty()
        && members.iter().all(|member| {
            matches!(
                types.lookup(strip_aliases(types, member)),
                Some(TypeData::Array(_) | TypeData::Tuple(_))
            )
        })
}

/// `ty` is an array type (not a tuple).
pub fn is_array(types: &TypeInterner, ty: TypeId) -> bool {
    matches!(
        types.lookup(strip_aliases(types, ty)),
        Some(TypeData::Array(_))
    )
}
