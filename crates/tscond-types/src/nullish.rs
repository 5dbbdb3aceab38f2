//! Nullishness predicates.
//!
//! `null`, `undefined` and `void` are nullish. `any`, `unknown`, unconstrained
//! type parameters, unresolved aliases and `Unclear` types are possibly
//! nullish, never always nullish.

use crate::flatten::{intersection_parts, strip_aliases, union_members};
use crate::intern::TypeInterner;
use crate::types::{IntrinsicKind, TypeData, TypeId};
use tscond_common::limits::MAX_FLATTEN_DEPTH;

/// `ty` itself (through aliases) is `null`, `undefined` or `void`.
pub fn is_nullish(types: &TypeInterner, ty: TypeId) -> bool {
    matches!(
        types.lookup(strip_aliases(types, ty)),
        Some(TypeData::Intrinsic(kind)) if kind.is_nullish()
    )
}

/// Every member of `ty` is nullish.
pub fn is_always_nullish(types: &TypeInterner, ty: TypeId) -> bool {
    let members = union_members(types, ty);
    members.complete
        && !members.members.is_empty()
        && members.iter().all(|member| is_nullish(types, member))
}

/// Some member of `ty` may be nullish.
pub fn is_possibly_nullish(types: &TypeInterner, ty: TypeId) -> bool {
    possibly_nullish_at(types, ty, 0)
}

fn possibly_nullish_at(types: &TypeInterner, ty: TypeId, depth: u32) -> bool {
    if depth >= MAX_FLATTEN_DEPTH {
        return true;
    }
    let members = union_members(types, ty);
    if !members.complete {
        return true;
    }
    members.iter().any(|member| {
        if !matches!(types.lookup(member), Some(TypeData::Intersection(_))) {
            return atom_possibly_nullish(types, member, depth);
        }
        let parts = intersection_parts(types, member);
        !parts.complete
            || parts
                .iter()
                .all(|part| atom_possibly_nullish(types, part, depth))
    })
}

fn atom_possibly_nullish(types: &TypeInterner, atom: TypeId, depth: u32) -> bool {
    match types.lookup(atom) {
        Some(TypeData::Intrinsic(kind)) => matches!(
            kind,
            IntrinsicKind::Null
                | IntrinsicKind::Undefined
                | IntrinsicKind::Void
                | IntrinsicKind::Any
                | IntrinsicKind::Unknown
        ),
        Some(TypeData::Union(_) | TypeData::Intersection(_)) => {
            possibly_nullish_at(types, atom, depth + 1)
        }
        Some(TypeData::Alias(_) | TypeData::TypeParameter(_) | TypeData::Unclear(_)) | None => true,
        Some(
            TypeData::Literal(_)
            | TypeData::Array(_)
            | TypeData::Tuple(_)
            | TypeData::Function(_)
            | TypeData::Class(_),
        ) => false,
    }
}
