//! Truthiness predicates.
//!
//! Possibly-truthy and possibly-falsy are independent: `number` admits both
//! `0` and `1`, so it is neither always truthy nor always falsy. Only literal
//! and nullish types have a fixed truthiness.
//!
//! ```typescript
//! declare const a: number;       // possibly truthy, possibly falsy
//! declare const b: 0 | "";       // falsy only
//! declare const c: { id: 1 };    // truthy only
//! declare const d: string & {};  // branded primitive: still possibly ""
//! ```
//!
//! `any`, `unknown`, `void`, unconstrained type parameters, unresolved aliases
//! and `Unclear` types count as both.

use crate::flatten::{intersection_parts, strip_aliases, union_members};
use crate::intern::TypeInterner;
use crate::types::{IntrinsicKind, TypeData, TypeId};
use tscond_common::limits::MAX_FLATTEN_DEPTH;

/// `true` if some value of `ty` is truthy.
pub fn is_possibly_truthy(types: &TypeInterner, ty: TypeId) -> bool {
    possibly_truthy_at(types, ty, 0)
}

/// `true` if some value of `ty` is falsy.
pub fn is_possibly_falsy(types: &TypeInterner, ty: TypeId) -> bool {
    possibly_falsy_at(types, ty, 0)
}

/// A literal whose value is truthy (`true`, `1`, `"a"`, `1n`).
pub fn is_truthy_literal(types: &TypeInterner, ty: TypeId) -> bool {
    match types.lookup(strip_aliases(types, ty)) {
        Some(TypeData::Literal(value)) => !value.is_falsy(),
        _ => false,
    }
}

/// A literal whose value is falsy, or `null`/`undefined`.
pub fn is_falsy_literal(types: &TypeInterner, ty: TypeId) -> bool {
    match types.lookup(strip_aliases(types, ty)) {
        Some(TypeData::Literal(value)) => value.is_falsy(),
        Some(TypeData::Intrinsic(IntrinsicKind::Null | IntrinsicKind::Undefined)) => true,
        _ => false,
    }
}

fn possibly_truthy_at(types: &TypeInterner, ty: TypeId, depth: u32) -> bool {
    if depth >= MAX_FLATTEN_DEPTH {
        return true;
    }
    let members = union_members(types, ty);
    if !members.complete {
        return true;
    }
    members.iter().any(|member| {
        if !matches!(types.lookup(member), Some(TypeData::Intersection(_))) {
            return atom_possibly_truthy(types, member, depth);
        }
        // Every part of an intersection constrains the same value.
        let parts = intersection_parts(types, member);
        !parts.complete
            || parts
                .iter()
                .all(|part| atom_possibly_truthy(types, part, depth))
    })
}

fn possibly_falsy_at(types: &TypeInterner, ty: TypeId, depth: u32) -> bool {
    if depth >= MAX_FLATTEN_DEPTH {
        return true;
    }
    let members = union_members(types, ty);
    if !members.complete {
        return true;
    }
    members.iter().any(|member| {
        if !matches!(types.lookup(member), Some(TypeData::Intersection(_))) {
            return atom_possibly_falsy(types, member, depth);
        }
        let parts = intersection_parts(types, member);
        if !parts.complete {
            return true;
        }
        if parts.iter().any(|part| is_truthy_literal(types, part)) {
            return false;
        }
        parts.iter().any(|part| atom_possibly_falsy(types, part, depth))
    })
}

fn atom_possibly_truthy(types: &TypeInterner, atom: TypeId, depth: u32) -> bool {
    match types.lookup(atom) {
        Some(TypeData::Intrinsic(kind)) => !matches!(
            kind,
            IntrinsicKind::Never | IntrinsicKind::Null | IntrinsicKind::Undefined
        ),
        Some(TypeData::Literal(value)) => !value.is_falsy(),
        Some(TypeData::Union(_) | TypeData::Intersection(_)) => {
            possibly_truthy_at(types, atom, depth + 1)
        }
        Some(
            TypeData::Array(_)
            | TypeData::Tuple(_)
            | TypeData::Function(_)
            | TypeData::Class(_)
            | TypeData::Alias(_)
            | TypeData::TypeParameter(_)
            | TypeData::Unclear(_),
        )
        | None => true,
    }
}

fn atom_possibly_falsy(types: &TypeInterner, atom: TypeId, depth: u32) -> bool {
    match types.lookup(atom) {
        Some(TypeData::Intrinsic(kind)) => !matches!(
            kind,
            IntrinsicKind::Never | IntrinsicKind::Symbol | IntrinsicKind::Object
        ),
        Some(TypeData::Literal(value)) => value.is_falsy(),
        Some(TypeData::Union(_) | TypeData::Intersection(_)) => {
            possibly_falsy_at(types, atom, depth + 1)
        }
        Some(TypeData::Array(_) | TypeData::Tuple(_) | TypeData::Function(_) | TypeData::Class(_)) => {
            false
        }
        Some(TypeData::Alias(_) | TypeData::TypeParameter(_) | TypeData::Unclear(_)) | None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldInfo;

    #[test]
    fn primitives_are_both() {
        let types = TypeInterner::new();
        for ty in [TypeId::NUMBER, TypeId::STRING, TypeId::BOOLEAN, TypeId::BIGINT] {
            assert!(is_possibly_truthy(&types, ty));
            assert!(is_possibly_falsy(&types, ty));
        }
    }

    #[test]
    fn literals_have_fixed_truthiness() {
        let types = TypeInterner::new();
        let zero = types.literal_number(0.0);
        let a = types.literal_string("a");

        assert!(!is_possibly_falsy(&types, TypeId::BOOLEAN_TRUE));
        assert!(!is_possibly_truthy(&types, zero));
        assert!(is_possibly_falsy(&types, zero));
        assert!(!is_possibly_falsy(&types, a));
        assert!(is_truthy_literal(&types, a));
        assert!(is_falsy_literal(&types, zero));
        assert!(is_falsy_literal(&types, TypeId::NULL));
        assert!(!is_falsy_literal(&types, TypeId::STRING));
    }

    #[test]
    fn objects_are_truthy_only() {
        let types = TypeInterner::new();
        let object = types.object(vec![FieldInfo::new("id", TypeId::NUMBER)]);
        let array = types.array(TypeId::NUMBER);
        assert!(!is_possibly_falsy(&types, object));
        assert!(!is_possibly_falsy(&types, array));
        assert!(is_possibly_falsy(&types, types.union([object, TypeId::UNDEFINED])));
    }

    #[test]
    fn nullish_is_falsy_only() {
        let types = TypeInterner::new();
        let ty = types.union([TypeId::NULL, TypeId::UNDEFINED]);
        assert!(!is_possibly_truthy(&types, ty));
        assert!(is_possibly_falsy(&types, ty));
    }

    #[test]
    fn conservative_members_are_both() {
        let types = TypeInterner::new();
        let generic = types.type_param("T", None);
        let unclear = types.unclear("Imported");
        for ty in [TypeId::ANY, TypeId::UNKNOWN, TypeId::VOID, generic, unclear] {
            assert!(is_possibly_truthy(&types, ty));
            assert!(is_possibly_falsy(&types, ty));
        }
    }

    #[test]
    fn constrained_generic_uses_constraint() {
        let types = TypeInterner::new();
        let object = types.object(Vec::new());
        let generic = types.type_param("T", Some(object));
        assert!(!is_possibly_falsy(&types, generic));
    }

    #[test]
    fn branded_primitive_is_possibly_falsy() {
        let types = TypeInterner::new();
        let brand = types.object(vec![FieldInfo::new("__brand", TypeId::STRING)]);
        let branded = types.intersection([TypeId::STRING, brand]);
        assert!(is_possibly_falsy(&types, branded));
        assert!(is_possibly_truthy(&types, branded));
    }

    #[test]
    fn intersection_needs_every_part_truthy() {
        let types = TypeInterner::new();
        let object = types.object(Vec::new());
        let impossible = types.intersection([TypeId::BOOLEAN_FALSE, object]);
        assert!(!is_possibly_truthy(&types, impossible));
    }
}
