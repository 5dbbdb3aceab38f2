//! Flattening of unions and intersections.
//!
//! Flattening sees through alias targets and constrained type parameters. A
//! self-referential alias contributes nothing on its repeat visit; hitting the
//! depth or member limit marks the result incomplete, and every predicate
//! built on top answers conservatively for an incomplete flattening.

use crate::intern::TypeInterner;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::{TypeData, TypeId};
use smallvec::SmallVec;
use tscond_common::limits::MAX_FLATTENED_MEMBERS;
use tracing::trace;

/// Members of a flattened type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flattened {
    pub members: SmallVec<[TypeId; 8]>,
    /// `false` when a limit truncated the walk.
    pub complete: bool,
}

impl Flattened {
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.members.iter().copied()
    }

    #[inline]
    pub fn contains(&self, ty: TypeId) -> bool {
        self.members.contains(&ty)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Split {
    Union,
    Intersection,
}

/// Union members of `ty`. Intersections stay whole; a non-union type yields itself.
pub fn union_members(types: &TypeInterner, ty: TypeId) -> Flattened {
    flatten(types, ty, Split::Union)
}

/// Intersection parts of `ty`. Unions stay whole; a non-intersection type yields itself.
pub fn intersection_parts(types: &TypeInterner, ty: TypeId) -> Flattened {
    flatten(types, ty, Split::Intersection)
}

/// Follow alias targets until a non-alias type. Unresolved aliases and alias
/// cycles return the last alias reached.
pub fn strip_aliases(types: &TypeInterner, ty: TypeId) -> TypeId {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::TypeFlattening);
    let mut current = ty;
    let mut entered: SmallVec<[TypeId; 4]> = SmallVec::new();
    while let Some(TypeData::Alias(alias)) = types.lookup(current) {
        let Some(target) = types.alias_target(alias) else {
            break;
        };
        if !guard.enter(current).is_entered() {
            break;
        }
        entered.push(current);
        current = target;
    }
    for key in entered.into_iter().rev() {
        guard.leave(key);
    }
    current
}

fn flatten(types: &TypeInterner, ty: TypeId, split: Split) -> Flattened {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::TypeFlattening);
    let mut out = Flattened {
        members: SmallVec::new(),
        complete: true,
    };
    collect(types, ty, split, &mut guard, &mut out);
    if !out.complete {
        trace!(type_id = ty.0, members = out.members.len(), "flatten: truncated");
    }
    out
}

fn collect(
    types: &TypeInterner,
    ty: TypeId,
    split: Split,
    guard: &mut RecursionGuard<TypeId>,
    out: &mut Flattened,
) {
    if !out.complete {
        return;
    }

    let nested: SmallVec<[TypeId; 8]> = match types.lookup(ty) {
        Some(TypeData::Union(list)) if split == Split::Union => {
            types.type_list(list).iter().copied().collect()
        }
        Some(TypeData::Intersection(list)) if split == Split::Intersection => {
            types.type_list(list).iter().copied().collect()
        }
        Some(TypeData::Alias(alias)) => match types.alias_target(alias) {
            Some(target) => SmallVec::from_slice(&[target]),
            None => return push(out, ty),
        },
        Some(TypeData::TypeParameter(info)) => match info.constraint {
            Some(constraint) => SmallVec::from_slice(&[constraint]),
            None => return push(out, ty),
        },
        _ => return push(out, ty),
    };

    match guard.enter(ty) {
        RecursionResult::Entered => {
            for member in nested {
                collect(types, member, split, guard, out);
            }
            guard.leave(ty);
        }
        RecursionResult::Cycle => {}
        RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
            out.complete = false;
        }
    }
}

fn push(out: &mut Flattened, ty: TypeId) {
    if out.members.contains(&ty) {
        return;
    }
    if out.members.len() >= MAX_FLATTENED_MEMBERS {
        out.complete = false;
        return;
    }
    out.members.push(ty);
}
