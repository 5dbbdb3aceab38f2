//! Static Type Algebra
//!
//! The type model the condition analyzer reasons over, and the predicates it
//! asks of it:
//!
//! - **Interned `TypeData`**: O(1) type equality via `TypeId` comparison
//! - **Nominal definitions**: classes and aliases declared before they are defined
//! - **Truthiness / nullishness**: independent possibly-truthy, possibly-falsy
//!   and possibly-nullish predicates over flattened unions
//! - **Literal domain**: compile-time evaluation of literal comparisons
pub mod comparison;
mod display;
pub mod flatten;
mod intern;
pub mod nullish;
pub mod recursion;
pub mod truthiness;
pub mod types;

pub use comparison::{DomainValue, evaluate_comparison, is_literal_type, literal_domain_value};
pub use display::{display_domain_value, display_literal};
pub use flatten::{Flattened, intersection_parts, strip_aliases, union_members};
pub use intern::TypeInterner;
pub use nullish::{is_always_nullish, is_nullish, is_possibly_nullish};
pub use truthiness::{is_falsy_literal, is_possibly_falsy, is_possibly_truthy, is_truthy_literal};
pub use types::{
    AliasId, ClassId, ClassShape, FieldInfo, FunctionShape, IntrinsicKind, LiteralValue,
    MethodInfo, OrderedFloat, ParamInfo, SignatureFlags, SignatureId, TypeData, TypeId,
    TypeListId, TypeParamInfo,
};
