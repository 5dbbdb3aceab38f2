//! Static type model.
//!
//! Types are interned: a [`TypeId`] names a [`TypeData`] stored in the
//! [`TypeInterner`](crate::intern::TypeInterner). Intrinsics and the two
//! boolean literals are pre-registered at fixed ids so hot paths can compare
//! against constants without a table lookup.

use bitflags::bitflags;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// =============================================================================
// Handles
// =============================================================================

/// Interned type handle. Equal structures intern to equal ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const NEVER: TypeId = TypeId(0);
    pub const UNKNOWN: TypeId = TypeId(1);
    pub const ANY: TypeId = TypeId(2);
    pub const VOID: TypeId = TypeId(3);
    pub const UNDEFINED: TypeId = TypeId(4);
    pub const NULL: TypeId = TypeId(5);
    pub const BOOLEAN: TypeId = TypeId(6);
    pub const NUMBER: TypeId = TypeId(7);
    pub const STRING: TypeId = TypeId(8);
    pub const BIGINT: TypeId = TypeId(9);
    pub const SYMBOL: TypeId = TypeId(10);
    pub const OBJECT: TypeId = TypeId(11);
    pub const BOOLEAN_TRUE: TypeId = TypeId(12);
    pub const BOOLEAN_FALSE: TypeId = TypeId(13);

    /// First id handed out for non-pre-registered types.
    pub const FIRST_USER: u32 = 14;

    /// Returns `true` for the pre-registered intrinsic ids (not the boolean literals).
    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        self.0 < Self::BOOLEAN_TRUE.0
    }

    /// `any` or `unknown`.
    #[inline]
    pub const fn is_any_or_unknown(self) -> bool {
        self.0 == Self::ANY.0 || self.0 == Self::UNKNOWN.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to an interned list of types (union/intersection members, tuple elements).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeListId(pub u32);

/// Handle to an interned [`FunctionShape`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SignatureId(pub u32);

/// Nominal class identity. Shapes are declared first and defined later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClassId(pub u32);

/// Nominal alias identity. The target may be defined after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AliasId(pub u32);

// =============================================================================
// Type Data
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Never,
    Unknown,
    Any,
    Void,
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Bigint,
    Symbol,
    Object,
}

impl IntrinsicKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Unknown => "unknown",
            Self::Any => "any",
            Self::Void => "void",
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Bigint => "bigint",
            Self::Symbol => "symbol",
            Self::Object => "object",
        }
    }

    /// The pre-registered id for this intrinsic.
    pub const fn type_id(self) -> TypeId {
        match self {
            Self::Never => TypeId::NEVER,
            Self::Unknown => TypeId::UNKNOWN,
            Self::Any => TypeId::ANY,
            Self::Void => TypeId::VOID,
            Self::Undefined => TypeId::UNDEFINED,
            Self::Null => TypeId::NULL,
            Self::Boolean => TypeId::BOOLEAN,
            Self::Number => TypeId::NUMBER,
            Self::String => TypeId::STRING,
            Self::Bigint => TypeId::BIGINT,
            Self::Symbol => TypeId::SYMBOL,
            Self::Object => TypeId::OBJECT,
        }
    }

    /// `null`, `undefined` or `void`.
    pub const fn is_nullish(self) -> bool {
        matches!(self, Self::Null | Self::Undefined | Self::Void)
    }
}

/// A number that hashes and compares by bit pattern, so it can key the interner.
///
/// Use [`OrderedFloat::value`] for arithmetic comparisons; `NaN` and `-0`
/// intern as distinct literals.
#[derive(Clone, Copy, Debug)]
pub struct OrderedFloat(pub f64);

impl OrderedFloat {
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for OrderedFloat {}

impl Hash for OrderedFloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Value of a literal type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    String(Arc<str>),
    Number(OrderedFloat),
    /// Decimal digits, optionally preceded by `-`, without the `n` suffix.
    BigInt(Arc<str>),
    Boolean(bool),
}

impl LiteralValue {
    /// `false`, `0`, `-0`, `NaN`, `""` and `0n`.
    pub fn is_falsy(&self) -> bool {
        match self {
            LiteralValue::String(s) => s.is_empty(),
            LiteralValue::Number(n) => n.0 == 0.0 || n.0.is_nan(),
            LiteralValue::BigInt(digits) => digits.trim_start_matches('-').bytes().all(|b| b == b'0'),
            LiteralValue::Boolean(b) => !*b,
        }
    }
}

/// A generic type parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParamInfo {
    pub name: Arc<str>,
    pub constraint: Option<TypeId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    Literal(LiteralValue),
    Union(TypeListId),
    Intersection(TypeListId),
    Array(TypeId),
    Tuple(TypeListId),
    Function(SignatureId),
    Class(ClassId),
    Alias(AliasId),
    TypeParameter(TypeParamInfo),
    /// Unresolved external symbol, e.g. a type imported from a file the host
    /// did not analyze. Treated conservatively by every predicate.
    Unclear(Arc<str>),
}

// =============================================================================
// Signatures
// =============================================================================

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SignatureFlags: u8 {
        const ASYNC = 1 << 0;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamInfo {
    pub name: Arc<str>,
    pub ty: TypeId,
    pub optional: bool,
}

impl ParamInfo {
    pub fn required(name: &str, ty: TypeId) -> Self {
        ParamInfo {
            name: name.into(),
            ty,
            optional: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    pub params: Vec<ParamInfo>,
    pub return_type: TypeId,
    pub flags: SignatureFlags,
}

impl FunctionShape {
    pub fn new(params: Vec<ParamInfo>, return_type: TypeId) -> Self {
        FunctionShape {
            params,
            return_type,
            flags: SignatureFlags::empty(),
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SignatureFlags) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub fn is_async(&self) -> bool {
        self.flags.contains(SignatureFlags::ASYNC)
    }
}

// =============================================================================
// Classes
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: Arc<str>,
    pub ty: TypeId,
}

impl FieldInfo {
    pub fn new(name: &str, ty: TypeId) -> Self {
        FieldInfo {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodInfo {
    pub name: Arc<str>,
    pub signature: SignatureId,
}

/// Members of a nominal class or object type.
///
/// An empty `name` marks an anonymous object literal type (`{ foo: string }`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassShape {
    pub name: Arc<str>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
}

impl ClassShape {
    pub fn field(&self, name: &str) -> Option<TypeId> {
        self.fields
            .iter()
            .find(|field| &*field.name == name)
            .map(|field| field.ty)
    }

    pub fn method(&self, name: &str) -> Option<SignatureId> {
        self.methods
            .iter()
            .find(|method| &*method.name == name)
            .map(|method| method.signature)
    }

    #[inline]
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }
}
