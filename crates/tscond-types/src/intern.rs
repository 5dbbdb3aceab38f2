//! Type interning.
//!
//! `TypeInterner` owns every type the analyzer sees. Structural types
//! (literals, unions, arrays, signatures, ...) are hash-consed in
//! `RwLock`-guarded tables; nominal definitions (classes, aliases) live in a
//! definition store keyed by id so they can be declared before their members
//! or targets are known.
//!
//! Union and intersection construction normalizes members:
//! - nested unions/intersections of the same kind are flattened
//! - duplicates are removed, keeping first-occurrence order
//! - `never` is dropped from unions; `any`/`unknown` absorb them
//! - singletons collapse to their member, empty unions to `never`

use crate::types::{
    AliasId, ClassId, ClassShape, FieldInfo, FunctionShape, IntrinsicKind, LiteralValue,
    MethodInfo, OrderedFloat, ParamInfo, SignatureFlags, SignatureId, TypeData, TypeId,
    TypeListId, TypeParamInfo,
};
use dashmap::DashMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::hash::Hash;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};
use tracing::trace;

// =============================================================================
// Tables
// =============================================================================

/// Hash-consing table: equal values get equal ids.
struct ValueTable<T> {
    ids: FxHashMap<T, u32>,
    values: Vec<T>,
}

impl<T: Clone + Eq + Hash> ValueTable<T> {
    fn new() -> Self {
        ValueTable {
            ids: FxHashMap::default(),
            values: Vec::new(),
        }
    }

    fn intern(&mut self, value: T) -> u32 {
        if let Some(&id) = self.ids.get(&value) {
            return id;
        }
        let id = self.values.len() as u32;
        self.values.push(value.clone());
        self.ids.insert(value, id);
        id
    }

    fn get(&self, id: u32) -> Option<&T> {
        self.values.get(id as usize)
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}

#[derive(Clone, Debug)]
struct AliasDefinition {
    name: Arc<str>,
    target: Option<TypeId>,
}

// =============================================================================
// TypeInterner
// =============================================================================

/// Owns all types for one analysis.
///
/// `Send + Sync`: every method takes `&self`, so one interner can back several
/// analyzers running on different threads.
pub struct TypeInterner {
    types: RwLock<ValueTable<TypeData>>,
    type_lists: RwLock<ValueTable<Arc<[TypeId]>>>,
    signatures: RwLock<ValueTable<FunctionShape>>,
    classes: DashMap<ClassId, Arc<ClassShape>>,
    aliases: DashMap<AliasId, AliasDefinition>,
    next_class: AtomicU32,
    next_alias: AtomicU32,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    pub fn new() -> Self {
        let interner = TypeInterner {
            types: RwLock::new(ValueTable::new()),
            type_lists: RwLock::new(ValueTable::new()),
            signatures: RwLock::new(ValueTable::new()),
            classes: DashMap::new(),
            aliases: DashMap::new(),
            next_class: AtomicU32::new(0),
            next_alias: AtomicU32::new(0),
        };
        interner.register_intrinsics();
        interner
    }

    fn register_intrinsics(&self) {
        const ORDER: [IntrinsicKind; 12] = [
            IntrinsicKind::Never,
            IntrinsicKind::Unknown,
            IntrinsicKind::Any,
            IntrinsicKind::Void,
            IntrinsicKind::Undefined,
            IntrinsicKind::Null,
            IntrinsicKind::Boolean,
            IntrinsicKind::Number,
            IntrinsicKind::String,
            IntrinsicKind::Bigint,
            IntrinsicKind::Symbol,
            IntrinsicKind::Object,
        ];
        for kind in ORDER {
            let id = self.intern(TypeData::Intrinsic(kind));
            debug_assert_eq!(id, kind.type_id());
        }
        let true_id = self.intern(TypeData::Literal(LiteralValue::Boolean(true)));
        let false_id = self.intern(TypeData::Literal(LiteralValue::Boolean(false)));
        debug_assert_eq!(true_id, TypeId::BOOLEAN_TRUE);
        debug_assert_eq!(false_id, TypeId::BOOLEAN_FALSE);
    }

    /// Intern raw type data. Prefer the typed constructors, which normalize.
    pub fn intern(&self, data: TypeData) -> TypeId {
        let mut types = self.types.write().expect("type table lock poisoned");
        TypeId(types.intern(data))
    }

    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        let types = self.types.read().expect("type table lock poisoned");
        types.get(id.0).cloned()
    }

    /// Number of interned types, including the pre-registered ones.
    pub fn len(&self) -> usize {
        self.types.read().expect("type table lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        let lists = self.type_lists.read().expect("type list lock poisoned");
        lists.get(id.0).cloned().unwrap_or_else(|| Arc::from([]))
    }

    fn intern_list(&self, members: &[TypeId]) -> TypeListId {
        let mut lists = self.type_lists.write().expect("type list lock poisoned");
        TypeListId(lists.intern(Arc::from(members)))
    }

    // -------------------------------------------------------------------------
    // Literals
    // -------------------------------------------------------------------------

    pub fn literal(&self, value: LiteralValue) -> TypeId {
        match value {
            LiteralValue::Boolean(value) => self.literal_boolean(value),
            other => self.intern(TypeData::Literal(other)),
        }
    }

    pub fn literal_string(&self, value: &str) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::String(value.into())))
    }

    pub fn literal_number(&self, value: f64) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::Number(OrderedFloat(value))))
    }

    /// `digits` is the decimal value without the `n` suffix.
    pub fn literal_bigint(&self, digits: &str) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::BigInt(digits.into())))
    }

    #[inline]
    pub const fn literal_boolean(&self, value: bool) -> TypeId {
        if value {
            TypeId::BOOLEAN_TRUE
        } else {
            TypeId::BOOLEAN_FALSE
        }
    }

    /// The literal value of `id`, if it is a literal type.
    pub fn literal_value(&self, id: TypeId) -> Option<LiteralValue> {
        match self.lookup(id)? {
            TypeData::Literal(value) => Some(value),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Unions and intersections
    // -------------------------------------------------------------------------

    pub fn union<I: IntoIterator<Item = TypeId>>(&self, members: I) -> TypeId {
        let mut flat: SmallVec<[TypeId; 8]> = SmallVec::new();
        let mut seen = FxHashSet::default();
        for member in members {
            match self.lookup(member) {
                Some(TypeData::Union(list)) => {
                    for &inner in self.type_list(list).iter() {
                        if seen.insert(inner) {
                            flat.push(inner);
                        }
                    }
                }
                _ => {
                    if seen.insert(member) {
                        flat.push(member);
                    }
                }
            }
        }

        if seen.contains(&TypeId::ANY) {
            return TypeId::ANY;
        }
        if seen.contains(&TypeId::UNKNOWN) {
            return TypeId::UNKNOWN;
        }
        flat.retain(|member| *member != TypeId::NEVER);

        match flat.len() {
            0 => TypeId::NEVER,
            1 => flat[0],
            _ => {
                let list = self.intern_list(&flat);
                self.intern(TypeData::Union(list))
            }
        }
    }

    pub fn union2(&self, a: TypeId, b: TypeId) -> TypeId {
        self.union([a, b])
    }

    pub fn intersection<I: IntoIterator<Item = TypeId>>(&self, members: I) -> TypeId {
        let mut flat: SmallVec<[TypeId; 8]> = SmallVec::new();
        let mut seen = FxHashSet::default();
        for member in members {
            match self.lookup(member) {
                Some(TypeData::Intersection(list)) => {
                    for &inner in self.type_list(list).iter() {
                        if seen.insert(inner) {
                            flat.push(inner);
                        }
                    }
                }
                _ => {
                    if seen.insert(member) {
                        flat.push(member);
                    }
                }
            }
        }

        if seen.contains(&TypeId::NEVER) {
            return TypeId::NEVER;
        }
        if seen.contains(&TypeId::ANY) {
            return TypeId::ANY;
        }
        flat.retain(|member| *member != TypeId::UNKNOWN);

        match flat.len() {
            0 => TypeId::UNKNOWN,
            1 => flat[0],
            _ => {
                let list = self.intern_list(&flat);
                self.intern(TypeData::Intersection(list))
            }
        }
    }

    // -------------------------------------------------------------------------
    // Structural types
    // -------------------------------------------------------------------------

    pub fn array(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::Array(element))
    }

    pub fn tuple(&self, elements: &[TypeId]) -> TypeId {
        let list = self.intern_list(elements);
        self.intern(TypeData::Tuple(list))
    }

    pub fn signature(&self, shape: FunctionShape) -> SignatureId {
        let mut signatures = self.signatures.write().expect("signature table lock poisoned");
        SignatureId(signatures.intern(shape))
    }

    pub fn function_shape(&self, id: SignatureId) -> Option<FunctionShape> {
        let signatures = self.signatures.read().expect("signature table lock poisoned");
        signatures.get(id.0).cloned()
    }

    pub fn function(&self, shape: FunctionShape) -> TypeId {
        let signature = self.signature(shape);
        self.intern(TypeData::Function(signature))
    }

    /// Shorthand for a synchronous function type.
    pub fn function_returning(&self, params: Vec<ParamInfo>, return_type: TypeId) -> TypeId {
        self.function(FunctionShape::new(params, return_type))
    }

    /// Shorthand for an `async` function type.
    pub fn async_function_returning(&self, params: Vec<ParamInfo>, return_type: TypeId) -> TypeId {
        self.function(FunctionShape::new(params, return_type).with_flags(SignatureFlags::ASYNC))
    }

    /// The signature of a function type, if `id` is one.
    pub fn signature_of(&self, id: TypeId) -> Option<FunctionShape> {
        match self.lookup(id)? {
            TypeData::Function(signature) => self.function_shape(signature),
            _ => None,
        }
    }

    pub fn type_param(&self, name: &str, constraint: Option<TypeId>) -> TypeId {
        self.intern(TypeData::TypeParameter(TypeParamInfo {
            name: name.into(),
            constraint,
        }))
    }

    pub fn unclear(&self, name: &str) -> TypeId {
        self.intern(TypeData::Unclear(name.into()))
    }

    // -------------------------------------------------------------------------
    // Classes
    // -------------------------------------------------------------------------

    /// Declare a nominal class with no members yet.
    pub fn declare_class(&self, name: &str) -> ClassId {
        let id = ClassId(self.next_class.fetch_add(1, Ordering::SeqCst));
        trace!(class_id = id.0, name, "TypeInterner::declare_class");
        self.classes.insert(
            id,
            Arc::new(ClassShape {
                name: name.into(),
                ..ClassShape::default()
            }),
        );
        id
    }

    /// Set the members of a declared class. Unknown ids are ignored.
    pub fn define_class(&self, id: ClassId, fields: Vec<FieldInfo>, methods: Vec<MethodInfo>) {
        if let Some(mut entry) = self.classes.get_mut(&id) {
            let name = entry.name.clone();
            *entry = Arc::new(ClassShape {
                name,
                fields,
                methods,
            });
        }
    }

    pub fn class_type(&self, id: ClassId) -> TypeId {
        self.intern(TypeData::Class(id))
    }

    pub fn class_shape(&self, id: ClassId) -> Option<Arc<ClassShape>> {
        self.classes.get(&id).map(|entry| entry.clone())
    }

    /// Declare and define a class in one step.
    pub fn class(&self, name: &str, fields: Vec<FieldInfo>, methods: Vec<MethodInfo>) -> TypeId {
        let id = self.declare_class(name);
        self.define_class(id, fields, methods);
        self.class_type(id)
    }

    /// Anonymous object type, e.g. `{ foo: string }`.
    pub fn object(&self, fields: Vec<FieldInfo>) -> TypeId {
        self.class("", fields, Vec::new())
    }

    /// Build a method entry for [`define_class`](Self::define_class).
    pub fn method(&self, name: &str, shape: FunctionShape) -> MethodInfo {
        MethodInfo {
            name: name.into(),
            signature: self.signature(shape),
        }
    }

    /// The class shape behind `id`, if it is a class or object type.
    pub fn class_shape_of(&self, id: TypeId) -> Option<Arc<ClassShape>> {
        match self.lookup(id)? {
            TypeData::Class(class) => self.class_shape(class),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Aliases
    // -------------------------------------------------------------------------

    /// Declare an alias whose target is not known yet.
    pub fn declare_alias(&self, name: &str) -> AliasId {
        let id = AliasId(self.next_alias.fetch_add(1, Ordering::SeqCst));
        trace!(alias_id = id.0, name, "TypeInterner::declare_alias");
        self.aliases.insert(
            id,
            AliasDefinition {
                name: name.into(),
                target: None,
            },
        );
        id
    }

    pub fn define_alias(&self, id: AliasId, target: TypeId) {
        if let Some(mut entry) = self.aliases.get_mut(&id) {
            entry.target = Some(target);
        }
    }

    pub fn alias_type(&self, id: AliasId) -> TypeId {
        self.intern(TypeData::Alias(id))
    }

    /// Declare and define an alias in one step.
    pub fn alias(&self, name: &str, target: TypeId) -> TypeId {
        let id = self.declare_alias(name);
        self.define_alias(id, target);
        self.alias_type(id)
    }

    pub fn alias_target(&self, id: AliasId) -> Option<TypeId> {
        self.aliases.get(&id).and_then(|entry| entry.target)
    }

    pub fn alias_name(&self, id: AliasId) -> Option<Arc<str>> {
        self.aliases.get(&id).map(|entry| entry.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intrinsics_are_pre_registered() {
        let interner = TypeInterner::new();
        assert_eq!(
            interner.lookup(TypeId::STRING),
            Some(TypeData::Intrinsic(IntrinsicKind::String))
        );
        assert_eq!(
            interner.lookup(TypeId::BOOLEAN_FALSE),
            Some(TypeData::Literal(LiteralValue::Boolean(false)))
        );
        assert_eq!(interner.len(), TypeId::FIRST_USER as usize);
        assert_eq!(interner.literal(LiteralValue::Boolean(true)), TypeId::BOOLEAN_TRUE);
    }

    #[test]
    fn literals_hash_cons() {
        let interner = TypeInterner::new();
        let a = interner.literal_string("a");
        assert_eq!(a, interner.literal_string("a"));
        assert_ne!(a, interner.literal_string("b"));
        assert_eq!(interner.literal_number(1.0), interner.literal_number(1.0));
    }

    #[test]
    fn union_flattens_and_dedups() {
        let interner = TypeInterner::new();
        let inner = interner.union([TypeId::STRING, TypeId::NULL]);
        let outer = interner.union([inner, TypeId::STRING, TypeId::UNDEFINED]);
        let Some(TypeData::Union(list)) = interner.lookup(outer) else {
            panic!("expected union");
        };
        assert_eq!(
            &*interner.type_list(list),
            &[TypeId::STRING, TypeId::NULL, TypeId::UNDEFINED]
        );
    }

    #[test]
    fn union_collapses_degenerate_cases() {
        let interner = TypeInterner::new();
        assert_eq!(interner.union([TypeId::STRING]), TypeId::STRING);
        assert_eq!(interner.union([TypeId::STRING, TypeId::STRING]), TypeId::STRING);
        assert_eq!(interner.union(std::iter::empty()), TypeId::NEVER);
        assert_eq!(interner.union([TypeId::NEVER, TypeId::NUMBER]), TypeId::NUMBER);
        assert_eq!(interner.union([TypeId::ANY, TypeId::NUMBER]), TypeId::ANY);
    }

    #[test]
    fn intersection_collapses_degenerate_cases() {
        let interner = TypeInterner::new();
        assert_eq!(interner.intersection([TypeId::NEVER, TypeId::STRING]), TypeId::NEVER);
        assert_eq!(interner.intersection([TypeId::UNKNOWN, TypeId::STRING]), TypeId::STRING);
        assert_eq!(interner.intersection(std::iter::empty()), TypeId::UNKNOWN);
    }

    #[test]
    fn classes_can_reference_themselves() {
        let interner = TypeInterner::new();
        let node = interner.declare_class("Node");
        let node_type = interner.class_type(node);
        let next = interner.union([node_type, TypeId::NULL]);
        interner.define_class(node, vec![FieldInfo::new("next", next)], Vec::new());

        let shape = interner.class_shape_of(node_type).expect("class shape");
        assert_eq!(&*shape.name, "Node");
        assert_eq!(shape.field("next"), Some(next));
        assert_eq!(shape.field("prev"), None);
    }

    #[test]
    fn aliases_resolve_after_definition() {
        let interner = TypeInterner::new();
        let id = interner.declare_alias("Maybe");
        assert_eq!(interner.alias_target(id), None);
        interner.define_alias(id, TypeId::STRING);
        assert_eq!(interner.alias_target(id), Some(TypeId::STRING));
        assert_eq!(interner.alias_name(id).as_deref(), Some("Maybe"));
    }

    #[test]
    fn interner_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TypeInterner>();
    }
}
