//! Truthiness and nullishness algebra over realistic type shapes.

use tscond_common::ComparisonOperator;
use tscond_types::{
    FieldInfo, FunctionShape, TypeId, TypeInterner, evaluate_comparison, is_always_nullish,
    is_literal_type, is_possibly_falsy, is_possibly_nullish, is_possibly_truthy, union_members,
};

fn create_test_interner() -> TypeInterner {
    TypeInterner::new()
}

#[test]
fn test_optional_object_is_possibly_falsy_only_through_undefined() {
    let types = create_test_interner();
    let user = types.class("User", vec![FieldInfo::new("id", TypeId::NUMBER)], Vec::new());
    let optional = types.union([user, TypeId::UNDEFINED]);

    assert!(!is_possibly_falsy(&types, user));
    assert!(is_possibly_falsy(&types, optional));
    assert!(is_possibly_truthy(&types, optional));
    assert!(is_possibly_nullish(&types, optional));
    assert!(!is_always_nullish(&types, optional));
}

#[test]
fn test_literal_unions() {
    let types = create_test_interner();
    let status = types.union([types.literal_string("ok"), types.literal_string("error")]);
    assert!(!is_possibly_falsy(&types, status));

    let mixed = types.union([types.literal_string("ok"), types.literal_string("")]);
    assert!(is_possibly_falsy(&types, mixed));
    assert!(is_possibly_truthy(&types, mixed));

    let falsy = types.union([TypeId::BOOLEAN_FALSE, types.literal_number(0.0), TypeId::NULL]);
    assert!(!is_possibly_truthy(&types, falsy));
}

#[test]
fn test_aliased_generic_constraint_chain() {
    let types = create_test_interner();
    let maybe_id = types.alias("MaybeId", types.union([TypeId::NUMBER, TypeId::NULL]));
    let generic = types.type_param("K", Some(maybe_id));
    let flat = union_members(&types, generic);
    assert!(flat.complete);
    assert!(flat.contains(TypeId::NUMBER));
    assert!(flat.contains(TypeId::NULL));
    assert!(is_possibly_nullish(&types, generic));
}

#[test]
fn test_functions_and_tuples_are_truthy() {
    let types = create_test_interner();
    let callback = types.function(FunctionShape::new(Vec::new(), TypeId::VOID));
    let pair = types.tuple(&[TypeId::STRING, TypeId::NUMBER]);
    for ty in [callback, pair] {
        assert!(!is_possibly_falsy(&types, ty));
        assert!(!is_possibly_nullish(&types, ty));
    }
}

#[test]
fn test_literal_comparison_domain() {
    let types = create_test_interner();
    let a = types.literal_string("a");
    let b = types.literal_string("b");
    assert!(is_literal_type(&types, a) && is_literal_type(&types, b));
    assert_eq!(
        evaluate_comparison(&types, ComparisonOperator::StrictEqual, a, b),
        Some(false)
    );
    assert_eq!(
        evaluate_comparison(&types, ComparisonOperator::StrictNotEqual, a, b),
        Some(true)
    );
    assert_eq!(
        evaluate_comparison(&types, ComparisonOperator::LooseEqual, TypeId::VOID, TypeId::NULL),
        Some(true)
    );
}

#[test]
fn test_interner_shared_between_threads() {
    let types = create_test_interner();
    std::thread::scope(|scope| {
        for i in 0..4 {
            let types = &types;
            scope.spawn(move || {
                let literal = types.literal_number(f64::from(i));
                let ty = types.union([literal, TypeId::UNDEFINED]);
                assert!(is_possibly_nullish(types, ty));
            });
        }
    });
    assert_eq!(types.literal_number(2.0), types.literal_number(2.0));
}
