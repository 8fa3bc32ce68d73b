use bindery_resolve::{AssignabilityEngine, InvalidTypeReason};
use bindery_types::{well_known, PrimitiveKind, TypeDescriptor, TypeStore};

use super::support::{integer, list_of, number, store, string};

fn engine_for(store: &std::sync::Arc<TypeStore>) -> AssignabilityEngine {
    AssignabilityEngine::new(store.clone())
}

fn matches(
    engine: &AssignabilityEngine,
    receiver: &TypeDescriptor,
    payload: &TypeDescriptor,
) -> bool {
    engine
        .matches(receiver, payload)
        .unwrap_or_else(|err| panic!("{receiver} vs {payload}: {err}"))
}

#[test]
fn identical_non_generic_types_match() {
    let store = store();
    let engine = engine_for(&store);
    for name in [
        well_known::OBJECT,
        well_known::STRING,
        well_known::NUMBER,
        well_known::INTEGER,
        "com.example.Unknown",
    ] {
        let ty = store.raw(name);
        assert!(matches(&engine, &ty, &ty), "{ty} should match itself");
    }
}

#[test]
fn boxing_is_bidirectional_but_kind_exact() {
    let store = store();
    let engine = engine_for(&store);
    let int = TypeDescriptor::primitive(PrimitiveKind::Int);
    let long = TypeDescriptor::primitive(PrimitiveKind::Long);
    let long_wrapper = store.raw(well_known::LONG);

    assert!(matches(&engine, &int, &integer(&store)));
    assert!(matches(&engine, &integer(&store), &int));
    assert!(!matches(&engine, &int, &long_wrapper));
    assert!(!matches(&engine, &long_wrapper, &int));
    assert!(!matches(&engine, &int, &long));
    assert!(!matches(&engine, &number(&store), &int));
}

#[test]
fn plain_subtyping_does_not_match_at_the_top_level() {
    let store = store();
    let engine = engine_for(&store);
    // Candidates expose supertypes through their closure; the matcher itself is exact.
    assert!(!matches(&engine, &number(&store), &integer(&store)));
    assert!(!matches(&engine, &TypeDescriptor::object(), &string(&store)));
}

#[test]
fn raw_receiver_requires_unconstrained_payload_arguments() {
    let store = store();
    let engine = engine_for(&store);
    let raw_list = store.raw(well_known::LIST);

    assert!(!matches(&engine, &raw_list, &list_of(&store, string(&store))));
    assert!(matches(&engine, &raw_list, &list_of(&store, TypeDescriptor::object())));
    assert!(matches(
        &engine,
        &raw_list,
        &list_of(&store, TypeDescriptor::unbounded_type_var("E"))
    ));
    assert!(!matches(
        &engine,
        &raw_list,
        &list_of(&store, TypeDescriptor::type_var("E", number(&store)))
    ));
}

#[test]
fn parameterized_receiver_against_raw_payload() {
    let store = store();
    let engine = engine_for(&store);
    let raw_list = store.raw(well_known::LIST);

    assert!(!matches(&engine, &list_of(&store, string(&store)), &raw_list));
    assert!(matches(&engine, &list_of(&store, TypeDescriptor::object()), &raw_list));
    assert!(matches(
        &engine,
        &list_of(&store, TypeDescriptor::unbounded_type_var("T")),
        &raw_list
    ));
    assert!(!matches(
        &engine,
        &list_of(&store, TypeDescriptor::object()),
        &store.raw(well_known::SET)
    ));
}

#[test]
fn actual_type_arguments_are_invariant() {
    let store = store();
    let engine = engine_for(&store);
    let list_number = list_of(&store, number(&store));
    let list_integer = list_of(&store, integer(&store));

    assert!(!matches(&engine, &list_number, &list_integer));
    assert!(!matches(&engine, &list_integer, &list_number));
    assert!(matches(&engine, &list_number, &list_of(&store, number(&store))));
}

#[test]
fn arrays_require_identical_element_types() {
    let store = store();
    let engine = engine_for(&store);
    let list_string_array = TypeDescriptor::array(list_of(&store, string(&store)));
    let list_number_array = TypeDescriptor::array(list_of(&store, number(&store)));
    let number_array = TypeDescriptor::array(number(&store));
    let integer_array = TypeDescriptor::array(integer(&store));
    let int_array = TypeDescriptor::array(PrimitiveKind::Int.into());
    let int_matrix = TypeDescriptor::array(int_array.clone());

    assert!(!matches(&engine, &list_string_array, &list_number_array));
    assert!(matches(
        &engine,
        &list_string_array,
        &TypeDescriptor::array(list_of(&store, string(&store)))
    ));
    assert!(!matches(&engine, &number_array, &integer_array));
    assert!(!matches(&engine, &int_array, &int_matrix));
    assert!(!matches(&engine, &int_array, &integer_array));
    assert!(!matches(&engine, &TypeDescriptor::object(), &int_array));
}

#[test]
fn wildcard_receivers_check_both_bounds() {
    let store = store();
    let engine = engine_for(&store);
    let extends_number = list_of(&store, TypeDescriptor::wildcard_extends(number(&store)));
    let super_integer = list_of(&store, TypeDescriptor::wildcard_super(integer(&store)));
    let unbounded = list_of(&store, TypeDescriptor::wildcard());

    assert!(matches(&engine, &extends_number, &list_of(&store, integer(&store))));
    assert!(matches(&engine, &extends_number, &list_of(&store, number(&store))));
    assert!(!matches(&engine, &extends_number, &list_of(&store, string(&store))));

    assert!(matches(&engine, &super_integer, &list_of(&store, number(&store))));
    assert!(matches(&engine, &super_integer, &list_of(&store, TypeDescriptor::object())));
    assert!(!matches(&engine, &super_integer, &list_of(&store, string(&store))));

    assert!(matches(&engine, &unbounded, &list_of(&store, string(&store))));
}

#[test]
fn actual_receiver_against_type_variable_payload() {
    let store = store();
    let engine = engine_for(&store);
    let payload = list_of(&store, TypeDescriptor::type_var("T", number(&store)));

    assert!(matches(&engine, &list_of(&store, number(&store)), &payload));
    assert!(matches(&engine, &list_of(&store, integer(&store)), &payload));
    assert!(!matches(&engine, &list_of(&store, string(&store)), &payload));
}

#[test]
fn type_variable_bounds_are_condensed() {
    let store = store();
    let engine = engine_for(&store);
    // T extends U, U extends Number & Comparable<Integer>
    let comparable = store.declared(well_known::COMPARABLE, vec![integer(&store)]);
    let u = TypeDescriptor::type_var(
        "U",
        TypeDescriptor::intersection(vec![number(&store), comparable]),
    );
    let payload = list_of(&store, TypeDescriptor::type_var("T", u));

    assert!(matches(&engine, &list_of(&store, integer(&store)), &payload));
    // `Number` satisfies the first bound but is not `Comparable`.
    assert!(!matches(&engine, &list_of(&store, number(&store)), &payload));
}

#[test]
fn wildcard_receiver_against_type_variable_payload() {
    let store = store();
    let engine = engine_for(&store);
    let extends_number = list_of(&store, TypeDescriptor::wildcard_extends(number(&store)));

    let narrower = list_of(&store, TypeDescriptor::type_var("T", integer(&store)));
    let wider = list_of(&store, TypeDescriptor::unbounded_type_var("T"));
    let unrelated = list_of(&store, TypeDescriptor::type_var("T", string(&store)));
    assert!(matches(&engine, &extends_number, &narrower));
    // Overlap is accepted in either direction.
    assert!(matches(&engine, &extends_number, &wider));
    assert!(!matches(&engine, &extends_number, &unrelated));

    let super_integer = list_of(&store, TypeDescriptor::wildcard_super(integer(&store)));
    assert!(matches(
        &engine,
        &super_integer,
        &list_of(&store, TypeDescriptor::type_var("T", number(&store)))
    ));
    assert!(!matches(
        &engine,
        &list_of(&store, TypeDescriptor::wildcard_super(string(&store))),
        &list_of(&store, TypeDescriptor::type_var("T", number(&store)))
    ));
}

#[test]
fn type_variable_receiver_against_type_variable_payload() {
    let store = store();
    let engine = engine_for(&store);
    let t_integer = list_of(&store, TypeDescriptor::type_var("T", integer(&store)));
    let u_number = list_of(&store, TypeDescriptor::type_var("U", number(&store)));

    assert!(matches(&engine, &t_integer, &u_number));
    assert!(!matches(&engine, &u_number, &t_integer));
}

#[test]
fn nested_arguments_recurse() {
    let store = store();
    let engine = engine_for(&store);
    let map = |value: TypeDescriptor| {
        store.declared(well_known::MAP, vec![string(&store), list_of(&store, value)])
    };

    assert!(matches(&engine, &map(integer(&store)), &map(integer(&store))));
    assert!(!matches(&engine, &map(number(&store)), &map(integer(&store))));
    assert!(matches(
        &engine,
        &map(TypeDescriptor::wildcard_extends(number(&store))),
        &map(integer(&store))
    ));
}

#[test]
fn top_level_type_variables_only_match_themselves() {
    let store = store();
    let engine = engine_for(&store);
    let t = TypeDescriptor::type_var("T", number(&store));
    assert!(matches(&engine, &t, &t.clone()));
    assert!(!matches(&engine, &t, &number(&store)));
    assert!(!matches(&engine, &number(&store), &t));
}

#[test]
fn illegal_kinds_are_rejected() {
    let store = store();
    let engine = engine_for(&store);

    let err = engine
        .matches(&TypeDescriptor::wildcard(), &string(&store))
        .unwrap_err();
    assert_eq!(err.reason, InvalidTypeReason::IllegalKind);

    let err = engine
        .matches(
            &string(&store),
            &TypeDescriptor::intersection(vec![string(&store)]),
        )
        .unwrap_err();
    assert_eq!(err.reason, InvalidTypeReason::IllegalKind);
}

#[test]
fn unsupported_argument_pairings_are_errors() {
    let store = store();
    let engine = engine_for(&store);

    let err = engine
        .matches(
            &list_of(&store, TypeDescriptor::unbounded_type_var("T")),
            &list_of(&store, string(&store)),
        )
        .unwrap_err();
    assert_eq!(err.reason, InvalidTypeReason::UnsupportedPairing);

    let err = engine
        .matches(
            &list_of(&store, string(&store)),
            &list_of(&store, TypeDescriptor::wildcard()),
        )
        .unwrap_err();
    assert_eq!(err.reason, InvalidTypeReason::UnsupportedPairing);
}

#[test]
fn argument_count_mismatch_is_an_error() {
    let store = store();
    let engine = engine_for(&store);
    let short = store.declared(well_known::MAP, vec![string(&store)]);
    let full = store.declared(well_known::MAP, vec![string(&store), string(&store)]);

    let err = engine.matches(&full, &short).unwrap_err();
    assert_eq!(err.reason, InvalidTypeReason::ArityMismatch);
}
