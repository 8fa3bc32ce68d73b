use bindery_types::{well_known, PrimitiveKind, TypeDescriptor, TypeStore, TypeSystem};

use pretty_assertions::assert_eq;

#[test]
fn wrapper_closures_reach_number_and_comparable() {
    let store = TypeStore::with_minimal_jdk();
    let integer = PrimitiveKind::Int.wrapper();

    let closure = store.type_closure(&integer);
    assert_eq!(
        closure,
        vec![
            integer.clone(),
            store.raw(well_known::NUMBER),
            store.raw(well_known::SERIALIZABLE),
            store.declared(well_known::COMPARABLE, vec![integer]),
            TypeDescriptor::object(),
        ]
    );
}

#[test]
fn boolean_is_not_a_number() {
    let store = TypeStore::with_minimal_jdk();
    let boolean = PrimitiveKind::Boolean.wrapper();
    assert!(!store.is_assignable(&boolean, &store.raw(well_known::NUMBER)));
    assert!(store.is_assignable(&boolean, &store.raw(well_known::SERIALIZABLE)));
}

#[test]
fn hash_map_closure_keeps_both_arguments() {
    let store = TypeStore::with_minimal_jdk();
    let string = store.raw(well_known::STRING);
    let integer = store.raw(well_known::INTEGER);
    let hash_map = store.declared(well_known::HASH_MAP, vec![string.clone(), integer.clone()]);

    let closure = store.type_closure(&hash_map);
    assert!(closure.contains(&store.declared(well_known::MAP, vec![string, integer])));
    assert_eq!(closure.last(), Some(&TypeDescriptor::object()));
}

#[test]
fn primitive_and_array_closures() {
    let store = TypeStore::with_minimal_jdk();
    let int = TypeDescriptor::primitive(PrimitiveKind::Int);
    assert_eq!(
        store.type_closure(&int),
        vec![int.clone(), TypeDescriptor::object()]
    );

    let int_array = TypeDescriptor::array(int);
    assert_eq!(
        store.type_closure(&int_array),
        vec![
            int_array.clone(),
            store.raw(well_known::CLONEABLE),
            store.raw(well_known::SERIALIZABLE),
            TypeDescriptor::object(),
        ]
    );
}

#[test]
fn everything_reference_typed_is_assignable_to_object() {
    let store = TypeStore::with_minimal_jdk();
    let object = store.top_type();
    let list_string = store.declared(well_known::LIST, vec![store.raw(well_known::STRING)]);
    assert!(store.is_top_type(&object));
    assert!(store.is_assignable(&list_string, &object));
    assert!(store.is_assignable(&TypeDescriptor::array(list_string), &object));
    assert!(!store.is_assignable(&TypeDescriptor::primitive(PrimitiveKind::Int), &object));
}
