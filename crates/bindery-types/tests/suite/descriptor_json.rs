use bindery_types::{well_known, PrimitiveKind, TypeDescriptor, TypeStore};

use pretty_assertions::assert_eq;

#[test]
fn descriptors_serialize_as_tagged_json() {
    let store = TypeStore::with_minimal_jdk();
    let ty = store.declared(
        well_known::LIST,
        vec![TypeDescriptor::wildcard_super(store.raw(well_known::INTEGER))],
    );

    let json = serde_json::to_value(&ty).expect("descriptor should serialize");
    assert_eq!(
        json,
        serde_json::json!({
            "declared": {
                "element": { "name": "java.util.List", "arity": 1 },
                "args": [
                    { "wildcard": { "super": { "declared": { "element": { "name": "java.lang.Integer", "arity": 0 } } } } }
                ]
            }
        })
    );

    let back: TypeDescriptor = serde_json::from_value(json).expect("descriptor should deserialize");
    assert_eq!(back, ty);
}

#[test]
fn primitives_serialize_by_keyword() {
    let json = serde_json::to_string(&TypeDescriptor::array(PrimitiveKind::Char.into()))
        .expect("descriptor should serialize");
    assert_eq!(json, r#"{"array":{"primitive":"char"}}"#);
}
