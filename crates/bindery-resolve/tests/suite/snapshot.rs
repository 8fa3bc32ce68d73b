use bindery_resolve::{
    Attribute, Candidate, CandidateRegistry, CandidateSpec, InvalidTypeReason, RegistrySnapshot,
    ResolutionConfig, SelectionCriteria, SnapshotError,
};
use bindery_types::{well_known, TypeDescriptor};
use pretty_assertions::assert_eq;

use super::support::{list_of, store, string};

#[test]
fn snapshot_round_trips_through_json() {
    let store = store();
    let names = store.declared(well_known::ARRAY_LIST, vec![string(&store)]);
    let registry = CandidateRegistry::from_specs(
        store.clone(),
        [
            CandidateSpec::new("names", names),
            CandidateSpec::new("primary", string(&store))
                .with_attribute(Attribute::named("primary"))
                .alternate(3),
        ],
        &ResolutionConfig::default(),
    )
    .unwrap();

    let snapshot = registry.snapshot();
    assert_eq!(snapshot.version, RegistrySnapshot::VERSION);

    let json = snapshot.to_json().unwrap();
    let decoded = RegistrySnapshot::from_json(&json).unwrap();
    assert_eq!(decoded, snapshot);

    let restored =
        CandidateRegistry::from_snapshot(store.clone(), decoded, &ResolutionConfig::default());
    assert_eq!(restored.len(), 2);
    assert_eq!(restored.stats().selections, 0);

    let criteria = SelectionCriteria::of_type(list_of(&store, string(&store))).unwrap();
    assert_eq!(
        restored.resolve(&criteria).unwrap().unwrap().id.as_str(),
        "names"
    );

    let named = restored
        .criteria(string(&store), [Attribute::named("primary")])
        .unwrap();
    let primary = restored.resolve(&named).unwrap().unwrap();
    assert!(primary.is_alternate);
    assert_eq!(primary.rank, 3);
}

#[test]
fn unknown_versions_are_rejected() {
    let json = RegistrySnapshot::new(Vec::new()).to_json().unwrap();
    let bumped = json.replace("\"version\": 1", "\"version\": 2");
    assert_ne!(json, bumped);

    match RegistrySnapshot::from_json(&bumped) {
        Err(SnapshotError::UnsupportedVersion { found, expected }) => {
            assert_eq!(found, 2);
            assert_eq!(expected, RegistrySnapshot::VERSION);
        }
        other => panic!("expected a version error, got {other:?}"),
    }
}

#[test]
fn closures_with_illegal_kinds_are_rejected() {
    let broken = Candidate::new("broken", vec![TypeDescriptor::wildcard()]);
    let json = RegistrySnapshot::new(vec![broken]).to_json().unwrap();

    match RegistrySnapshot::from_json(&json) {
        Err(SnapshotError::InvalidType(err)) => {
            assert_eq!(err.reason, InvalidTypeReason::IllegalKind)
        }
        other => panic!("expected an invalid type error, got {other:?}"),
    }
}

#[test]
fn malformed_json_is_a_decode_error() {
    let err = RegistrySnapshot::from_json("{\"version\": 1").unwrap_err();
    assert!(matches!(err, SnapshotError::Json(_)));
}
