//! Dependency-injection resolution core.
//!
//! A [`CandidateRegistry`] holds a fixed pool of [`Candidate`]s. Given [`SelectionCriteria`]
//! (a required type plus qualifying [`Attribute`]s) it selects every candidate whose attributes
//! match and whose type closure contains a type the [`AssignabilityEngine`] accepts, then reduces
//! that selection to one candidate by alternate status and rank. Both steps are memoized per
//! criteria in concurrent maps.
//!
//! ```
//! use std::sync::Arc;
//!
//! use bindery_resolve::{CandidateRegistry, CandidateSpec, SelectionCriteria};
//! use bindery_types::{well_known, TypeStore};
//!
//! let store = Arc::new(TypeStore::with_minimal_jdk());
//! let list_of_strings = store.declared(well_known::LIST, vec![store.raw(well_known::STRING)]);
//! let names = store.declared(well_known::ARRAY_LIST, vec![store.raw(well_known::STRING)]);
//!
//! let registry = CandidateRegistry::from_specs(
//!     store.clone(),
//!     [CandidateSpec::new("names", names)],
//!     &Default::default(),
//! )
//! .unwrap();
//!
//! let criteria = SelectionCriteria::of_type(list_of_strings).unwrap();
//! let resolved = registry.resolve(&criteria).unwrap().unwrap();
//! assert_eq!(resolved.id.as_str(), "names");
//! ```

mod ambiguity;
mod assignability;
pub mod attributes;
mod candidate;
mod criteria;
mod error;
mod reduce;
mod registry;
mod snapshot;

pub use ambiguity::{handler_for, AmbiguityHandler, FailOnAmbiguity, IgnoreAmbiguity};
pub use assignability::AssignabilityEngine;
pub use attributes::{selects_attributes, Attribute, AttributeMember, AttributeValue};
pub use candidate::{Candidate, CandidateId, CandidateSpec};
pub use criteria::SelectionCriteria;
pub use error::{InvalidTypeError, InvalidTypeReason, ResolveError, SnapshotError};
pub use reduce::{reduce, Reducer, Reduction};
pub use registry::{CandidateRegistry, RegistryStats, Selection};
pub use snapshot::RegistrySnapshot;

pub use bindery_config::{AmbiguityMode, ResolutionConfig};
