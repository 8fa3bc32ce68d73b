use std::fmt;

use bindery_types::{TypeDescriptor, TypeKind};
use thiserror::Error;

use crate::{CandidateId, SelectionCriteria};

/// Why a descriptor was rejected by the assignability engine or criteria construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvalidTypeReason {
    /// A wildcard or intersection where a top-level type is required.
    IllegalKind,
    /// A type-argument pairing outside the actual/wildcard/type-variable grid.
    UnsupportedPairing,
    /// Two parameterizations of the same raw type with different argument counts.
    ArityMismatch,
    /// Nesting deeper than the configured `max_type_depth`.
    DepthExceeded,
}

impl fmt::Display for InvalidTypeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InvalidTypeReason::IllegalKind => "illegal type kind",
            InvalidTypeReason::UnsupportedPairing => "unsupported type argument pairing",
            InvalidTypeReason::ArityMismatch => "type argument count mismatch",
            InvalidTypeReason::DepthExceeded => "type nesting too deep",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid {kind} type `{ty}`: {reason}")]
pub struct InvalidTypeError {
    pub ty: TypeDescriptor,
    pub kind: TypeKind,
    pub reason: InvalidTypeReason,
}

impl InvalidTypeError {
    pub fn new(ty: &TypeDescriptor, reason: InvalidTypeReason) -> Self {
        Self {
            ty: ty.clone(),
            kind: ty.kind(),
            reason,
        }
    }

    pub(crate) fn illegal_kind(ty: &TypeDescriptor) -> Self {
        Self::new(ty, InvalidTypeReason::IllegalKind)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error(transparent)]
    InvalidType(#[from] InvalidTypeError),
    #[error("unsatisfied dependency: no candidate matches {criteria}")]
    Unsatisfied { criteria: SelectionCriteria },
    #[error("ambiguous dependency: {criteria} is satisfied by {}", join_ids(.candidates))]
    Ambiguous {
        criteria: SelectionCriteria,
        /// The full tie set, in registry order.
        candidates: Vec<CandidateId>,
    },
}

impl ResolveError {
    pub fn is_unsatisfied(&self) -> bool {
        matches!(self, ResolveError::Unsatisfied { .. })
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, ResolveError::Ambiguous { .. })
    }
}

fn join_ids(ids: &[CandidateId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode or decode registry snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported registry snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("registry snapshot contains an invalid type: {0}")]
    InvalidType(#[from] InvalidTypeError),
}
