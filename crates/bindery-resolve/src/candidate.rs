use std::collections::BTreeSet;
use std::fmt;

use bindery_types::{TypeDescriptor, TypeSystem};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::{Attribute, InvalidTypeError};

/// Opaque candidate identifier, unique within a registry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(SmolStr);

impl CandidateId {
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A registered provider.
///
/// `type_closure` lists every type the candidate can be injected as; it is computed once (see
/// [`CandidateSpec::build`]) and never changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub type_closure: Vec<TypeDescriptor>,
    #[serde(default)]
    pub attributes: BTreeSet<Attribute>,
    #[serde(default)]
    pub rank: i32,
    #[serde(default)]
    pub is_alternate: bool,
    /// A fallback provider, discarded whenever a non-default candidate also matches.
    #[serde(default)]
    pub is_default: bool,
}

impl Candidate {
    pub fn new(id: impl Into<CandidateId>, type_closure: Vec<TypeDescriptor>) -> Self {
        Self {
            id: id.into(),
            type_closure,
            attributes: BTreeSet::new(),
            rank: 0,
            is_alternate: false,
            is_default: false,
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.insert(attribute);
        self
    }

    pub fn with_rank(mut self, rank: i32) -> Self {
        self.rank = rank;
        self
    }

    pub fn alternate(mut self, rank: i32) -> Self {
        self.is_alternate = true;
        self.rank = rank;
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Fails when a closure entry is a wildcard or intersection.
    pub(crate) fn validate(&self) -> Result<(), InvalidTypeError> {
        match self.type_closure.iter().find(|ty| !ty.is_top_level_kind()) {
            Some(ty) => Err(InvalidTypeError::illegal_kind(ty)),
            None => Ok(()),
        }
    }
}

/// Registration data for a candidate whose type closure is computed by a [`TypeSystem`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSpec {
    pub id: CandidateId,
    pub ty: TypeDescriptor,
    #[serde(default)]
    pub attributes: BTreeSet<Attribute>,
    #[serde(default)]
    pub rank: i32,
    #[serde(default)]
    pub is_alternate: bool,
    #[serde(default)]
    pub is_default: bool,
    /// Restricts the closure to these types (plus the top type), like `@Typed`.
    #[serde(default)]
    pub typed: Option<Vec<TypeDescriptor>>,
}

impl CandidateSpec {
    pub fn new(id: impl Into<CandidateId>, ty: TypeDescriptor) -> Self {
        Self {
            id: id.into(),
            ty,
            attributes: BTreeSet::new(),
            rank: 0,
            is_alternate: false,
            is_default: false,
            typed: None,
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.insert(attribute);
        self
    }

    pub fn with_rank(mut self, rank: i32) -> Self {
        self.rank = rank;
        self
    }

    pub fn alternate(mut self, rank: i32) -> Self {
        self.is_alternate = true;
        self.rank = rank;
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn typed(mut self, types: Vec<TypeDescriptor>) -> Self {
        self.typed = Some(types);
        self
    }

    /// Compute the type closure and freeze the candidate.
    pub fn build(self, types: &dyn TypeSystem) -> Result<Candidate, InvalidTypeError> {
        if !self.ty.is_top_level_kind() {
            return Err(InvalidTypeError::illegal_kind(&self.ty));
        }

        let mut closure = types.type_closure(&self.ty);
        if let Some(allowed) = &self.typed {
            let top = types.top_type();
            closure.retain(|ty| {
                types.is_top_type(ty) || allowed.iter().any(|a| types.type_equals(a, ty))
            });
            if !closure.iter().any(|ty| types.is_top_type(ty)) {
                closure.push(top);
            }
        }

        let candidate = Candidate {
            id: self.id,
            type_closure: closure,
            attributes: self.attributes,
            rank: self.rank,
            is_alternate: self.is_alternate,
            is_default: self.is_default,
        };
        candidate.validate()?;
        Ok(candidate)
    }
}
