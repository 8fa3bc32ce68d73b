use std::fmt;

use bindery_types::TypeDescriptor;
use serde::{Deserialize, Serialize};

use crate::{Attribute, InvalidTypeError};

/// An immutable selection query: the required type, the required attributes and the boxing
/// policy. Used as the key of both registry memo maps.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SelectionCriteria {
    ty: TypeDescriptor,
    attributes: Vec<Attribute>,
    boxed: bool,
}

impl SelectionCriteria {
    /// Build criteria, boxing a primitive `ty` when `box_primitives` is set.
    ///
    /// Fails for wildcards and intersections, which cannot be requested directly.
    pub fn new(
        ty: TypeDescriptor,
        attributes: impl IntoIterator<Item = Attribute>,
        box_primitives: bool,
    ) -> Result<Self, InvalidTypeError> {
        if !ty.is_top_level_kind() {
            return Err(InvalidTypeError::illegal_kind(&ty));
        }
        let ty = if box_primitives { ty.boxed() } else { ty };
        Ok(Self {
            ty,
            attributes: attributes.into_iter().collect(),
            boxed: box_primitives,
        })
    }

    /// Unqualified, boxing criteria for `ty`.
    pub fn of_type(ty: TypeDescriptor) -> Result<Self, InvalidTypeError> {
        Self::new(ty, Vec::new(), true)
    }

    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn is_boxed(&self) -> bool {
        self.boxed
    }

    pub fn qualifiers(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.is_qualifier())
    }

    pub fn interceptor_bindings(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.is_interceptor_binding())
    }
}

impl fmt::Display for SelectionCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty)?;
        for attribute in &self.attributes {
            write!(f, " {attribute}")?;
        }
        Ok(())
    }
}
