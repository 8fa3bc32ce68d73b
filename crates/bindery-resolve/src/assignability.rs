//! Generics-aware type matching.
//!
//! [`AssignabilityEngine::matches`] decides whether a payload type (an entry of a candidate's
//! type closure) can satisfy a receiver type (the required type of a selection). Unlike plain
//! Java assignability, type arguments must line up: `List<Integer>` does not satisfy
//! `List<Number>`, while `List<? extends Number>` does. Plain assignability between concrete
//! types is delegated to the [`TypeSystem`].
//!
//! Type arguments are compared pairwise by kind:
//!
//! | receiver \ payload | actual | type variable |
//! |---|---|---|
//! | actual | same raw type (recursing into parameterized arguments) | actual within the variable's bounds |
//! | wildcard | payload within the wildcard's bounds | bounds overlap, super bound within the variable's bounds |
//! | type variable | error | receiver bounds within payload bounds |

use std::sync::Arc;

use bindery_types::{
    condense, condensed_bounds, is_unbounded_type_var, DeclaredType, TypeDescriptor, TypeSystem,
    WildcardType,
};

use crate::{InvalidTypeError, InvalidTypeReason};

const TARGET: &str = "bindery.assignability";

#[derive(Clone)]
pub struct AssignabilityEngine {
    types: Arc<dyn TypeSystem>,
    max_depth: usize,
}

impl AssignabilityEngine {
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    pub fn new(types: Arc<dyn TypeSystem>) -> Self {
        Self {
            types,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit the descriptor nesting the engine will descend into (minimum 1).
    ///
    /// Nesting is counted like [`bindery_types::helpers::type_depth`]: a receiver whose
    /// `type_depth` equals the limit is still matched.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn types(&self) -> &dyn TypeSystem {
        self.types.as_ref()
    }

    pub(crate) fn types_arc(&self) -> &Arc<dyn TypeSystem> {
        &self.types
    }

    /// Whether `payload` can be injected where `receiver` is required.
    ///
    /// Both types must be primitive, array, declared or type-variable descriptors.
    pub fn matches(
        &self,
        receiver: &TypeDescriptor,
        payload: &TypeDescriptor,
    ) -> Result<bool, InvalidTypeError> {
        self.matches_at(receiver, payload, 1)
    }

    /// The generics part of [`AssignabilityEngine::matches`] for two declared types.
    pub fn assignable(
        &self,
        receiver: &DeclaredType,
        payload: &DeclaredType,
    ) -> Result<bool, InvalidTypeError> {
        self.assignable_at(receiver, payload, 1)
    }

    fn check_depth(&self, ty: &TypeDescriptor, depth: usize) -> Result<(), InvalidTypeError> {
        if depth > self.max_depth {
            tracing::debug!(
                target: TARGET,
                ty = %ty,
                max_depth = self.max_depth,
                "type nesting exceeds the configured limit"
            );
            return Err(InvalidTypeError::new(ty, InvalidTypeReason::DepthExceeded));
        }
        Ok(())
    }

    fn matches_at(
        &self,
        receiver: &TypeDescriptor,
        payload: &TypeDescriptor,
        depth: usize,
    ) -> Result<bool, InvalidTypeError> {
        self.check_depth(receiver, depth)?;
        for ty in [receiver, payload] {
            if !ty.is_top_level_kind() {
                tracing::debug!(target: TARGET, ty = %ty, "illegal top-level type kind");
                return Err(InvalidTypeError::illegal_kind(ty));
            }
        }

        if self.types.type_equals(receiver, payload) {
            return Ok(true);
        }

        let matched = match receiver {
            TypeDescriptor::Primitive(kind) => payload.unboxed() == Some(*kind),
            TypeDescriptor::Array(_) => self.array_elements_identical(receiver, payload),
            TypeDescriptor::Declared(declared) => match payload {
                TypeDescriptor::Primitive(kind) => receiver.unboxed() == Some(*kind),
                TypeDescriptor::Declared(payload) => {
                    self.assignable_at(declared, payload, depth)?
                }
                _ => false,
            },
            // A type variable only matches itself.
            TypeDescriptor::TypeVariable(_) => false,
            TypeDescriptor::Wildcard(_) | TypeDescriptor::Intersection(_) => {
                return Err(InvalidTypeError::illegal_kind(receiver));
            }
        };
        Ok(matched)
    }

    /// Arrays match when their element types are identical all the way down.
    fn array_elements_identical(
        &self,
        receiver: &TypeDescriptor,
        payload: &TypeDescriptor,
    ) -> bool {
        match (receiver, payload) {
            (TypeDescriptor::Array(receiver), TypeDescriptor::Array(payload)) => {
                self.array_elements_identical(receiver, payload)
            }
            (TypeDescriptor::Array(_), _) | (_, TypeDescriptor::Array(_)) => false,
            (receiver, payload) => self.types.type_equals(receiver, payload),
        }
    }

    fn raw_forms_equal(&self, receiver: &DeclaredType, payload: &DeclaredType) -> bool {
        let receiver = TypeDescriptor::raw(receiver.element.clone());
        let payload = TypeDescriptor::raw(payload.element.clone());
        self.types.type_equals(
            &self.types.raw_form(&receiver),
            &self.types.raw_form(&payload),
        )
    }

    /// An argument that accepts anything: an unbounded type variable or the top type.
    fn is_unconstrained(&self, arg: &TypeDescriptor) -> bool {
        is_unbounded_type_var(arg) || self.types.is_top_type(arg)
    }

    fn assignable_at(
        &self,
        receiver: &DeclaredType,
        payload: &DeclaredType,
        depth: usize,
    ) -> Result<bool, InvalidTypeError> {
        match (receiver.is_parameterized(), payload.is_parameterized()) {
            // Raw or non-generic receiver: the payload's arguments must not constrain anything.
            (false, true) => Ok(self.raw_forms_equal(receiver, payload)
                && payload.args.iter().all(|arg| self.is_unconstrained(arg))),
            (true, false) => Ok(self.raw_forms_equal(receiver, payload)
                && receiver.args.iter().all(|arg| self.is_unconstrained(arg))),
            (true, true) => {
                if !self.raw_forms_equal(receiver, payload) {
                    return Ok(false);
                }
                if receiver.args.len() != payload.args.len() {
                    let ty = TypeDescriptor::Declared(payload.clone());
                    return Err(InvalidTypeError::new(&ty, InvalidTypeReason::ArityMismatch));
                }
                for (receiver_arg, payload_arg) in receiver.args.iter().zip(&payload.args) {
                    if !self.arguments_match(receiver_arg, payload_arg, depth + 1)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (false, false) => Ok(false),
        }
    }

    fn arguments_match(
        &self,
        receiver: &TypeDescriptor,
        payload: &TypeDescriptor,
        depth: usize,
    ) -> Result<bool, InvalidTypeError> {
        self.check_depth(receiver, depth)?;

        match (receiver, payload) {
            (r, p) if r.is_actual() && p.is_actual() => {
                let same_raw = self
                    .types
                    .type_equals(&self.types.raw_form(r), &self.types.raw_form(p));
                if !same_raw {
                    return Ok(false);
                }
                if r.yields_raw_type() || p.yields_raw_type() {
                    // Same nesting level; `assignable_at` adds one per argument list.
                    return self.matches_at(r, p, depth);
                }
                Ok(true)
            }
            (r, TypeDescriptor::TypeVariable(_)) if r.is_actual() => {
                let bounds = condensed_bounds(payload);
                Ok(bounds.iter().all(|bound| self.types.is_assignable(r, bound)))
            }
            (TypeDescriptor::Wildcard(wildcard), p) if p.is_actual() => {
                Ok(self.wildcard_admits_actual(wildcard, p))
            }
            (TypeDescriptor::Wildcard(wildcard), TypeDescriptor::TypeVariable(_)) => {
                Ok(self.wildcard_admits_type_var(wildcard, &condensed_bounds(payload)))
            }
            (TypeDescriptor::TypeVariable(_), TypeDescriptor::TypeVariable(_)) => Ok(self
                .bounds_match(&condensed_bounds(payload), &condensed_bounds(receiver))),
            _ => {
                tracing::debug!(
                    target: TARGET,
                    receiver = %receiver,
                    payload = %payload,
                    "unsupported type argument pairing"
                );
                Err(InvalidTypeError::new(
                    payload,
                    InvalidTypeReason::UnsupportedPairing,
                ))
            }
        }
    }

    /// `? extends E super S` admits `p` when `p <: E` and `S <: p`.
    fn wildcard_admits_actual(&self, wildcard: &WildcardType, payload: &TypeDescriptor) -> bool {
        let within_upper = wildcard_extends(wildcard)
            .iter()
            .all(|bound| self.types.is_assignable(payload, bound));
        let within_lower = wildcard_super(wildcard)
            .iter()
            .all(|bound| self.types.is_assignable(bound, payload));
        within_upper && within_lower
    }

    fn wildcard_admits_type_var(&self, wildcard: &WildcardType, bounds: &[TypeDescriptor]) -> bool {
        let mut upper = wildcard_extends(wildcard);
        if upper.is_empty() {
            upper.push(self.types.top_type());
        }
        let overlap = self.bounds_match(&upper, bounds) || self.bounds_match(bounds, &upper);
        let within_lower = wildcard_super(wildcard).iter().all(|lower| {
            bounds
                .iter()
                .all(|bound| self.types.is_assignable(lower, bound))
        });
        overlap && within_lower
    }

    /// Every bound in `upper` is satisfied by at least one bound in `stricter`.
    fn bounds_match(&self, upper: &[TypeDescriptor], stricter: &[TypeDescriptor]) -> bool {
        upper.iter().all(|upper_bound| {
            stricter
                .iter()
                .any(|bound| self.types.is_assignable(bound, upper_bound))
        })
    }
}

fn wildcard_extends(wildcard: &WildcardType) -> Vec<TypeDescriptor> {
    wildcard
        .extends
        .as_deref()
        .map(|bound| condense(std::slice::from_ref(bound)))
        .unwrap_or_default()
}

fn wildcard_super(wildcard: &WildcardType) -> Vec<TypeDescriptor> {
    wildcard
        .super_bound
        .as_deref()
        .map(|bound| condense(std::slice::from_ref(bound)))
        .unwrap_or_default()
}
