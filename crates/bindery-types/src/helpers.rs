use std::collections::HashMap;

use smol_str::SmolStr;

use crate::{DeclaredType, TypeDescriptor, TypeVariable, WildcardType};

/// Reduce a bound list to concrete bounds.
///
/// Type variables are replaced by their upper bound and intersections by their components,
/// recursively, until only primitive, array and declared types remain. Wildcards contribute their
/// `extends` bound (or nothing when unbounded). Order is preserved and duplicates are dropped.
///
/// Example: `[T extends Number & Comparable<T>]` condenses to `[Number, Comparable<T>]`.
pub fn condense(bounds: &[TypeDescriptor]) -> Vec<TypeDescriptor> {
    fn inner(ty: &TypeDescriptor, out: &mut Vec<TypeDescriptor>) {
        match ty {
            TypeDescriptor::TypeVariable(tv) => inner(&tv.bound, out),
            TypeDescriptor::Intersection(parts) => {
                for part in parts {
                    inner(part, out);
                }
            }
            TypeDescriptor::Wildcard(WildcardType { extends, .. }) => {
                if let Some(bound) = extends {
                    inner(bound, out);
                }
            }
            concrete => {
                if !out.contains(concrete) {
                    out.push(concrete.clone());
                }
            }
        }
    }

    let mut out = Vec::with_capacity(bounds.len());
    for bound in bounds {
        inner(bound, &mut out);
    }
    out
}

/// Concrete upper bounds of a single type (see [`condense`]).
pub fn condensed_bounds(ty: &TypeDescriptor) -> Vec<TypeDescriptor> {
    condense(std::slice::from_ref(ty))
}

/// A type variable whose only concrete bound is `java.lang.Object`.
pub fn is_unbounded_type_var(ty: &TypeDescriptor) -> bool {
    let TypeDescriptor::TypeVariable(tv) = ty else {
        return false;
    };
    condensed_bounds(&tv.bound)
        .iter()
        .all(TypeDescriptor::is_object)
}

/// Replace type variables by name.
///
/// Variables missing from `subst` are kept as-is (their bounds are still substituted).
pub fn substitute(ty: &TypeDescriptor, subst: &HashMap<SmolStr, TypeDescriptor>) -> TypeDescriptor {
    if subst.is_empty() {
        return ty.clone();
    }
    match ty {
        TypeDescriptor::Primitive(_) => ty.clone(),
        TypeDescriptor::Array(element) => TypeDescriptor::array(substitute(element, subst)),
        TypeDescriptor::Declared(DeclaredType { element, args }) => TypeDescriptor::declared(
            element.clone(),
            args.iter().map(|arg| substitute(arg, subst)).collect(),
        ),
        TypeDescriptor::TypeVariable(TypeVariable { name, bound }) => match subst.get(name) {
            Some(replacement) => replacement.clone(),
            None => TypeDescriptor::type_var(name.clone(), substitute(bound, subst)),
        },
        TypeDescriptor::Wildcard(WildcardType {
            extends,
            super_bound,
        }) => TypeDescriptor::Wildcard(WildcardType {
            extends: extends
                .as_ref()
                .map(|bound| Box::new(substitute(bound, subst))),
            super_bound: super_bound
                .as_ref()
                .map(|bound| Box::new(substitute(bound, subst))),
        }),
        TypeDescriptor::Intersection(parts) => TypeDescriptor::intersection(
            parts.iter().map(|part| substitute(part, subst)).collect(),
        ),
    }
}

/// Maximum nesting depth of a descriptor tree (a bare primitive is depth 1).
pub fn type_depth(ty: &TypeDescriptor) -> usize {
    let children = match ty {
        TypeDescriptor::Primitive(_) => 0,
        TypeDescriptor::Array(element) => type_depth(element),
        TypeDescriptor::Declared(declared) => {
            declared.args.iter().map(type_depth).max().unwrap_or(0)
        }
        TypeDescriptor::TypeVariable(tv) => type_depth(&tv.bound),
        TypeDescriptor::Wildcard(wildcard) => wildcard
            .extends
            .iter()
            .chain(wildcard.super_bound.iter())
            .map(|bound| type_depth(bound))
            .max()
            .unwrap_or(0),
        TypeDescriptor::Intersection(parts) => parts.iter().map(type_depth).max().unwrap_or(0),
    };
    children + 1
}
