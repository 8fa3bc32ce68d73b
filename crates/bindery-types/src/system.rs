use crate::{TypeDescriptor, TypeIdentity};

/// The type-system queries the resolver consumes.
///
/// The resolver never walks class hierarchies itself: erasure, genericity, plain (non-generic)
/// assignability and supertype closures are all answered by an implementation of this trait.
/// Implementations must be pure; the resolver caches results derived from them.
pub trait TypeSystem: Send + Sync {
    /// Structural/canonical equality used for "identical type" checks.
    fn type_equals(&self, a: &TypeDescriptor, b: &TypeDescriptor) -> bool {
        a == b
    }

    /// Erasure of `ty` (`List<String>` -> `List`, `List<String>[]` -> `List[]`).
    fn raw_form(&self, ty: &TypeDescriptor) -> TypeDescriptor {
        ty.erasure()
    }

    /// Whether the declaration identified by `element` declares type parameters.
    fn is_generic(&self, element: &TypeIdentity) -> bool {
        element.is_generic()
    }

    /// Plain Java assignability between two concrete types, ignoring type arguments.
    ///
    /// Argument order is payload first: `is_assignable(ArrayList, List)` is `true`.
    fn is_assignable(&self, payload: &TypeDescriptor, receiver: &TypeDescriptor) -> bool;

    /// All types a value of `ty` can be used as: `ty` itself followed by its supertypes.
    fn type_closure(&self, ty: &TypeDescriptor) -> Vec<TypeDescriptor>;

    /// The universal top type (`java.lang.Object`).
    fn top_type(&self) -> TypeDescriptor {
        TypeDescriptor::object()
    }

    fn is_top_type(&self, ty: &TypeDescriptor) -> bool {
        self.type_equals(ty, &self.top_type())
    }
}
