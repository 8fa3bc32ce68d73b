//! Java type descriptors and the type-system queries Bindery's resolver is built on.
//!
//! [`TypeDescriptor`] is a closed, structurally compared model of the types that appear in
//! injection points and candidate type closures. [`TypeSystem`] is the provider interface the
//! resolver consumes (erasure, plain assignability, supertype closures); [`TypeStore`] is an
//! in-memory implementation over a set of class declarations.

mod descriptor;
pub mod helpers;
mod store;
mod system;
pub mod well_known;

pub use descriptor::{
    DeclaredType, PrimitiveKind, TypeDescriptor, TypeIdentity, TypeKind, TypeVariable,
    WildcardType,
};
pub use helpers::{condense, condensed_bounds, is_unbounded_type_var, substitute};
pub use store::{ClassDecl, ClassKind, TypeParamDecl, TypeStore};
pub use system::TypeSystem;
