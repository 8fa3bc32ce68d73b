use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::helpers::{condensed_bounds, substitute};
use crate::{well_known, DeclaredType, TypeDescriptor, TypeIdentity, TypeSystem};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Interface,
}

/// A declared type parameter, e.g. `T extends Number & Comparable<T>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeParamDecl {
    pub name: SmolStr,
    /// Empty means bounded only by `java.lang.Object`.
    #[serde(default)]
    pub bounds: Vec<TypeDescriptor>,
}

impl TypeParamDecl {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn bounded(name: impl Into<SmolStr>, bounds: Vec<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }

    /// The type variable this parameter introduces.
    pub fn as_type_var(&self) -> TypeDescriptor {
        let bound = match self.bounds.as_slice() {
            [] => TypeDescriptor::object(),
            [single] => single.clone(),
            many => TypeDescriptor::intersection(many.to_vec()),
        };
        TypeDescriptor::type_var(self.name.clone(), bound)
    }
}

/// A class or interface declaration.
///
/// Supertypes are written in terms of the declaration's own type variables, e.g. `ArrayList<E>`
/// declares `super_class = AbstractList<E>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: SmolStr,
    pub kind: ClassKind,
    #[serde(default)]
    pub type_params: Vec<TypeParamDecl>,
    #[serde(default)]
    pub super_class: Option<TypeDescriptor>,
    #[serde(default)]
    pub interfaces: Vec<TypeDescriptor>,
}

impl ClassDecl {
    pub fn class(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Class,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<SmolStr>) -> Self {
        Self {
            kind: ClassKind::Interface,
            ..Self::class(name)
        }
    }

    pub fn with_type_params(mut self, params: Vec<TypeParamDecl>) -> Self {
        self.type_params = params;
        self
    }

    pub fn extends(mut self, super_class: TypeDescriptor) -> Self {
        self.super_class = Some(super_class);
        self
    }

    pub fn implements(mut self, interface: TypeDescriptor) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn identity(&self) -> TypeIdentity {
        TypeIdentity::new(self.name.clone(), self.type_params.len())
    }

    /// The declaration parameterized by its own type variables (`List<E>`).
    pub fn generic_self(&self) -> TypeDescriptor {
        TypeDescriptor::declared(
            self.identity(),
            self.type_params
                .iter()
                .map(TypeParamDecl::as_type_var)
                .collect(),
        )
    }
}

/// In-memory [`TypeSystem`] backed by a set of class declarations.
///
/// Unknown classes are treated as direct subclasses of `java.lang.Object`.
#[derive(Clone, Debug)]
pub struct TypeStore {
    classes: HashMap<SmolStr, ClassDecl>,
}

impl Default for TypeStore {
    /// A store that knows `java.lang.Object` and the array supertypes.
    fn default() -> Self {
        let mut store = Self {
            classes: HashMap::new(),
        };
        store.define(ClassDecl::class(well_known::OBJECT));
        store.define(ClassDecl::interface(well_known::CLONEABLE));
        store.define(ClassDecl::interface(well_known::SERIALIZABLE));
        store
    }
}

impl TypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with the `java.lang` and `java.util` types commonly seen in injection
    /// points: wrappers, `String`, `Number`, `Comparable`, and the core collection interfaces with
    /// one implementation each.
    pub fn with_minimal_jdk() -> Self {
        let mut store = Self::default();

        let e = || TypeDescriptor::unbounded_type_var("E");
        let k = || TypeDescriptor::unbounded_type_var("K");
        let v = || TypeDescriptor::unbounded_type_var("V");
        let generic = |name: &str, args: Vec<TypeDescriptor>| {
            TypeDescriptor::declared(TypeIdentity::new(name, args.len()), args)
        };
        let serializable = TypeDescriptor::class(well_known::SERIALIZABLE);
        let cloneable = TypeDescriptor::class(well_known::CLONEABLE);

        store.define(ClassDecl::interface(well_known::CHAR_SEQUENCE));
        store.define(
            ClassDecl::interface(well_known::COMPARABLE)
                .with_type_params(vec![TypeParamDecl::new("T")]),
        );
        store.define(
            ClassDecl::class(well_known::STRING)
                .implements(serializable.clone())
                .implements(generic(
                    well_known::COMPARABLE,
                    vec![TypeDescriptor::class(well_known::STRING)],
                ))
                .implements(TypeDescriptor::class(well_known::CHAR_SEQUENCE)),
        );
        store.define(ClassDecl::class(well_known::NUMBER).implements(serializable.clone()));

        for kind in crate::PrimitiveKind::ALL {
            let name = kind.wrapper_name();
            let mut decl = ClassDecl::class(name);
            if !matches!(
                kind,
                crate::PrimitiveKind::Boolean | crate::PrimitiveKind::Char
            ) {
                decl = decl.extends(TypeDescriptor::class(well_known::NUMBER));
            }
            decl = decl
                .implements(serializable.clone())
                .implements(generic(well_known::COMPARABLE, vec![kind.wrapper()]));
            store.define(decl);
        }

        store.define(
            ClassDecl::interface(well_known::ITERABLE).with_type_params(vec![TypeParamDecl::new("T")]),
        );
        store.define(
            ClassDecl::interface(well_known::COLLECTION)
                .with_type_params(vec![TypeParamDecl::new("E")])
                .implements(generic(well_known::ITERABLE, vec![e()])),
        );
        store.define(
            ClassDecl::interface(well_known::LIST)
                .with_type_params(vec![TypeParamDecl::new("E")])
                .implements(generic(well_known::COLLECTION, vec![e()])),
        );
        store.define(
            ClassDecl::interface(well_known::SET)
                .with_type_params(vec![TypeParamDecl::new("E")])
                .implements(generic(well_known::COLLECTION, vec![e()])),
        );
        store.define(
            ClassDecl::class(ABSTRACT_COLLECTION)
                .with_type_params(vec![TypeParamDecl::new("E")])
                .implements(generic(well_known::COLLECTION, vec![e()])),
        );
        store.define(
            ClassDecl::class(ABSTRACT_LIST)
                .with_type_params(vec![TypeParamDecl::new("E")])
                .extends(generic(ABSTRACT_COLLECTION, vec![e()]))
                .implements(generic(well_known::LIST, vec![e()])),
        );
        store.define(
            ClassDecl::class(well_known::ARRAY_LIST)
                .with_type_params(vec![TypeParamDecl::new("E")])
                .extends(generic(ABSTRACT_LIST, vec![e()]))
                .implements(generic(well_known::LIST, vec![e()]))
                .implements(cloneable.clone())
                .implements(serializable.clone()),
        );
        store.define(
            ClassDecl::class(ABSTRACT_SET)
                .with_type_params(vec![TypeParamDecl::new("E")])
                .extends(generic(ABSTRACT_COLLECTION, vec![e()]))
                .implements(generic(well_known::SET, vec![e()])),
        );
        store.define(
            ClassDecl::class(well_known::HASH_SET)
                .with_type_params(vec![TypeParamDecl::new("E")])
                .extends(generic(ABSTRACT_SET, vec![e()]))
                .implements(generic(well_known::SET, vec![e()]))
                .implements(cloneable.clone())
                .implements(serializable.clone()),
        );
        store.define(
            ClassDecl::interface(well_known::MAP)
                .with_type_params(vec![TypeParamDecl::new("K"), TypeParamDecl::new("V")]),
        );
        store.define(
            ClassDecl::class(ABSTRACT_MAP)
                .with_type_params(vec![TypeParamDecl::new("K"), TypeParamDecl::new("V")])
                .implements(generic(well_known::MAP, vec![k(), v()])),
        );
        store.define(
            ClassDecl::class(well_known::HASH_MAP)
                .with_type_params(vec![TypeParamDecl::new("K"), TypeParamDecl::new("V")])
                .extends(generic(ABSTRACT_MAP, vec![k(), v()]))
                .implements(generic(well_known::MAP, vec![k(), v()]))
                .implements(cloneable)
                .implements(serializable),
        );

        store
    }

    /// Insert or replace a declaration, returning its identity.
    pub fn define(&mut self, decl: ClassDecl) -> TypeIdentity {
        let identity = decl.identity();
        self.classes.insert(decl.name.clone(), decl);
        identity
    }

    pub fn class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(name)
    }

    pub fn identity(&self, name: &str) -> Option<TypeIdentity> {
        self.class(name).map(ClassDecl::identity)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// A usage of `name` with `args`. The identity's arity comes from the declaration when known.
    pub fn declared(&self, name: &str, args: Vec<TypeDescriptor>) -> TypeDescriptor {
        let arity = self
            .class(name)
            .map(|decl| decl.type_params.len())
            .unwrap_or(args.len());
        TypeDescriptor::declared(TypeIdentity::new(name, arity), args)
    }

    /// The raw (or non-generic) usage of `name`.
    pub fn raw(&self, name: &str) -> TypeDescriptor {
        self.declared(name, Vec::new())
    }

    /// Direct supertypes of a declared type with its type arguments applied.
    ///
    /// Raw usages have raw supertypes. Interfaces and classes without a superclass get an
    /// implicit `java.lang.Object`.
    fn direct_supertypes(&self, declared: &DeclaredType) -> Vec<TypeDescriptor> {
        if declared.element.name == well_known::OBJECT {
            return Vec::new();
        }
        let Some(decl) = self.class(&declared.element.name) else {
            return vec![TypeDescriptor::object()];
        };

        let raw = declared.args.len() != decl.type_params.len();
        let subst: HashMap<SmolStr, TypeDescriptor> = if raw {
            HashMap::new()
        } else {
            decl.type_params
                .iter()
                .map(|param| param.name.clone())
                .zip(declared.args.iter().cloned())
                .collect()
        };
        let apply = |ty: &TypeDescriptor| {
            if raw {
                ty.erasure()
            } else {
                substitute(ty, &subst)
            }
        };

        let mut out = Vec::with_capacity(decl.interfaces.len() + 1);
        match &decl.super_class {
            Some(super_class) => out.push(apply(super_class)),
            None => out.push(TypeDescriptor::object()),
        }
        out.extend(decl.interfaces.iter().map(apply));
        out
    }

    fn declared_closure(&self, root: &TypeDescriptor) -> Vec<TypeDescriptor> {
        let mut out = Vec::new();
        let mut seen: HashSet<TypeDescriptor> = HashSet::new();
        let mut queue: VecDeque<TypeDescriptor> = VecDeque::new();
        queue.push_back(root.clone());

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let TypeDescriptor::Declared(declared) = &current {
                queue.extend(self.direct_supertypes(declared));
            }
            // `Object` goes last so closures read from most to least specific.
            if !current.is_object() {
                out.push(current);
            }
        }

        out.push(TypeDescriptor::object());
        out
    }

    /// Whether the class named `sub` is `sup` or inherits from it, ignoring type arguments.
    fn is_raw_subtype(&self, sub: &str, sup: &str) -> bool {
        if sub == sup || sup == well_known::OBJECT {
            return true;
        }
        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(sub);

        while let Some(current) = queue.pop_front() {
            if current == sup {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            let Some(decl) = self.class(current) else {
                continue;
            };
            for super_type in decl.super_class.iter().chain(decl.interfaces.iter()) {
                if let Some(declared) = super_type.as_declared() {
                    queue.push_back(declared.element.name.as_str());
                }
            }
        }
        false
    }
}

const ABSTRACT_COLLECTION: &str = "java.util.AbstractCollection";
const ABSTRACT_LIST: &str = "java.util.AbstractList";
const ABSTRACT_SET: &str = "java.util.AbstractSet";
const ABSTRACT_MAP: &str = "java.util.AbstractMap";

impl TypeSystem for TypeStore {
    fn is_assignable(&self, payload: &TypeDescriptor, receiver: &TypeDescriptor) -> bool {
        if payload == receiver {
            return true;
        }

        match (payload, receiver) {
            (_, TypeDescriptor::Intersection(parts)) => {
                parts.iter().all(|part| self.is_assignable(payload, part))
            }
            (TypeDescriptor::Intersection(parts), _) => {
                parts.iter().any(|part| self.is_assignable(part, receiver))
            }
            (TypeDescriptor::TypeVariable(tv), _) => condensed_bounds(&tv.bound)
                .iter()
                .any(|bound| self.is_assignable(bound, receiver)),
            (TypeDescriptor::Wildcard(_), _) | (_, TypeDescriptor::Wildcard(_)) => {
                self.is_assignable(&payload.erasure(), &receiver.erasure())
            }
            (_, TypeDescriptor::TypeVariable(_)) => false,
            (TypeDescriptor::Primitive(a), TypeDescriptor::Primitive(b)) => a == b,
            (TypeDescriptor::Primitive(_), _) | (_, TypeDescriptor::Primitive(_)) => false,
            (_, receiver) if receiver.erasure().is_object() => true,
            (TypeDescriptor::Array(payload_elem), TypeDescriptor::Array(receiver_elem)) => {
                match (payload_elem.as_ref(), receiver_elem.as_ref()) {
                    (TypeDescriptor::Primitive(a), TypeDescriptor::Primitive(b)) => a == b,
                    (p, r) if p.is_reference() && r.is_reference() => self.is_assignable(p, r),
                    _ => false,
                }
            }
            (TypeDescriptor::Array(_), TypeDescriptor::Declared(declared)) => {
                well_known::ARRAY_SUPERTYPES.contains(&declared.element.name.as_str())
            }
            (TypeDescriptor::Declared(_), TypeDescriptor::Array(_)) => false,
            (TypeDescriptor::Declared(p), TypeDescriptor::Declared(r)) => {
                self.is_raw_subtype(&p.element.name, &r.element.name)
            }
        }
    }

    fn type_closure(&self, ty: &TypeDescriptor) -> Vec<TypeDescriptor> {
        match ty {
            TypeDescriptor::Primitive(_) => vec![ty.clone(), TypeDescriptor::object()],
            TypeDescriptor::Array(_) => {
                let mut out = vec![ty.clone()];
                out.extend(
                    well_known::ARRAY_SUPERTYPES
                        .iter()
                        .map(|name| TypeDescriptor::class(*name)),
                );
                out.push(TypeDescriptor::object());
                out
            }
            TypeDescriptor::Declared(_) => self.declared_closure(ty),
            TypeDescriptor::TypeVariable(tv) => {
                let mut out = vec![ty.clone()];
                for bound in condensed_bounds(&tv.bound) {
                    for super_type in self.type_closure(&bound) {
                        if !out.contains(&super_type) {
                            out.push(super_type);
                        }
                    }
                }
                move_object_last(&mut out);
                out
            }
            TypeDescriptor::Intersection(parts) => {
                let mut out = Vec::new();
                for part in parts {
                    for super_type in self.type_closure(part) {
                        if !out.contains(&super_type) {
                            out.push(super_type);
                        }
                    }
                }
                move_object_last(&mut out);
                out
            }
            TypeDescriptor::Wildcard(_) => self.type_closure(&ty.erasure()),
        }
    }
}

fn move_object_last(types: &mut Vec<TypeDescriptor>) {
    if let Some(idx) = types.iter().position(TypeDescriptor::is_object) {
        let object = types.remove(idx);
        types.push(object);
    }
}
