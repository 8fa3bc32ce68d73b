use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::well_known;

/// Java primitive types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Char,
        PrimitiveKind::Double,
        PrimitiveKind::Float,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Short,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Short => "short",
        }
    }

    /// Binary name of the canonical wrapper class (`int` -> `java.lang.Integer`).
    pub fn wrapper_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => well_known::BOOLEAN,
            PrimitiveKind::Byte => well_known::BYTE,
            PrimitiveKind::Char => well_known::CHARACTER,
            PrimitiveKind::Double => well_known::DOUBLE,
            PrimitiveKind::Float => well_known::FLOAT,
            PrimitiveKind::Int => well_known::INTEGER,
            PrimitiveKind::Long => well_known::LONG,
            PrimitiveKind::Short => well_known::SHORT,
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    pub fn from_wrapper_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.wrapper_name() == name)
    }

    /// The wrapper class as a non-generic declared type.
    pub fn wrapper(self) -> TypeDescriptor {
        TypeDescriptor::class(self.wrapper_name())
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Identifies a class or interface declaration: its binary name plus the number of type
/// parameters it declares.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeIdentity {
    pub name: SmolStr,
    #[serde(default)]
    pub arity: usize,
}

impl TypeIdentity {
    pub fn new(name: impl Into<SmolStr>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }

    pub fn non_generic(name: impl Into<SmolStr>) -> Self {
        Self::new(name, 0)
    }

    pub fn is_generic(&self) -> bool {
        self.arity > 0
    }

    /// `java.util.Map$Entry` -> `Entry`.
    pub fn simple_name(&self) -> &str {
        let tail = self.name.rsplit('.').next().unwrap_or(self.name.as_str());
        tail.rsplit('$').next().unwrap_or(tail)
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A (possibly raw) usage of a class or interface.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclaredType {
    pub element: TypeIdentity,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeDescriptor>,
}

impl DeclaredType {
    /// Has at least one type argument.
    pub fn is_parameterized(&self) -> bool {
        !self.args.is_empty()
    }

    /// A generic declaration used without type arguments.
    pub fn is_raw(&self) -> bool {
        self.args.is_empty() && self.element.is_generic()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeVariable {
    pub name: SmolStr,
    /// Upper bound; an [`TypeDescriptor::Intersection`] for `T extends A & B`.
    pub bound: Box<TypeDescriptor>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WildcardType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<Box<TypeDescriptor>>,
    #[serde(default, rename = "super", skip_serializing_if = "Option::is_none")]
    pub super_bound: Option<Box<TypeDescriptor>>,
}

/// Immutable, structurally compared representation of a Java type.
///
/// Only [`TypeDescriptor::Primitive`], [`TypeDescriptor::Array`], [`TypeDescriptor::Declared`]
/// and [`TypeDescriptor::TypeVariable`] may appear at the top level of a match; wildcards and
/// intersections only occur nested inside type arguments or bounds.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    Array(Box<TypeDescriptor>),
    Declared(DeclaredType),
    TypeVariable(TypeVariable),
    Wildcard(WildcardType),
    Intersection(Vec<TypeDescriptor>),
}

/// Discriminant of a [`TypeDescriptor`], used in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    Array,
    Declared,
    TypeVariable,
    Wildcard,
    Intersection,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeKind::Primitive => "primitive",
            TypeKind::Array => "array",
            TypeKind::Declared => "declared",
            TypeKind::TypeVariable => "type variable",
            TypeKind::Wildcard => "wildcard",
            TypeKind::Intersection => "intersection",
        })
    }
}

impl TypeDescriptor {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeDescriptor::Primitive(kind)
    }

    pub fn array(element: TypeDescriptor) -> Self {
        TypeDescriptor::Array(Box::new(element))
    }

    /// A non-generic class usage, e.g. `java.lang.String`.
    pub fn class(name: impl Into<SmolStr>) -> Self {
        TypeDescriptor::Declared(DeclaredType {
            element: TypeIdentity::non_generic(name),
            args: Vec::new(),
        })
    }

    pub fn declared(element: TypeIdentity, args: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Declared(DeclaredType { element, args })
    }

    /// A generic declaration used without type arguments.
    pub fn raw(element: TypeIdentity) -> Self {
        TypeDescriptor::declared(element, Vec::new())
    }

    pub fn type_var(name: impl Into<SmolStr>, bound: TypeDescriptor) -> Self {
        TypeDescriptor::TypeVariable(TypeVariable {
            name: name.into(),
            bound: Box::new(bound),
        })
    }

    /// A type variable bounded only by `java.lang.Object`.
    pub fn unbounded_type_var(name: impl Into<SmolStr>) -> Self {
        TypeDescriptor::type_var(name, TypeDescriptor::object())
    }

    /// `?`
    pub fn wildcard() -> Self {
        TypeDescriptor::Wildcard(WildcardType::default())
    }

    /// `? extends bound`
    pub fn wildcard_extends(bound: TypeDescriptor) -> Self {
        TypeDescriptor::Wildcard(WildcardType {
            extends: Some(Box::new(bound)),
            super_bound: None,
        })
    }

    /// `? super bound`
    pub fn wildcard_super(bound: TypeDescriptor) -> Self {
        TypeDescriptor::Wildcard(WildcardType {
            extends: None,
            super_bound: Some(Box::new(bound)),
        })
    }

    pub fn intersection(bounds: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Intersection(bounds)
    }

    pub fn object() -> Self {
        TypeDescriptor::class(well_known::OBJECT)
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            TypeDescriptor::Primitive(_) => TypeKind::Primitive,
            TypeDescriptor::Array(_) => TypeKind::Array,
            TypeDescriptor::Declared(_) => TypeKind::Declared,
            TypeDescriptor::TypeVariable(_) => TypeKind::TypeVariable,
            TypeDescriptor::Wildcard(_) => TypeKind::Wildcard,
            TypeDescriptor::Intersection(_) => TypeKind::Intersection,
        }
    }

    pub fn as_declared(&self) -> Option<&DeclaredType> {
        match self {
            TypeDescriptor::Declared(declared) => Some(declared),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            TypeDescriptor::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Kinds that may be a receiver or payload of a top-level match.
    pub fn is_top_level_kind(&self) -> bool {
        !matches!(
            self,
            TypeDescriptor::Wildcard(_) | TypeDescriptor::Intersection(_)
        )
    }

    /// Neither a wildcard nor a type variable (nor an intersection).
    pub fn is_actual(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Primitive(_) | TypeDescriptor::Array(_) | TypeDescriptor::Declared(_)
        )
    }

    pub fn is_reference(&self) -> bool {
        !matches!(self, TypeDescriptor::Primitive(_))
    }

    pub fn is_parameterized(&self) -> bool {
        matches!(self, TypeDescriptor::Declared(declared) if declared.is_parameterized())
    }

    /// `java.lang.Object` used as a class type.
    pub fn is_object(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Declared(DeclaredType { element, args })
                if args.is_empty() && element.name == well_known::OBJECT
        )
    }

    /// Whether erasing this type changes it: a parameterized type, or an array whose (innermost)
    /// element type is parameterized.
    pub fn yields_raw_type(&self) -> bool {
        match self {
            TypeDescriptor::Declared(declared) => declared.is_parameterized(),
            TypeDescriptor::Array(element) => element.yields_raw_type(),
            _ => false,
        }
    }

    /// Innermost element type of a (possibly nested) array; `self` for non-arrays.
    pub fn innermost_element(&self) -> &TypeDescriptor {
        let mut current = self;
        while let TypeDescriptor::Array(element) = current {
            current = element;
        }
        current
    }

    /// Primitive kind this declared type wraps, if it is a wrapper class.
    pub fn unboxed(&self) -> Option<PrimitiveKind> {
        match self {
            TypeDescriptor::Declared(DeclaredType { element, args }) if args.is_empty() => {
                PrimitiveKind::from_wrapper_name(&element.name)
            }
            _ => None,
        }
    }

    /// Replace primitives with their wrapper class; every other kind is returned unchanged.
    pub fn boxed(&self) -> TypeDescriptor {
        match self {
            TypeDescriptor::Primitive(kind) => kind.wrapper(),
            other => other.clone(),
        }
    }

    /// Java erasure (JLS 4.6).
    pub fn erasure(&self) -> TypeDescriptor {
        match self {
            TypeDescriptor::Primitive(_) => self.clone(),
            TypeDescriptor::Array(element) => TypeDescriptor::array(element.erasure()),
            TypeDescriptor::Declared(declared) => TypeDescriptor::raw(declared.element.clone()),
            TypeDescriptor::TypeVariable(tv) => tv.bound.erasure(),
            TypeDescriptor::Wildcard(wildcard) => match &wildcard.extends {
                Some(bound) => bound.erasure(),
                None => TypeDescriptor::object(),
            },
            TypeDescriptor::Intersection(parts) => parts
                .first()
                .map(TypeDescriptor::erasure)
                .unwrap_or_else(TypeDescriptor::object),
        }
    }
}

impl From<PrimitiveKind> for TypeDescriptor {
    fn from(kind: PrimitiveKind) -> Self {
        TypeDescriptor::Primitive(kind)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(kind) => write!(f, "{kind}"),
            TypeDescriptor::Array(element) => write!(f, "{element}[]"),
            TypeDescriptor::Declared(declared) => {
                write!(f, "{}", declared.element)?;
                if !declared.args.is_empty() {
                    f.write_str("<")?;
                    write_joined(f, &declared.args, ", ")?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeDescriptor::TypeVariable(tv) => {
                f.write_str(&tv.name)?;
                if !tv.bound.is_object() {
                    write!(f, " extends {}", tv.bound)?;
                }
                Ok(())
            }
            TypeDescriptor::Wildcard(wildcard) => {
                f.write_str("?")?;
                if let Some(bound) = &wildcard.extends {
                    write!(f, " extends {bound}")?;
                }
                if let Some(bound) = &wildcard.super_bound {
                    write!(f, " super {bound}")?;
                }
                Ok(())
            }
            TypeDescriptor::Intersection(parts) => write_joined(f, parts, " & "),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, types: &[TypeDescriptor], sep: &str) -> fmt::Result {
    for (idx, ty) in types.iter().enumerate() {
        if idx > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}
