//! Qualifier and interceptor-binding matching.
//!
//! Attributes are classified by their metadata rather than by a fixed kind: an attribute is a
//! qualifier when it is annotated with [`QUALIFIER_MARKER`], and an interceptor binding when it is
//! annotated with [`INTERCEPTOR_BINDING_MARKER`]. Attributes that are neither never affect
//! matching.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

pub const QUALIFIER_MARKER: &str = "jakarta.inject.Qualifier";
pub const INTERCEPTOR_BINDING_MARKER: &str = "jakarta.interceptor.InterceptorBinding";
pub const ANY_NAME: &str = "jakarta.enterprise.inject.Any";
pub const DEFAULT_NAME: &str = "jakarta.enterprise.inject.Default";
pub const NAMED_NAME: &str = "jakarta.inject.Named";

/// `@Any` as a qualifier.
pub static ANY: Lazy<Attribute> = Lazy::new(|| Attribute::qualifier(ANY_NAME));
/// `@Default`.
pub static DEFAULT: Lazy<Attribute> = Lazy::new(|| Attribute::qualifier(DEFAULT_NAME));
/// `@Any` as an interceptor binding: a candidate bound only to it accepts every binding set.
pub static ANY_INTERCEPTOR_BINDING: Lazy<Attribute> =
    Lazy::new(|| Attribute::interceptor_binding(ANY_NAME));

/// An annotation member value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Str(SmolStr),
    Enum { ty: SmolStr, constant: SmolStr },
    Array(Vec<AttributeValue>),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(value) => write!(f, "{value}"),
            AttributeValue::Int(value) => write!(f, "{value}"),
            AttributeValue::Str(value) => write!(f, "{value:?}"),
            AttributeValue::Enum { ty, constant } => write!(f, "{ty}.{constant}"),
            AttributeValue::Array(values) => {
                f.write_str("{")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.into())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributeMember {
    pub value: AttributeValue,
    /// Ignored when comparing attributes for matching (`@Nonbinding`).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nonbinding: bool,
}

/// A named marker, optionally tagged by other attributes and carrying member values.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Attribute {
    pub name: SmolStr,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub metadata: BTreeSet<Attribute>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub members: BTreeMap<SmolStr, AttributeMember>,
}

impl Attribute {
    /// An attribute with no metadata, which therefore never takes part in matching.
    pub fn marker(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            metadata: BTreeSet::new(),
            members: BTreeMap::new(),
        }
    }

    pub fn qualifier(name: impl Into<SmolStr>) -> Self {
        Self::marker(name).with_metadata(Attribute::marker(QUALIFIER_MARKER))
    }

    pub fn interceptor_binding(name: impl Into<SmolStr>) -> Self {
        Self::marker(name).with_metadata(Attribute::marker(INTERCEPTOR_BINDING_MARKER))
    }

    /// `@Named(value)`.
    pub fn named(value: &str) -> Self {
        Self::qualifier(NAMED_NAME).with_member("value", value)
    }

    pub fn with_metadata(mut self, attribute: Attribute) -> Self {
        self.metadata.insert(attribute);
        self
    }

    pub fn with_member(
        mut self,
        name: impl Into<SmolStr>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.members.insert(
            name.into(),
            AttributeMember {
                value: value.into(),
                nonbinding: false,
            },
        );
        self
    }

    pub fn with_nonbinding_member(
        mut self,
        name: impl Into<SmolStr>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.members.insert(
            name.into(),
            AttributeMember {
                value: value.into(),
                nonbinding: true,
            },
        );
        self
    }

    pub fn has_metadata(&self, name: &str) -> bool {
        self.metadata.iter().any(|meta| meta.name == name)
    }

    pub fn is_qualifier(&self) -> bool {
        self.has_metadata(QUALIFIER_MARKER)
    }

    pub fn is_interceptor_binding(&self) -> bool {
        self.has_metadata(INTERCEPTOR_BINDING_MARKER)
    }

    pub fn is_any(&self) -> bool {
        self.name == ANY_NAME
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_NAME
    }

    pub fn is_named(&self) -> bool {
        self.name == NAMED_NAME
    }

    /// Identity used for matching: the name plus every binding member.
    pub fn binding_key(&self) -> BindingKey<'_> {
        BindingKey {
            name: &self.name,
            members: self
                .members
                .iter()
                .filter(|(_, member)| !member.nonbinding)
                .map(|(name, member)| (name, &member.value))
                .collect(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if self.members.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (idx, (name, member)) in self.members.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name} = {}", member.value)?;
        }
        f.write_str(")")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct BindingKey<'a> {
    name: &'a str,
    members: Vec<(&'a SmolStr, &'a AttributeValue)>,
}

fn binding_keys<'a>(
    attributes: impl IntoIterator<Item = &'a Attribute>,
) -> BTreeSet<BindingKey<'a>> {
    attributes.into_iter().map(Attribute::binding_key).collect()
}

/// Qualifiers a candidate carries once the implicit ones are added: `@Any` always, and
/// `@Default` when it declares nothing besides `@Any`/`@Named`.
pub fn effective_qualifiers<'a>(declared: &[&'a Attribute]) -> BTreeSet<BindingKey<'a>> {
    let mut out = binding_keys(declared.iter().copied());
    out.insert(ANY.binding_key());
    if declared.iter().all(|q| q.is_any() || q.is_named()) {
        out.insert(DEFAULT.binding_key());
    }
    out
}

/// Whether a candidate with `candidate` qualifiers satisfies the `required` qualifiers.
///
/// An unqualified request only sees candidates whose qualifiers all come from the implicit
/// `{@Default, @Any}` set; `@Named` counts toward `@Default` for qualified requests only. A
/// candidate declaring exactly `@Any` matches every qualified request.
pub fn qualifiers_match(required: &[&Attribute], candidate: &[&Attribute]) -> bool {
    if required.is_empty() {
        return candidate.iter().all(|q| q.is_default() || q.is_any());
    }
    let effective = effective_qualifiers(candidate);
    if let [only] = candidate {
        if only.is_any() {
            return true;
        }
    }
    required
        .iter()
        .all(|q| effective.contains(&q.binding_key()))
}

/// Interceptor bindings require an exact set match unless the candidate is bound to the
/// any-binding only.
pub fn interceptor_bindings_match(required: &[&Attribute], candidate: &[&Attribute]) -> bool {
    if candidate.is_empty() {
        return required.is_empty();
    }
    if let [only] = candidate {
        if only.is_any() {
            return true;
        }
    }
    binding_keys(required.iter().copied()) == binding_keys(candidate.iter().copied())
}

/// Qualifier and interceptor-binding checks combined.
pub fn selects_attributes<'a, 'b>(
    required: impl IntoIterator<Item = &'a Attribute>,
    candidate: impl IntoIterator<Item = &'b Attribute>,
) -> bool {
    let (required_qualifiers, required_bindings) = partition(required);
    let (candidate_qualifiers, candidate_bindings) = partition(candidate);
    qualifiers_match(&required_qualifiers, &candidate_qualifiers)
        && interceptor_bindings_match(&required_bindings, &candidate_bindings)
}

fn partition<'a>(
    attributes: impl IntoIterator<Item = &'a Attribute>,
) -> (Vec<&'a Attribute>, Vec<&'a Attribute>) {
    let mut qualifiers = Vec::new();
    let mut bindings = Vec::new();
    for attribute in attributes {
        if attribute.is_qualifier() {
            qualifiers.push(attribute);
        } else if attribute.is_interceptor_binding() {
            bindings.push(attribute);
        }
    }
    (qualifiers, bindings)
}
