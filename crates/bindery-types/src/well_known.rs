//! Binary names of the JDK types the resolver needs to know about.

pub const OBJECT: &str = "java.lang.Object";
pub const CLONEABLE: &str = "java.lang.Cloneable";
pub const SERIALIZABLE: &str = "java.io.Serializable";
pub const STRING: &str = "java.lang.String";
pub const CHAR_SEQUENCE: &str = "java.lang.CharSequence";
pub const COMPARABLE: &str = "java.lang.Comparable";
pub const NUMBER: &str = "java.lang.Number";

pub const BOOLEAN: &str = "java.lang.Boolean";
pub const BYTE: &str = "java.lang.Byte";
pub const CHARACTER: &str = "java.lang.Character";
pub const DOUBLE: &str = "java.lang.Double";
pub const FLOAT: &str = "java.lang.Float";
pub const INTEGER: &str = "java.lang.Integer";
pub const LONG: &str = "java.lang.Long";
pub const SHORT: &str = "java.lang.Short";

pub const ITERABLE: &str = "java.lang.Iterable";
pub const COLLECTION: &str = "java.util.Collection";
pub const LIST: &str = "java.util.List";
pub const ARRAY_LIST: &str = "java.util.ArrayList";
pub const SET: &str = "java.util.Set";
pub const HASH_SET: &str = "java.util.HashSet";
pub const MAP: &str = "java.util.Map";
pub const HASH_MAP: &str = "java.util.HashMap";

/// Supertypes every array type has besides `Object` (JLS 4.10.3).
pub const ARRAY_SUPERTYPES: [&str; 2] = [CLONEABLE, SERIALIZABLE];
