//! Typed-data schemas: named composite types with ordered, typed fields.
//!
//! A field type is kept as written (`"Person[]"`, `"uint"`) and parsed on
//! demand into a [`TypeRef`]. Parsing is purely syntactic; whether a
//! struct reference resolves is decided against a [`TypeSchema`].

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::SchemaError;

/// A primitive, inline-encodable field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    Address,
    Bool,
    /// `uint<bits>`. `None` is the bare `uint` alias (256 bits).
    Uint(Option<u16>),
    /// `int<bits>`. `None` is the bare `int` alias (256 bits).
    Int(Option<u16>),
    /// `bytes1` through `bytes32`.
    FixedBytes(u8),
    /// Dynamic `bytes`.
    Bytes,
    String,
}

/// How a value is folded into the buffer a getter hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingClass {
    /// Passed through to `abi.encode` as-is.
    Direct,
    /// Digested first, the digest is encoded.
    Hashed,
    /// Dispatched to a generated getter.
    Getter,
}

impl Scalar {
    /// Parse a scalar name.
    ///
    /// Returns `Ok(None)` for names that are not scalar-shaped, and an error
    /// for scalar-shaped names with an invalid width (`uint7`, `bytes33`).
    pub fn parse(name: &str) -> Result<Option<Self>, SchemaError> {
        let scalar = match name {
            "address" => Self::Address,
            "bool" => Self::Bool,
            "bytes" => Self::Bytes,
            "string" => Self::String,
            "uint" => Self::Uint(None),
            "int" => Self::Int(None),
            _ => {
                let invalid = || SchemaError::InvalidType(name.to_string());
                if let Some(width) = numeric_suffix(name, "uint") {
                    let bits = int_width(width).ok_or_else(invalid)?;
                    Self::Uint(Some(bits))
                } else if let Some(width) = numeric_suffix(name, "int") {
                    let bits = int_width(width).ok_or_else(invalid)?;
                    Self::Int(Some(bits))
                } else if let Some(width) = numeric_suffix(name, "bytes") {
                    match width.parse::<u8>() {
                        Ok(n) if (1..=32).contains(&n) && !width.starts_with('0') => {
                            Self::FixedBytes(n)
                        }
                        _ => return Err(invalid()),
                    }
                } else {
                    return Ok(None);
                }
            }
        };
        Ok(Some(scalar))
    }

    /// Integer width in bits, aliases resolved.
    pub fn bits(&self) -> Option<u16> {
        match self {
            Self::Uint(bits) | Self::Int(bits) => Some(bits.unwrap_or(256)),
            _ => None,
        }
    }

    pub fn class(&self) -> EncodingClass {
        match self {
            Self::Bytes => EncodingClass::Hashed,
            _ => EncodingClass::Direct,
        }
    }

    /// True for types `abi.encode` lays out in the dynamic tail.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::String | Self::Bytes)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => f.write_str("address"),
            Self::Bool => f.write_str("bool"),
            Self::Uint(None) => f.write_str("uint"),
            Self::Uint(Some(bits)) => write!(f, "uint{bits}"),
            Self::Int(None) => f.write_str("int"),
            Self::Int(Some(bits)) => write!(f, "int{bits}"),
            Self::FixedBytes(n) => write!(f, "bytes{n}"),
            Self::Bytes => f.write_str("bytes"),
            Self::String => f.write_str("string"),
        }
    }
}

/// Digits following `prefix`, if `name` is exactly `prefix` + digits.
fn numeric_suffix<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = name.strip_prefix(prefix)?;
    (!rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit())).then_some(rest)
}

fn int_width(digits: &str) -> Option<u16> {
    if digits.starts_with('0') {
        return None;
    }
    let bits: u16 = digits.parse().ok()?;
    (bits % 8 == 0 && (8..=256).contains(&bits)).then_some(bits)
}

/// True for `[A-Za-z_$][A-Za-z0-9_$]*`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// A parsed field type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Scalar(Scalar),
    /// Reference to another key of the schema.
    Struct(String),
    /// `T[]`. One level of nesting only.
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// Parse a field type as written in a schema.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        match text.strip_suffix("[]") {
            Some(inner) => {
                if inner.ends_with("[]") {
                    return Err(SchemaError::NestedArray(text.to_string()));
                }
                let element = Self::parse_element(inner).map_err(|e| match e {
                    SchemaError::InvalidType(_) => SchemaError::InvalidType(text.to_string()),
                    other => other,
                })?;
                Ok(Self::Array(Box::new(element)))
            }
            None => Self::parse_element(text),
        }
    }

    fn parse_element(text: &str) -> Result<Self, SchemaError> {
        if !is_identifier(text) {
            return Err(SchemaError::InvalidType(text.to_string()));
        }
        Ok(match Scalar::parse(text)? {
            Some(scalar) => Self::Scalar(scalar),
            None => Self::Struct(text.to_string()),
        })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// The element type of an array, or `self`.
    pub fn element(&self) -> &TypeRef {
        match self {
            Self::Array(inner) => inner,
            other => other,
        }
    }

    /// The composite this type refers to, looking through one array level.
    pub fn struct_name(&self) -> Option<&str> {
        match self.element() {
            Self::Struct(name) => Some(name),
            _ => None,
        }
    }

    pub fn class(&self) -> EncodingClass {
        match self {
            Self::Scalar(scalar) => scalar.class(),
            Self::Struct(_) | Self::Array(_) => EncodingClass::Getter,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => scalar.fmt(f),
            Self::Struct(name) => f.write_str(name),
            Self::Array(inner) => write!(f, "{inner}[]"),
        }
    }
}

/// A named, typed field of a composite type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    /// Parse the declared type.
    pub fn type_ref(&self) -> Result<TypeRef, SchemaError> {
        TypeRef::parse(&self.ty)
    }
}

/// Immutable mapping from type name to its ordered field list.
///
/// Declaration order is preserved; it drives the order of generated
/// declarations but never affects canonical type strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TypeSchema {
    types: IndexMap<String, Vec<FieldDescriptor>>,
}

/// Accepted JSON shapes: a typed-data document or a bare type map.
#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaDocument {
    Document {
        types: IndexMap<String, Vec<FieldDescriptor>>,
    },
    Bare(IndexMap<String, Vec<FieldDescriptor>>),
}

impl<'de> Deserialize<'de> for TypeSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let types = match SchemaDocument::deserialize(deserializer)? {
            SchemaDocument::Document { types } | SchemaDocument::Bare(types) => types,
        };
        Ok(Self { types })
    }
}

impl TypeSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a type from `(field name, field type)` pairs.
    pub fn with_type<'a>(
        mut self,
        name: &str,
        fields: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        self.insert(
            name,
            fields
                .into_iter()
                .map(|(n, t)| FieldDescriptor::new(n, t))
                .collect(),
        );
        self
    }

    /// Insert or replace a type, keeping its original position if present.
    pub fn insert(&mut self, name: impl Into<String>, fields: Vec<FieldDescriptor>) {
        self.types.insert(name.into(), fields);
    }

    /// Parse from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn fields(&self, name: &str) -> Option<&[FieldDescriptor]> {
        self.types.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Type names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldDescriptor])> {
        self.types.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Parse every field of `name` and check its references resolve.
    pub fn resolve_fields(
        &self,
        name: &str,
    ) -> Result<Vec<(&FieldDescriptor, TypeRef)>, SchemaError> {
        let fields = self
            .fields(name)
            .ok_or_else(|| SchemaError::NotAComposite(name.to_string()))?;
        fields
            .iter()
            .map(|field| {
                let ty = field.type_ref()?;
                if let Some(referenced) = ty.struct_name() {
                    if !self.contains(referenced) {
                        return Err(SchemaError::UnknownType {
                            type_name: name.to_string(),
                            field: field.name.clone(),
                            referenced: referenced.to_string(),
                        });
                    }
                }
                Ok((field, ty))
            })
            .collect()
    }
}
