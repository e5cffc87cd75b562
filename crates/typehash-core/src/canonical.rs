//! Canonical type strings for typed structured data.
//!
//! The encoding of a composite type is its own member list followed by the
//! member lists of every composite it references, directly or through
//! arrays, transitively:
//!
//! ```text
//! Mail(Person from,Person to,string contents)Person(string name,address wallet)
//! ```
//!
//! Referenced types are de-duplicated and sorted by name, so the string
//! depends only on the shape of the reachable type graph, never on the
//! order types were declared in. Two independent implementations hashing
//! the same schema must agree byte for byte.

use std::collections::{BTreeSet, HashMap};

use crate::error::SchemaError;
use crate::schema::TypeSchema;
use crate::types::TypeHash;

/// Memoizing canonical encoder over a read-only schema.
///
/// Type names are node identities; each type's member list, dependency set
/// and final type string are computed at most once.
#[derive(Debug)]
pub struct CanonicalEncoder<'a> {
    schema: &'a TypeSchema,
    members: HashMap<String, String>,
    dependencies: HashMap<String, BTreeSet<String>>,
    type_strings: HashMap<String, String>,
}

impl<'a> CanonicalEncoder<'a> {
    pub fn new(schema: &'a TypeSchema) -> Self {
        Self {
            schema,
            members: HashMap::new(),
            dependencies: HashMap::new(),
            type_strings: HashMap::new(),
        }
    }

    pub fn schema(&self) -> &'a TypeSchema {
        self.schema
    }

    /// The canonical type string of a composite type.
    pub fn encode_type(&mut self, name: &str) -> Result<String, SchemaError> {
        if let Some(cached) = self.type_strings.get(name) {
            return Ok(cached.clone());
        }

        let mut encoded = self.member(name)?;
        for dependency in self.dependencies(name)? {
            encoded.push_str(&self.member(&dependency)?);
        }

        self.type_strings.insert(name.to_string(), encoded.clone());
        Ok(encoded)
    }

    /// Keccak-256 of the canonical type string.
    pub fn type_hash(&mut self, name: &str) -> Result<TypeHash, SchemaError> {
        Ok(TypeHash::of(&self.encode_type(name)?))
    }

    /// Every composite reachable from `name`, excluding `name` itself.
    pub fn dependencies(&mut self, name: &str) -> Result<BTreeSet<String>, SchemaError> {
        let mut stack = Vec::new();
        self.collect(name, &mut stack)
    }

    fn collect(
        &mut self,
        name: &str,
        stack: &mut Vec<String>,
    ) -> Result<BTreeSet<String>, SchemaError> {
        if let Some(cached) = self.dependencies.get(name) {
            return Ok(cached.clone());
        }
        if let Some(start) = stack.iter().position(|n| n == name) {
            let mut path = stack[start..].to_vec();
            path.push(name.to_string());
            return Err(SchemaError::Cycle { path });
        }

        let referenced: Vec<String> = self
            .schema
            .resolve_fields(name)?
            .into_iter()
            .filter_map(|(_, ty)| ty.struct_name().map(str::to_string))
            .collect();

        stack.push(name.to_string());
        let mut found = BTreeSet::new();
        for r in referenced {
            let nested = self.collect(&r, stack)?;
            found.insert(r);
            found.extend(nested);
        }
        stack.pop();

        self.dependencies.insert(name.to_string(), found.clone());
        Ok(found)
    }

    /// `Name(type1 name1,type2 name2,...)`
    fn member(&mut self, name: &str) -> Result<String, SchemaError> {
        if let Some(cached) = self.members.get(name) {
            return Ok(cached.clone());
        }

        let fields = self.schema.resolve_fields(name)?;
        let list: Vec<String> = fields
            .iter()
            .map(|(field, ty)| format!("{} {}", ty, field.name))
            .collect();
        let member = format!("{}({})", name, list.join(","));

        self.members.insert(name.to_string(), member.clone());
        Ok(member)
    }
}

/// Encode a single type. Prefer [`CanonicalEncoder`] when encoding many.
pub fn encode_type(name: &str, schema: &TypeSchema) -> Result<String, SchemaError> {
    CanonicalEncoder::new(schema).encode_type(name)
}

/// Hash a single type's canonical string.
pub fn type_hash(name: &str, schema: &TypeSchema) -> Result<TypeHash, SchemaError> {
    CanonicalEncoder::new(schema).type_hash(name)
}
