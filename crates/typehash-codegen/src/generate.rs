//! The generation pass.

use tracing::{debug, warn};
use typehash_core::{validate_schema, CanonicalEncoder, TypeHash, TypeSchema};

use crate::config::CodegenConfig;
use crate::dedup::dedup_getters;
use crate::error::Result;
use crate::getter::{emit_getter, GetterKey};
use crate::render::{render_getter, render_struct, render_type_hash};

/// Declarations generated for one composite type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    /// Canonical type string.
    pub type_string: String,
    pub type_hash: TypeHash,
    /// Rendered `struct` declaration.
    pub struct_decl: String,
    /// Rendered `bytes32 constant` declaration.
    pub type_hash_decl: String,
}

/// One rendered getter function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Getter {
    pub key: GetterKey,
    pub source: String,
}

/// Output of a generation run, in deterministic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedCode {
    /// One entry per schema type, in schema order.
    pub types: Vec<TypeDecl>,
    /// Distinct getters, in first-requested order.
    pub getters: Vec<Getter>,
}

impl GeneratedCode {
    /// Text for the SETUP region: each struct followed by its type hash.
    pub fn setup_block(&self) -> String {
        self.types
            .iter()
            .map(|t| format!("{}\n{}", t.struct_decl, t.type_hash_decl))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Text for the BODY region: every getter.
    pub fn body_block(&self) -> String {
        self.getters
            .iter()
            .map(|g| g.source.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn type_decl(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn getter(&self, key: &GetterKey) -> Option<&Getter> {
        self.getters.iter().find(|g| &g.key == key)
    }

    /// Number of array getters.
    pub fn array_getter_count(&self) -> usize {
        self.getters.iter().filter(|g| g.key.is_array()).count()
    }
}

/// Compile `schema` into Solidity declarations and getters.
///
/// The schema is validated first; nothing is rendered for a schema with
/// an unresolved reference, an unknown scalar or a cycle.
pub fn generate(schema: &TypeSchema, config: &CodegenConfig) -> Result<GeneratedCode> {
    validate_schema(schema)?;
    if schema.is_empty() {
        warn!("schema defines no types; generated regions will be empty");
    }

    let mut encoder = CanonicalEncoder::new(schema);
    let mut types = Vec::with_capacity(schema.len());
    let mut working = Vec::new();

    for (name, fields) in schema.iter() {
        let type_string = encoder.encode_type(name)?;
        let type_hash = TypeHash::of(&type_string);
        debug!(type_name = name, type_hash = %type_hash, "encoded type");

        types.push(TypeDecl {
            name: name.to_string(),
            struct_decl: render_struct(name, fields),
            type_hash_decl: render_type_hash(name, &type_string, type_hash, config.type_hash_style),
            type_string,
            type_hash,
        });

        emit_getter(name, schema, &mut working)?;
    }

    let requested = working.len();
    let keys = dedup_getters(working);
    debug!(requested, distinct = keys.len(), "deduplicated getter requests");

    let getters = keys
        .into_iter()
        .map(|key| -> Result<Getter> {
            let source = render_getter(&key, schema, config)?;
            Ok(Getter { key, source })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(GeneratedCode { types, getters })
}
