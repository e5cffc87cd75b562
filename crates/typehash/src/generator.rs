//! The Generator: one schema, one configuration, any number of targets.
//!
//! Inputs are validated once, when the generator is built. Every later
//! operation is a deterministic function of those inputs.

use std::fs;
use std::path::Path;

use tracing::info;
use typehash_codegen::{
    check_file, generate, inject, update_file, CodegenConfig, GeneratedCode, UpdateOutcome,
};
use typehash_core::{
    hash_struct, validate_schema, CanonicalEncoder, Keccak256Hash, TypeHash, TypeRef, TypeSchema,
    Value,
};

use crate::error::{Error, Result};

/// A type's canonical string and hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHashEntry {
    pub name: String,
    pub type_string: String,
    pub type_hash: TypeHash,
}

/// Read and parse a JSON schema file.
pub fn load_schema(path: &Path) -> Result<TypeSchema> {
    let text = read(path)?;
    TypeSchema::from_json_str(&text).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse a JSON message file.
///
/// A typed-data document (an object with both `types` and `message`)
/// yields its `message`.
pub fn load_message(path: &Path) -> Result<serde_json::Value> {
    let text = read(path)?;
    let json: serde_json::Value = serde_json::from_str(&text).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(message_payload(json))
}

fn message_payload(json: serde_json::Value) -> serde_json::Value {
    match json {
        serde_json::Value::Object(mut doc)
            if doc.contains_key("types") && doc.contains_key("message") =>
        {
            doc.remove("message").unwrap_or_default()
        }
        other => other,
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// A validated schema paired with its generation settings.
#[derive(Debug, Clone)]
pub struct Generator {
    schema: TypeSchema,
    config: CodegenConfig,
}

impl Generator {
    /// Create a generator, validating the schema.
    pub fn new(schema: TypeSchema, config: CodegenConfig) -> Result<Self> {
        validate_schema(&schema)?;
        Ok(Self { schema, config })
    }

    /// Load the schema and, if given, the config from JSON files.
    pub fn from_files(schema_path: &Path, config_path: Option<&Path>) -> Result<Self> {
        let schema = load_schema(schema_path)?;
        let config = match config_path {
            Some(path) => CodegenConfig::load(path)?,
            None => CodegenConfig::default(),
        };
        info!(
            schema = %schema_path.display(),
            types = schema.len(),
            "loaded schema"
        );
        Self::new(schema, config)
    }

    pub fn schema(&self) -> &TypeSchema {
        &self.schema
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Mutable access to the configuration, for command-line overrides.
    pub fn config_mut(&mut self) -> &mut CodegenConfig {
        &mut self.config
    }

    /// Generate declarations and getters.
    pub fn generate(&self) -> Result<GeneratedCode> {
        Ok(generate(&self.schema, &self.config)?)
    }

    /// Inject freshly generated code into `text`.
    pub fn render_into(&self, text: &str) -> Result<String> {
        let code = self.generate()?;
        let markers = &self.config.markers;
        inject(text, &code.setup_block(), &code.body_block(), markers)
            .map_err(|e| Error::Codegen(e.into()))
    }

    /// Rewrite the generated regions of `path`.
    pub fn update_file(&self, path: &Path) -> Result<UpdateOutcome> {
        let code = self.generate()?;
        Ok(update_file(path, &code, &self.config.markers)?)
    }

    /// Report whether `path` is up to date, without writing.
    pub fn check_file(&self, path: &Path) -> Result<UpdateOutcome> {
        let code = self.generate()?;
        Ok(check_file(path, &code, &self.config.markers)?)
    }

    /// Canonical strings and hashes of every type, or only `only`.
    pub fn type_hashes(&self, only: Option<&str>) -> Result<Vec<TypeHashEntry>> {
        let mut encoder = CanonicalEncoder::new(&self.schema);
        let names: Vec<&str> = match only {
            Some(name) => vec![name],
            None => self.schema.names().collect(),
        };
        names
            .into_iter()
            .map(|name| -> Result<TypeHashEntry> {
                let type_string = encoder.encode_type(name)?;
                Ok(TypeHashEntry {
                    name: name.to_string(),
                    type_hash: TypeHash::of(&type_string),
                    type_string,
                })
            })
            .collect()
    }

    /// Struct hash of a JSON message, as the generated getter computes it.
    pub fn hash_message(
        &self,
        type_name: &str,
        message: &serde_json::Value,
    ) -> Result<Keccak256Hash> {
        let ty = TypeRef::Struct(type_name.to_string());
        let value = Value::from_json(message, &ty, &self.schema)?;
        Ok(hash_struct(type_name, &value, &self.schema)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail() -> Generator {
        let schema = TypeSchema::new()
            .with_type("Mail", [("from", "Person"), ("to", "Person"), ("contents", "string")])
            .with_type("Person", [("name", "string"), ("wallet", "address")]);
        Generator::new(schema, CodegenConfig::default()).unwrap()
    }

    #[test]
    fn test_new_validates() {
        let schema = TypeSchema::new().with_type("Mail", [("from", "Ghost")]);
        assert!(matches!(
            Generator::new(schema, CodegenConfig::default()),
            Err(Error::Schema(_))
        ));
    }

    #[test]
    fn test_type_hashes() {
        let entries = mail().type_hashes(None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Mail");
        assert_eq!(
            entries[0].type_hash.to_hex(),
            "a0cedeb2dc280ba39b857546d74f5549c3a1d7bdc2dd96bf881f76108e23dac2"
        );

        let only = mail().type_hashes(Some("Person")).unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].type_string, "Person(string name,address wallet)");
    }

    #[test]
    fn test_type_hashes_unknown_type() {
        assert!(matches!(
            mail().type_hashes(Some("Ghost")),
            Err(Error::Schema(typehash_core::SchemaError::NotAComposite(_)))
        ));
    }

    #[test]
    fn test_render_into_malformed() {
        let err = mail().render_into("// BEGIN EIP712 AUTOGENERATED SETUP\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Codegen(typehash_codegen::CodegenError::MalformedTarget(_))
        ));
    }

    #[test]
    fn test_message_payload() {
        let doc = serde_json::json!({
            "types": {},
            "primaryType": "Person",
            "message": { "name": "Bob" }
        });
        assert_eq!(message_payload(doc), serde_json::json!({ "name": "Bob" }));

        let bare = serde_json::json!({ "name": "Bob", "message": "hi" });
        assert_eq!(message_payload(bare.clone()), bare);
    }

    #[test]
    fn test_hash_message() {
        let message = serde_json::json!({
            "name": "Bob",
            "wallet": "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"
        });
        assert_eq!(
            mail().hash_message("Person", &message).unwrap().to_hex(),
            "a60b95bc47d73886d6ae321b7dc9ed2f590f9ee8f8ab4b5f295c70a6777633c6"
        );
        assert!(matches!(
            mail().hash_message("Person", &serde_json::json!({ "name": "Bob" })),
            Err(Error::Encode(_))
        ));
    }
}
