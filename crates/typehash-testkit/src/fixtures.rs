//! Test fixtures and helpers.
//!
//! Schemas used across the workspace's tests, and a scratch directory
//! holding a contract with empty generated regions.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use typehash_codegen::{generate, update_file, CodegenConfig, UpdateOutcome};
use typehash_core::TypeSchema;

/// The EIP-712 example: `Mail` referencing `Person` twice.
pub fn mail_schema() -> TypeSchema {
    TypeSchema::new()
        .with_type("Mail", [("from", "Person"), ("to", "Person"), ("contents", "string")])
        .with_type("Person", [("name", "string"), ("wallet", "address")])
}

/// A single leaf type.
pub fn person_schema() -> TypeSchema {
    TypeSchema::new().with_type("Person", [("name", "string"), ("wallet", "address")])
}

/// A composite holding an array of another composite.
pub fn group_schema() -> TypeSchema {
    TypeSchema::new()
        .with_type("Group", [("name", "string"), ("members", "Person[]")])
        .with_type("Person", [("name", "string"), ("wallet", "address")])
}

/// Delegation and invocation types of a delegatable contract.
pub fn delegation_schema() -> TypeSchema {
    TypeSchema::new()
        .with_type(
            "EIP712Domain",
            [
                ("name", "string"),
                ("version", "string"),
                ("chainId", "uint256"),
                ("verifyingContract", "address"),
            ],
        )
        .with_type(
            "Invocation",
            [("transaction", "Transaction"), ("authority", "SignedDelegation[]")],
        )
        .with_type(
            "Invocations",
            [("batch", "Invocation[]"), ("replayProtection", "ReplayProtection")],
        )
        .with_type(
            "SignedInvocation",
            [("invocations", "Invocations"), ("signature", "bytes")],
        )
        .with_type(
            "Transaction",
            [("to", "address"), ("gasLimit", "uint256"), ("data", "bytes")],
        )
        .with_type("ReplayProtection", [("nonce", "uint"), ("queue", "uint")])
        .with_type(
            "Delegation",
            [("delegate", "address"), ("authority", "bytes32"), ("caveats", "Caveat[]")],
        )
        .with_type("Caveat", [("enforcer", "address"), ("terms", "bytes")])
        .with_type(
            "SignedDelegation",
            [("delegation", "Delegation"), ("signature", "bytes")],
        )
}

/// Three composites sharing one leaf.
pub fn shared_leaf_schema() -> TypeSchema {
    TypeSchema::new()
        .with_type("Alpha", [("leaf", "Leaf")])
        .with_type("Beta", [("leaves", "Leaf[]")])
        .with_type("Gamma", [("first", "Leaf"), ("rest", "Leaf[]")])
        .with_type("Leaf", [("value", "uint256")])
}

/// A contract with empty SETUP and BODY regions using the default markers.
pub const CONTRACT_TEMPLATE: &str = "// SPDX-License-Identifier: MIT\n\
pragma solidity ^0.8.13;\n\
\n\
contract Delegatable {\n\
\x20 // BEGIN EIP712 AUTOGENERATED SETUP\n\
\x20 // END EIP712 AUTOGENERATED SETUP\n\
\n\
\x20 function verify(bytes32 digest) public pure returns (bool) {\n\
\x20   return digest != bytes32(0);\n\
\x20 }\n\
\n\
\x20 // BEGIN EIP712 AUTOGENERATED BODY\n\
\x20 // END EIP712 AUTOGENERATED BODY\n\
}\n";

/// A scratch directory with a contract file in it.
pub struct TestFixture {
    dir: TempDir,
    contract: PathBuf,
}

impl TestFixture {
    /// Create a fixture holding [`CONTRACT_TEMPLATE`].
    pub fn new() -> Self {
        Self::with_contract(CONTRACT_TEMPLATE)
    }

    /// Create a fixture holding `contents` as the contract.
    pub fn with_contract(contents: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let contract = dir.path().join("Delegatable.sol");
        fs::write(&contract, contents).expect("write contract");
        Self { dir, contract }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn contract_path(&self) -> &Path {
        &self.contract
    }

    /// Current contract contents.
    pub fn read_contract(&self) -> String {
        fs::read_to_string(&self.contract).expect("read contract")
    }

    /// Write a JSON file into the fixture directory and return its path.
    pub fn write_json(&self, name: &str, value: &serde_json::Value) -> PathBuf {
        let path = self.dir.path().join(name);
        let text = serde_json::to_string_pretty(value).expect("serialize json");
        fs::write(&path, text).expect("write json");
        path
    }

    /// Generate code for `schema` into the contract with `config`.
    pub fn generate_with(&self, schema: &TypeSchema, config: &CodegenConfig) -> UpdateOutcome {
        let code = generate(schema, config).expect("generate code");
        update_file(&self.contract, &code, &config.markers).expect("update contract")
    }

    /// Generate code for `schema` into the contract with default settings.
    pub fn generate(&self, schema: &TypeSchema) -> UpdateOutcome {
        self.generate_with(schema, &CodegenConfig::default())
    }

    /// Number of entries in the fixture directory.
    pub fn file_count(&self) -> usize {
        fs::read_dir(self.dir.path()).expect("read dir").count()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typehash_core::validate_schema;

    #[test]
    fn test_fixture_schemas_are_valid() {
        for schema in [
            mail_schema(),
            person_schema(),
            group_schema(),
            delegation_schema(),
            shared_leaf_schema(),
        ] {
            validate_schema(&schema).unwrap();
        }
    }

    #[test]
    fn test_fixture_contract() {
        let fixture = TestFixture::new();
        assert_eq!(fixture.read_contract(), CONTRACT_TEMPLATE);
        assert_eq!(fixture.file_count(), 1);
    }

    #[test]
    fn test_fixture_generate() {
        let fixture = TestFixture::new();
        assert_eq!(fixture.generate(&person_schema()), UpdateOutcome::Updated);
        assert_eq!(fixture.generate(&person_schema()), UpdateOutcome::Unchanged);
        assert!(fixture.read_contract().contains("GET_PERSON_PACKETHASH"));
        assert_eq!(fixture.file_count(), 1);
    }
}
