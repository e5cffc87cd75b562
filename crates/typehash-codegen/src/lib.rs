//! # typehash Codegen
//!
//! Turns a [`TypeSchema`](typehash_core::TypeSchema) into Solidity source:
//! struct declarations, `*_TYPEHASH` constants and one pure packet-hash
//! getter per distinct struct or array type, then splices that source into
//! an existing contract between sentinel comment lines.
//!
//! ## Pipeline
//!
//! ```text
//! schema -> validate -> canonical type strings (per type)
//!        -> getter requests (recursive walk) -> dedup -> render
//!        -> inject into SETUP / BODY regions -> atomic rewrite
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use typehash_codegen::{generate, inject, CodegenConfig};
//! use typehash_core::TypeSchema;
//!
//! let schema = TypeSchema::new().with_type("Person", [("name", "string"), ("wallet", "address")]);
//! let config = CodegenConfig::default();
//! let code = generate(&schema, &config).unwrap();
//!
//! let contract = "contract C {\n// BEGIN EIP712 AUTOGENERATED SETUP\n// END EIP712 AUTOGENERATED SETUP\n\
//!                 // BEGIN EIP712 AUTOGENERATED BODY\n// END EIP712 AUTOGENERATED BODY\n}\n";
//! let (setup, body) = (code.setup_block(), code.body_block());
//! let updated = inject(contract, &setup, &body, &config.markers).unwrap();
//! assert!(updated.contains("function GET_PERSON_PACKETHASH"));
//! ```

pub mod config;
pub mod dedup;
pub mod error;
pub mod file;
pub mod generate;
pub mod getter;
pub mod inject;
pub mod render;

pub use config::{CodegenConfig, TypeHashStyle, Visibility};
pub use dedup::dedup_getters;
pub use error::{CodegenError, InjectError, Result};
pub use file::{check_file, update_file, UpdateOutcome};
pub use generate::{generate, GeneratedCode, Getter, TypeDecl};
pub use getter::{emit_array_getter, emit_getter, GetterKey};
pub use inject::{inject, Region, RegionMarkers};
