//! # typehash
//!
//! Compile EIP-712 typed-data schemas into Solidity: struct declarations,
//! `*_TYPEHASH` constants and pure packet-hash getters, spliced into an
//! existing contract between sentinel comments.
//!
//! ## Overview
//!
//! - **Schemas**: `TypeName -> [{ name, type }]`, fields may reference other
//!   types or arrays of them
//! - **Type hashes**: Keccak-256 of the canonical EIP-712 type string
//! - **Getters**: one generated function per distinct struct or array type
//! - **Injection**: only the SETUP and BODY regions of the target change
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use typehash::{Generator, UpdateOutcome};
//!
//! let generator = Generator::from_files(Path::new("types.json"), None).unwrap();
//! match generator.update_file(Path::new("contracts/Delegatable.sol")).unwrap() {
//!     UpdateOutcome::Updated => println!("regenerated"),
//!     UpdateOutcome::Unchanged => println!("already up to date"),
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `typehash::core` - Schemas, canonical type strings, reference hashing
//! - `typehash::codegen` - Rendering, deduplication and injection

pub mod cli;
pub mod error;
pub mod generator;

// Re-export component crates
pub use typehash_codegen as codegen;
pub use typehash_core as core;

pub use error::{Error, Result};
pub use generator::{load_message, load_schema, Generator, TypeHashEntry};

pub use typehash_codegen::{CodegenConfig, GeneratedCode, RegionMarkers, UpdateOutcome};
pub use typehash_core::{Keccak256Hash, TypeHash, TypeSchema};
