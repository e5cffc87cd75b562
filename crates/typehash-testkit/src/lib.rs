//! # typehash Testkit
//!
//! Testing utilities for typehash.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known type strings, type hashes and struct hashes
//! - **Generators**: Proptest strategies for acyclic schemas and values
//! - **Fixtures**: Shared schemas and a scratch contract on disk
//!
//! ## Golden Vectors
//!
//! ```rust
//! use typehash_testkit::vectors::{all_vectors, compute_type_hash};
//!
//! for vector in all_vectors() {
//!     let (_, hash) = compute_type_hash(&vector);
//!     assert_eq!(hash, vector.type_hash, "{}", vector.name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use typehash_testkit::generators::SchemaCase;
//!
//! proptest! {
//!     #[test]
//!     fn type_hash_ignores_declaration_order(case: SchemaCase) {
//!         for name in case.schema.names() {
//!             prop_assert_eq!(
//!                 typehash_core::type_hash(name, &case.schema).unwrap(),
//!                 typehash_core::type_hash(name, &case.shuffled).unwrap(),
//!             );
//!         }
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use typehash_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! assert!(fixture.read_contract().contains("BEGIN EIP712 AUTOGENERATED BODY"));
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{
    delegation_schema, group_schema, mail_schema, person_schema, shared_leaf_schema, TestFixture,
    CONTRACT_TEMPLATE,
};
pub use generators::{acyclic_schema, SchemaCase};
pub use vectors::{all_vectors, message_vectors, verify_all_vectors, GoldenVector, MessageVector};
