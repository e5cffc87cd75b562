//! # typehash Core
//!
//! Pure primitives for typed structured data hashing (EIP-712 style):
//! schemas, canonical type strings, type hashes and struct hashes.
//!
//! This crate contains no I/O. It is pure computation over a read-only
//! schema graph.
//!
//! ## Key Types
//!
//! - [`TypeSchema`] - Ordered mapping from type name to field descriptors
//! - [`TypeRef`] - A parsed field type: scalar, struct reference, or array
//! - [`TypeHash`] - Keccak-256 of a canonical type string
//! - [`Value`] - A runtime instance of a schema type, for reference hashing
//!
//! ## Canonical Type Strings
//!
//! The primary type is rendered first, followed by every transitively
//! referenced composite in lexicographic order. See [`canonical`] module.

pub mod canonical;
pub mod encode;
pub mod error;
pub mod hash;
pub mod schema;
pub mod types;
pub mod validation;

pub use canonical::{encode_type, type_hash, CanonicalEncoder};
pub use encode::{encode_struct, hash_array, hash_struct, Value};
pub use error::{EncodeError, SchemaError};
pub use hash::Keccak256Hash;
pub use schema::{EncodingClass, FieldDescriptor, Scalar, TypeRef, TypeSchema};
pub use types::TypeHash;
pub use validation::validate_schema;
