//! Error types for typehash Core.

use thiserror::Error;

/// Schema errors: the type graph cannot be turned into hashing code.
///
/// Every variant is fatal. Generation aborts before any output is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("invalid type name {0:?}")]
    InvalidTypeName(String),

    #[error("type {0} has no fields")]
    EmptyType(String),

    #[error("invalid field name {field:?} in type {type_name}")]
    InvalidFieldName { type_name: String, field: String },

    #[error("duplicate field {field} in type {type_name}")]
    DuplicateField { type_name: String, field: String },

    #[error("invalid field type {0:?}")]
    InvalidType(String),

    #[error("nested array type {0:?} is not supported")]
    NestedArray(String),

    #[error("type {type_name}: field {field} references unknown type {referenced}")]
    UnknownType {
        type_name: String,
        field: String,
        referenced: String,
    },

    #[error("{0:?} is not a composite type of the schema")]
    NotAComposite(String),

    #[error("cyclic type reference: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },

    /// Two distinct types would share a generated Solidity identifier.
    #[error("{first} and {second} both generate identifiers named after {stem}")]
    NameCollision {
        first: String,
        second: String,
        stem: String,
    },
}

/// Errors raised while hashing a runtime [`Value`](crate::encode::Value).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("missing field {field} in value of type {type_name}")]
    MissingField { type_name: String, field: String },

    #[error("unexpected field {field} in value of type {type_name}")]
    UnexpectedField { type_name: String, field: String },

    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("integer out of range for {0}")]
    OutOfRange(String),

    #[error("expected {expected} bytes for {ty}, got {got}")]
    FixedBytesLength { ty: String, expected: usize, got: usize },

    #[error("invalid literal for {ty}: {reason}")]
    InvalidLiteral { ty: String, reason: String },
}
