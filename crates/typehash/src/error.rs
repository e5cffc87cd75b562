//! Error types for the generator facade.

use std::path::PathBuf;

use thiserror::Error;
use typehash_codegen::CodegenError;
use typehash_core::{EncodeError, SchemaError};

/// Errors that can occur while loading inputs or generating code.
#[derive(Debug, Error)]
pub enum Error {
    /// Schema error.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Code generation or file update error.
    #[error(transparent)]
    Codegen(#[from] CodegenError),

    /// A message could not be hashed against the schema.
    #[error("encoding error: {0}")]
    Encode(#[from] EncodeError),

    /// A JSON input file is not valid.
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// An input file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;
