//! Error types for code generation and injection.

use std::path::PathBuf;

use thiserror::Error;
use typehash_core::SchemaError;

use crate::inject::Region;

/// A target file whose sentinel regions cannot be replaced safely.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectError {
    #[error(
        "line {line}: {region} region begins inside the {inside} region opened at line {opened_at}"
    )]
    NestedRegion {
        region: Region,
        line: usize,
        inside: Region,
        opened_at: usize,
    },

    #[error("line {line}: {region} region ends without a matching begin")]
    UnmatchedEnd { region: Region, line: usize },

    #[error("line {line}: {region} region appears again (first at line {first})")]
    DuplicateRegion {
        region: Region,
        first: usize,
        line: usize,
    },

    #[error("{region} region opened at line {opened_at} is never closed")]
    UnterminatedRegion { region: Region, opened_at: usize },

    #[error("{region} region markers not found")]
    MissingRegion { region: Region },

    #[error("generated {region} code contains a region marker")]
    MarkerInGeneratedCode { region: Region },
}

/// Errors that abort a generation run.
///
/// No variant is recoverable: on any of them the target file is left as it was.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The schema cannot be compiled.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The target file's regions are malformed.
    #[error("malformed target file: {0}")]
    MalformedTarget(#[from] InjectError),

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A config file could not be parsed.
    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl CodegenError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

/// Result type for codegen operations.
pub type Result<T> = std::result::Result<T, CodegenError>;
