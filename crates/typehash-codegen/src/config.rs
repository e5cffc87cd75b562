//! Generator configuration.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CodegenError, Result};
use crate::inject::RegionMarkers;

/// Visibility of the generated getter functions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Internal,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Public => "public",
            Self::Internal => "internal",
        })
    }
}

/// How `*_TYPEHASH` constants are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeHashStyle {
    /// `keccak256("<type string>")`, evaluated by the Solidity compiler.
    #[default]
    Expression,
    /// A precomputed `0x...` literal.
    Literal,
}

/// Configuration for a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    /// Sentinel lines delimiting the replaced regions.
    pub markers: RegionMarkers,
    /// Getter function visibility.
    pub visibility: Visibility,
    /// Type-hash constant style.
    pub type_hash_style: TypeHashStyle,
    /// Emit hardhat `console.log` calls inside getters.
    pub debug_logging: bool,
}

impl CodegenConfig {
    /// Parse from JSON text. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(CodegenError::io(path))?;
        Self::from_json_str(&text).map_err(|source| CodegenError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
