//! Strong type definitions for typehash.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hash::Keccak256Hash;

/// A 32-byte type hash, computed as Keccak256(canonical type string).
///
/// One exists per named composite type. Arrays and scalars are encoded
/// inline and never get a type hash of their own.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeHash(pub [u8; 32]);

impl TypeHash {
    /// Hash a canonical type string.
    pub fn of(type_string: &str) -> Self {
        Self(Keccak256Hash::hash(type_string.as_bytes()).0)
    }

    /// Create a new TypeHash from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Render as a Solidity `bytes32` literal.
    pub fn to_literal(&self) -> String {
        format!("0x{}", self.to_hex())
    }

    /// Parse from hex string, with or without `0x`.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        Keccak256Hash::from_hex(s).map(|h| Self(h.0))
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

impl AsRef<[u8]> for TypeHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for TypeHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<TypeHash> for Keccak256Hash {
    fn from(h: TypeHash) -> Self {
        Keccak256Hash(h.0)
    }
}
