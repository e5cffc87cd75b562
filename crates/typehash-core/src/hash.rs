//! Keccak-256 hashing with a strong type.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;

/// A 32-byte Keccak-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Keccak256Hash(pub [u8; 32]);

impl Keccak256Hash {
    /// Compute the Keccak-256 hash of the given data.
    pub fn hash(data: &[u8]) -> Self {
        Self(Keccak256::digest(data).into())
    }

    /// Hash the concatenation of several slices without building a buffer.
    pub fn hash_parts<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let mut hasher = Keccak256::new();
        for part in parts {
            hasher.update(part);
        }
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string (no prefix).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Render as a `0x`-prefixed literal.
    pub fn to_literal(&self) -> String {
        format!("0x{}", self.to_hex())
    }

    /// Parse from hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut arr = [0u8; 32];
        hex::decode_to_slice(s, &mut arr)?;
        Ok(Self(arr))
    }

    /// Keccak-256 of the empty input, the hash of an empty array.
    pub fn empty() -> Self {
        Self::hash(&[])
    }
}

impl fmt::Debug for Keccak256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keccak256({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Keccak256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

impl AsRef<[u8]> for Keccak256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Keccak256Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_empty() {
        assert_eq!(
            Keccak256Hash::empty().to_hex(),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_hash_parts_matches_hash() {
        let whole = Keccak256Hash::hash(b"hello world");
        let parts = Keccak256Hash::hash_parts([&b"hello"[..], &b" "[..], &b"world"[..]]);
        assert_eq!(whole, parts);
    }

    #[test]
    fn test_from_hex_accepts_prefix() {
        let h = Keccak256Hash::hash(b"x");
        assert_eq!(Keccak256Hash::from_hex(&h.to_literal()).unwrap(), h);
        assert_eq!(Keccak256Hash::from_hex(&h.to_hex()).unwrap(), h);
        assert!(Keccak256Hash::from_hex("0xabcd").is_err());
    }

    #[test]
    fn test_debug_is_short() {
        let debug = format!("{:?}", Keccak256Hash::from_bytes([0xab; 32]));
        assert_eq!(debug, "Keccak256(abababababababab)");
    }
}
