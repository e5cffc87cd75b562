//! Reference struct hashing over runtime values.
//!
//! This computes, in Rust, exactly what the generated getters compute
//! on-chain, so off-chain callers can produce matching signing payloads:
//!
//! - struct: `keccak256(abi.encode(TYPEHASH, enc(f1), enc(f2), ...))`
//! - array:  `keccak256(h(e1) || h(e2) || ...)`, in input order
//!
//! Field encodings follow the encoding class of the field type. Direct
//! scalars are ABI words (`string` is an ABI dynamic value with its bytes
//! in the tail), `bytes` is pre-hashed, structs and arrays contribute
//! their own 32-byte hash. Hashing is one-way; there is no decoder.

use indexmap::IndexMap;

use crate::canonical::CanonicalEncoder;
use crate::error::EncodeError;
use crate::hash::Keccak256Hash;
use crate::schema::{Scalar, TypeRef, TypeSchema};

/// An instance of a schema type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Address([u8; 20]),
    Bool(bool),
    /// Unsigned integer as a 256-bit big-endian word.
    Uint([u8; 32]),
    /// Signed integer as a 256-bit two's complement word.
    Int([u8; 32]),
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    String(String),
    Struct(IndexMap<String, Value>),
    Array(Vec<Value>),
}

impl Value {
    pub fn uint(n: u128) -> Self {
        let mut word = [0u8; 32];
        word[16..].copy_from_slice(&n.to_be_bytes());
        Self::Uint(word)
    }

    pub fn int(n: i128) -> Self {
        let fill = if n < 0 { 0xff } else { 0x00 };
        let mut word = [fill; 32];
        word[16..].copy_from_slice(&n.to_be_bytes());
        Self::Int(word)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Build a struct value from `(field, value)` pairs.
    pub fn structure<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Parse a `0x`-prefixed 20-byte address.
    pub fn address_from_hex(s: &str) -> Result<Self, EncodeError> {
        let bytes = decode_hex("address", s)?;
        let arr: [u8; 20] = bytes.try_into().map_err(|_| EncodeError::InvalidLiteral {
            ty: "address".into(),
            reason: "expected 20 bytes".into(),
        })?;
        Ok(Self::Address(arr))
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Address(_) => "address",
            Self::Bool(_) => "bool",
            Self::Uint(_) => "uint",
            Self::Int(_) => "int",
            Self::FixedBytes(_) => "fixed bytes",
            Self::Bytes(_) => "bytes",
            Self::String(_) => "string",
            Self::Struct(_) => "struct",
            Self::Array(_) => "array",
        }
    }

    /// Convert a JSON value, guided by its declared type.
    ///
    /// Addresses and byte strings are `0x` hex. Integers are JSON numbers,
    /// decimal strings (up to 128 bits) or `0x` hex words.
    pub fn from_json(
        json: &serde_json::Value,
        ty: &TypeRef,
        schema: &TypeSchema,
    ) -> Result<Self, EncodeError> {
        use serde_json::Value as Json;

        let mismatch = || EncodeError::TypeMismatch {
            expected: ty.to_string(),
            got: json_kind(json).to_string(),
        };

        match ty {
            TypeRef::Scalar(scalar) => match (scalar, json) {
                (Scalar::Address, Json::String(s)) => Self::address_from_hex(s),
                (Scalar::Bool, Json::Bool(b)) => Ok(Self::Bool(*b)),
                (Scalar::Uint(_), _) => uint_from_json(json, &ty.to_string()),
                (Scalar::Int(_), _) => int_from_json(json, &ty.to_string()),
                (Scalar::FixedBytes(_), Json::String(s)) => {
                    Ok(Self::FixedBytes(decode_hex(&ty.to_string(), s)?))
                }
                (Scalar::Bytes, Json::String(s)) => Ok(Self::Bytes(decode_hex("bytes", s)?)),
                (Scalar::String, Json::String(s)) => Ok(Self::String(s.clone())),
                _ => Err(mismatch()),
            },
            TypeRef::Struct(name) => {
                let object = json.as_object().ok_or_else(mismatch)?;
                let fields = schema.resolve_fields(name)?;
                if let Some(extra) = object
                    .keys()
                    .find(|k| !fields.iter().any(|(f, _)| &f.name == *k))
                {
                    return Err(EncodeError::UnexpectedField {
                        type_name: name.clone(),
                        field: extra.clone(),
                    });
                }
                let mut values = IndexMap::with_capacity(fields.len());
                for (field, field_ty) in &fields {
                    let raw = object.get(&field.name).ok_or_else(|| EncodeError::MissingField {
                        type_name: name.clone(),
                        field: field.name.clone(),
                    })?;
                    values.insert(field.name.clone(), Self::from_json(raw, field_ty, schema)?);
                }
                Ok(Self::Struct(values))
            }
            TypeRef::Array(element) => {
                let items = json.as_array().ok_or_else(mismatch)?;
                items
                    .iter()
                    .map(|item| Self::from_json(item, element, schema))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Self::Array)
            }
        }
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn decode_hex(ty: &str, s: &str) -> Result<Vec<u8>, EncodeError> {
    let digits = s.strip_prefix("0x").ok_or_else(|| EncodeError::InvalidLiteral {
        ty: ty.to_string(),
        reason: "missing 0x prefix".into(),
    })?;
    hex::decode(digits).map_err(|e| EncodeError::InvalidLiteral {
        ty: ty.to_string(),
        reason: e.to_string(),
    })
}

fn hex_word(ty: &str, s: &str) -> Result<[u8; 32], EncodeError> {
    let mut digits = s.trim_start_matches("0x").to_string();
    if digits.len() % 2 == 1 {
        digits.insert(0, '0');
    }
    let bytes = decode_hex(ty, &format!("0x{digits}"))?;
    if bytes.len() > 32 {
        return Err(EncodeError::OutOfRange(ty.to_string()));
    }
    let mut word = [0u8; 32];
    word[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(word)
}

fn uint_from_json(json: &serde_json::Value, ty: &str) -> Result<Value, EncodeError> {
    let invalid = |reason: &str| EncodeError::InvalidLiteral {
        ty: ty.to_string(),
        reason: reason.to_string(),
    };
    match json {
        serde_json::Value::Number(n) => n
            .as_u64()
            .map(|n| Value::uint(n.into()))
            .ok_or_else(|| invalid("not a non-negative integer")),
        serde_json::Value::String(s) if s.starts_with("0x") => Ok(Value::Uint(hex_word(ty, s)?)),
        serde_json::Value::String(s) => s
            .parse::<u128>()
            .map(Value::uint)
            .map_err(|e| invalid(&e.to_string())),
        other => Err(EncodeError::TypeMismatch {
            expected: ty.to_string(),
            got: json_kind(other).to_string(),
        }),
    }
}

fn int_from_json(json: &serde_json::Value, ty: &str) -> Result<Value, EncodeError> {
    let invalid = |reason: &str| EncodeError::InvalidLiteral {
        ty: ty.to_string(),
        reason: reason.to_string(),
    };
    match json {
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(|n| Value::int(n.into()))
            .ok_or_else(|| invalid("not an integer")),
        serde_json::Value::String(s) => s
            .parse::<i128>()
            .map(Value::int)
            .map_err(|e| invalid(&e.to_string())),
        other => Err(EncodeError::TypeMismatch {
            expected: ty.to_string(),
            got: json_kind(other).to_string(),
        }),
    }
}

/// One argument of an `abi.encode` call.
enum Token {
    /// A static 32-byte head word.
    Word([u8; 32]),
    /// A dynamic byte string: offset in the head, length and data in the tail.
    Dynamic(Vec<u8>),
}

/// ABI-encode a tuple of tokens (`abi.encode(a, b, ...)`).
fn abi_encode(tokens: &[Token]) -> Vec<u8> {
    let head_len = 32 * tokens.len();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for token in tokens {
        match token {
            Token::Word(word) => head.extend_from_slice(word),
            Token::Dynamic(data) => {
                head.extend_from_slice(&usize_word(head_len + tail.len()));
                tail.extend_from_slice(&usize_word(data.len()));
                tail.extend_from_slice(data);
                let padding = (32 - data.len() % 32) % 32;
                tail.resize(tail.len() + padding, 0);
            }
        }
    }

    head.extend_from_slice(&tail);
    head
}

fn usize_word(n: usize) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&(n as u64).to_be_bytes());
    word
}

/// Struct hasher sharing one memoizing type encoder across recursion.
struct Hasher<'a> {
    encoder: CanonicalEncoder<'a>,
}

impl<'a> Hasher<'a> {
    fn new(schema: &'a TypeSchema) -> Self {
        Self {
            encoder: CanonicalEncoder::new(schema),
        }
    }

    fn encode_struct(&mut self, name: &str, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let schema = self.encoder.schema();
        let fields = schema.resolve_fields(name)?;
        let map = match value {
            Value::Struct(map) => map,
            other => {
                return Err(EncodeError::TypeMismatch {
                    expected: name.to_string(),
                    got: other.kind().to_string(),
                })
            }
        };
        if let Some(extra) = map.keys().find(|k| !fields.iter().any(|(f, _)| &f.name == *k)) {
            return Err(EncodeError::UnexpectedField {
                type_name: name.to_string(),
                field: extra.clone(),
            });
        }

        let mut tokens = Vec::with_capacity(fields.len() + 1);
        tokens.push(Token::Word(self.encoder.type_hash(name)?.0));
        for (field, ty) in &fields {
            let v = map.get(&field.name).ok_or_else(|| EncodeError::MissingField {
                type_name: name.to_string(),
                field: field.name.clone(),
            })?;
            tokens.push(self.field_token(ty, v)?);
        }

        Ok(abi_encode(&tokens))
    }

    fn hash_struct(&mut self, name: &str, value: &Value) -> Result<Keccak256Hash, EncodeError> {
        let encoded = self.encode_struct(name, value)?;
        Ok(Keccak256Hash::hash(&encoded))
    }

    fn field_token(&mut self, ty: &TypeRef, value: &Value) -> Result<Token, EncodeError> {
        Ok(match ty {
            TypeRef::Scalar(Scalar::String) => Token::Dynamic(string_bytes(ty, value)?.to_vec()),
            TypeRef::Scalar(Scalar::Bytes) => Token::Word(self.element_hash(ty, value)?),
            TypeRef::Scalar(scalar) => Token::Word(scalar_word(*scalar, value)?),
            TypeRef::Struct(name) => Token::Word(self.hash_struct(name, value)?.0),
            TypeRef::Array(element) => match value {
                Value::Array(items) => Token::Word(self.hash_array(element, items)?.0),
                other => return Err(mismatch(ty, other)),
            },
        })
    }

    fn hash_array(
        &mut self,
        element: &TypeRef,
        items: &[Value],
    ) -> Result<Keccak256Hash, EncodeError> {
        let hashes = items
            .iter()
            .map(|item| self.element_hash(element, item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Keccak256Hash::hash_parts(hashes.iter().map(|h| &h[..])))
    }

    /// The 32 bytes one array element contributes.
    fn element_hash(&mut self, ty: &TypeRef, value: &Value) -> Result<[u8; 32], EncodeError> {
        Ok(match ty {
            TypeRef::Scalar(Scalar::String) | TypeRef::Scalar(Scalar::Bytes) => {
                Keccak256Hash::hash(string_bytes(ty, value)?).0
            }
            TypeRef::Scalar(scalar) => scalar_word(*scalar, value)?,
            TypeRef::Struct(name) => self.hash_struct(name, value)?.0,
            TypeRef::Array(_) => {
                return Err(crate::error::SchemaError::NestedArray(format!("{ty}[]")).into())
            }
        })
    }
}

fn mismatch(ty: &TypeRef, value: &Value) -> EncodeError {
    EncodeError::TypeMismatch {
        expected: ty.to_string(),
        got: value.kind().to_string(),
    }
}

/// Raw bytes of a `string` or `bytes` value.
fn string_bytes<'v>(ty: &TypeRef, value: &'v Value) -> Result<&'v [u8], EncodeError> {
    match (ty, value) {
        (TypeRef::Scalar(Scalar::String), Value::String(s)) => Ok(s.as_bytes()),
        (TypeRef::Scalar(Scalar::Bytes), Value::Bytes(b)) => Ok(b.as_slice()),
        _ => Err(mismatch(ty, value)),
    }
}

/// The ABI head word of a static scalar.
fn scalar_word(scalar: Scalar, value: &Value) -> Result<[u8; 32], EncodeError> {
    let ty = TypeRef::Scalar(scalar);
    let mut word = [0u8; 32];
    match (scalar, value) {
        (Scalar::Address, Value::Address(a)) => word[12..].copy_from_slice(a),
        (Scalar::Bool, Value::Bool(b)) => word[31] = u8::from(*b),
        (Scalar::Uint(_), Value::Uint(w)) => {
            let width = usize::from(scalar.bits().unwrap_or(256) / 8);
            if w[..32 - width].iter().any(|&b| b != 0) {
                return Err(EncodeError::OutOfRange(ty.to_string()));
            }
            word = *w;
        }
        (Scalar::Int(_), Value::Int(w)) => {
            let width = usize::from(scalar.bits().unwrap_or(256) / 8);
            let fill = if w[32 - width] & 0x80 != 0 { 0xff } else { 0x00 };
            if w[..32 - width].iter().any(|&b| b != fill) {
                return Err(EncodeError::OutOfRange(ty.to_string()));
            }
            word = *w;
        }
        (Scalar::FixedBytes(n), Value::FixedBytes(b)) => {
            if b.len() != usize::from(n) {
                return Err(EncodeError::FixedBytesLength {
                    ty: ty.to_string(),
                    expected: usize::from(n),
                    got: b.len(),
                });
            }
            word[..b.len()].copy_from_slice(b);
        }
        _ => return Err(mismatch(&ty, value)),
    }
    Ok(word)
}

/// The exact bytes a generated struct getter hashes.
pub fn encode_struct(
    type_name: &str,
    value: &Value,
    schema: &TypeSchema,
) -> Result<Vec<u8>, EncodeError> {
    Hasher::new(schema).encode_struct(type_name, value)
}

/// Struct hash ("packet hash") of a value of a composite type.
pub fn hash_struct(
    type_name: &str,
    value: &Value,
    schema: &TypeSchema,
) -> Result<Keccak256Hash, EncodeError> {
    Hasher::new(schema).hash_struct(type_name, value)
}

/// Hash of an array of `element`, as computed by its array getter.
pub fn hash_array(
    element: &TypeRef,
    items: &[Value],
    schema: &TypeSchema,
) -> Result<Keccak256Hash, EncodeError> {
    Hasher::new(schema).hash_array(element, items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person_schema() -> TypeSchema {
        TypeSchema::new().with_type("Person", [("name", "string"), ("wallet", "address")])
    }

    fn bob() -> Value {
        Value::structure([
            ("name", Value::string("Bob")),
            ("wallet", Value::Address([0xbb; 20])),
        ])
    }

    #[test]
    fn test_encode_struct_layout() {
        let encoded = encode_struct("Person", &bob(), &person_schema()).unwrap();
        // typehash | offset | address | len | "Bob" padded
        assert_eq!(encoded.len(), 5 * 32);
        assert_eq!(
            hex::encode(&encoded[..32]),
            "b9d8c78acf9b987311de6c7b45bb6a9c8e1bf361fa7fd3467a2163f994c79500"
        );
        assert_eq!(encoded[63], 0x60);
        assert_eq!(&encoded[64..76], &[0u8; 12]);
        assert_eq!(&encoded[76..96], &[0xbb; 20]);
        assert_eq!(encoded[127], 3);
        assert_eq!(&encoded[128..131], b"Bob");
        assert!(encoded[131..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_empty_array_hashes_empty_input() {
        let h = hash_array(&TypeRef::Struct("Person".into()), &[], &person_schema()).unwrap();
        assert_eq!(h, Keccak256Hash::empty());
    }

    #[test]
    fn test_array_hash_is_order_sensitive() {
        let schema = person_schema();
        let alice = Value::structure([
            ("name", Value::string("Alice")),
            ("wallet", Value::Address([0xaa; 20])),
        ]);
        let elem = TypeRef::Struct("Person".into());
        let ab = hash_array(&elem, &[alice.clone(), bob()], &schema).unwrap();
        let ba = hash_array(&elem, &[bob(), alice], &schema).unwrap();
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_array_hash_concatenates_element_hashes() {
        let schema = person_schema();
        let elem = TypeRef::Struct("Person".into());
        let one = hash_struct("Person", &bob(), &schema).unwrap();
        let arr = hash_array(&elem, &[bob(), bob()], &schema).unwrap();
        assert_eq!(arr, Keccak256Hash::hash_parts([&one.0[..], &one.0[..]]));
    }

    #[test]
    fn test_bytes_field_is_prehashed() {
        let schema =
            TypeSchema::new().with_type("Caveat", [("enforcer", "address"), ("terms", "bytes")]);
        let value = Value::structure([
            ("enforcer", Value::Address([0x11; 20])),
            ("terms", Value::Bytes(vec![1, 2, 3])),
        ]);
        let encoded = encode_struct("Caveat", &value, &schema).unwrap();
        assert_eq!(encoded.len(), 3 * 32);
        assert_eq!(&encoded[64..], Keccak256Hash::hash(&[1, 2, 3]).as_bytes());
    }

    #[test]
    fn test_integer_range_checks() {
        let schema = TypeSchema::new().with_type("T", [("small", "uint8"), ("signed", "int8")]);
        let ok = Value::structure([("small", Value::uint(255)), ("signed", Value::int(-128))]);
        hash_struct("T", &ok, &schema).unwrap();

        let too_big = Value::structure([("small", Value::uint(256)), ("signed", Value::int(0))]);
        assert_eq!(
            hash_struct("T", &too_big, &schema),
            Err(EncodeError::OutOfRange("uint8".into()))
        );

        let too_small = Value::structure([("small", Value::uint(0)), ("signed", Value::int(-129))]);
        assert_eq!(
            hash_struct("T", &too_small, &schema),
            Err(EncodeError::OutOfRange("int8".into()))
        );
    }

    #[test]
    fn test_negative_int_word_is_sign_extended() {
        assert_eq!(Value::int(-1), Value::Int([0xff; 32]));
    }

    #[test]
    fn test_fixed_bytes_are_left_aligned() {
        let schema = TypeSchema::new().with_type("T", [("selector", "bytes4")]);
        let value =
            Value::structure([("selector", Value::FixedBytes(vec![0xde, 0xad, 0xbe, 0xef]))]);
        let encoded = encode_struct("T", &value, &schema).unwrap();
        assert_eq!(&encoded[32..36], &[0xde, 0xad, 0xbe, 0xef]);
        assert!(encoded[36..].iter().all(|&b| b == 0));

        let short = Value::structure([("selector", Value::FixedBytes(vec![0xde]))]);
        assert!(matches!(
            hash_struct("T", &short, &schema),
            Err(EncodeError::FixedBytesLength { expected: 4, got: 1, .. })
        ));
    }

    #[test]
    fn test_missing_and_unexpected_fields() {
        let schema = person_schema();
        let missing = Value::structure([("name", Value::string("Bob"))]);
        assert!(matches!(
            hash_struct("Person", &missing, &schema),
            Err(EncodeError::MissingField { field, .. }) if field == "wallet"
        ));

        let extra = Value::structure([
            ("name", Value::string("Bob")),
            ("wallet", Value::Address([0; 20])),
            ("age", Value::uint(3)),
        ]);
        assert!(matches!(
            hash_struct("Person", &extra, &schema),
            Err(EncodeError::UnexpectedField { field, .. }) if field == "age"
        ));
    }

    #[test]
    fn test_from_json_matches_built_value() {
        let schema = person_schema();
        let json = serde_json::json!({
            "name": "Bob",
            "wallet": "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"
        });
        let value = Value::from_json(&json, &TypeRef::Struct("Person".into()), &schema).unwrap();
        assert_eq!(value, bob());
    }

    #[test]
    fn test_from_json_integers() {
        let schema = TypeSchema::new();
        let uint = TypeRef::parse("uint256").unwrap();
        assert_eq!(
            Value::from_json(&serde_json::json!(7), &uint, &schema).unwrap(),
            Value::uint(7)
        );
        assert_eq!(
            Value::from_json(&serde_json::json!("0x0100"), &uint, &schema).unwrap(),
            Value::uint(256)
        );
        assert_eq!(
            Value::from_json(
                &serde_json::json!("340282366920938463463374607431768211455"),
                &uint,
                &schema,
            )
            .unwrap(),
            Value::uint(u128::MAX)
        );
        assert!(Value::from_json(&serde_json::json!(-1), &uint, &schema).is_err());

        let int = TypeRef::parse("int").unwrap();
        assert_eq!(
            Value::from_json(&serde_json::json!(-5), &int, &schema).unwrap(),
            Value::int(-5)
        );
    }
}
