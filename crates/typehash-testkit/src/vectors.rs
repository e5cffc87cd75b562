//! Golden test vectors for deterministic verification.
//!
//! Type hashes are independent of generation order and must match any
//! other EIP-712 implementation. Struct hashes are what the generated
//! getters return: `string` fields go through `abi.encode` as dynamic
//! values, `bytes` fields are hashed first.

use typehash_core::{
    hash_struct, CanonicalEncoder, Keccak256Hash, TypeHash, TypeRef, TypeSchema, Value,
};

use crate::fixtures::{delegation_schema, group_schema, mail_schema};

/// A canonical type string and its hash.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Schema the type is drawn from.
    pub schema: fn() -> TypeSchema,
    /// Primary type.
    pub type_name: &'static str,
    /// Expected canonical type string.
    pub type_string: &'static str,
    /// Expected type hash (hex, no prefix).
    pub type_hash: &'static str,
}

/// A message and its expected struct hash.
#[derive(Debug, Clone)]
pub struct MessageVector {
    pub name: &'static str,
    pub schema: fn() -> TypeSchema,
    pub type_name: &'static str,
    /// Message as JSON, addresses and byte strings in `0x` hex.
    pub message: &'static str,
    /// Expected struct hash (hex, no prefix).
    pub struct_hash: &'static str,
}

impl GoldenVector {
    /// The expected type hash, parsed.
    pub fn expected_type_hash(&self) -> TypeHash {
        TypeHash::from_hex(self.type_hash).expect("vector type hash is hex")
    }
}

impl MessageVector {
    /// The expected struct hash, parsed.
    pub fn expected_struct_hash(&self) -> Keccak256Hash {
        Keccak256Hash::from_hex(self.struct_hash).expect("vector struct hash is hex")
    }
}

/// Get all type-hash vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "EIP712Domain",
            schema: delegation_schema,
            type_name: "EIP712Domain",
            type_string: "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)",
            type_hash: "8b73c3c69bb8fe3d512ecc4cf759cc79239f7b179b0ffacaa9a75d522b39400f",
        },
        GoldenVector {
            name: "Mail with repeated Person",
            schema: mail_schema,
            type_name: "Mail",
            type_string: "Mail(Person from,Person to,string contents)Person(string name,address wallet)",
            type_hash: "a0cedeb2dc280ba39b857546d74f5549c3a1d7bdc2dd96bf881f76108e23dac2",
        },
        GoldenVector {
            name: "Person leaf",
            schema: mail_schema,
            type_name: "Person",
            type_string: "Person(string name,address wallet)",
            type_hash: "b9d8c78acf9b987311de6c7b45bb6a9c8e1bf361fa7fd3467a2163f994c79500",
        },
        GoldenVector {
            name: "Group with Person array",
            schema: group_schema,
            type_name: "Group",
            type_string: "Group(string name,Person[] members)Person(string name,address wallet)",
            type_hash: "2bd05a717465ea653e2e3440204c83d00ba0578324410fa8e94dbce020d9ddd6",
        },
        GoldenVector {
            name: "Invocation",
            schema: delegation_schema,
            type_name: "Invocation",
            type_string: "Invocation(Transaction transaction,SignedDelegation[] authority)\
                          Caveat(address enforcer,bytes terms)\
                          Delegation(address delegate,bytes32 authority,Caveat[] caveats)\
                          SignedDelegation(Delegation delegation,bytes signature)\
                          Transaction(address to,uint256 gasLimit,bytes data)",
            type_hash: "d97dd99b404d177890f06a8f0fc8e5ed0333fb2ebb6684360709066e8984f594",
        },
        GoldenVector {
            name: "Invocations",
            schema: delegation_schema,
            type_name: "Invocations",
            type_string: "Invocations(Invocation[] batch,ReplayProtection replayProtection)\
                          Caveat(address enforcer,bytes terms)\
                          Delegation(address delegate,bytes32 authority,Caveat[] caveats)\
                          Invocation(Transaction transaction,SignedDelegation[] authority)\
                          ReplayProtection(uint nonce,uint queue)\
                          SignedDelegation(Delegation delegation,bytes signature)\
                          Transaction(address to,uint256 gasLimit,bytes data)",
            type_hash: "08c69a206c06f5334b35ceb1186181a713b21aff02cf66285f375084fbef2eb8",
        },
        GoldenVector {
            name: "SignedInvocation",
            schema: delegation_schema,
            type_name: "SignedInvocation",
            type_string: "SignedInvocation(Invocations invocations,bytes signature)\
                          Caveat(address enforcer,bytes terms)\
                          Delegation(address delegate,bytes32 authority,Caveat[] caveats)\
                          Invocation(Transaction transaction,SignedDelegation[] authority)\
                          Invocations(Invocation[] batch,ReplayProtection replayProtection)\
                          ReplayProtection(uint nonce,uint queue)\
                          SignedDelegation(Delegation delegation,bytes signature)\
                          Transaction(address to,uint256 gasLimit,bytes data)",
            type_hash: "c32b6dfe0f988d1f2b13248cddd88e320ff0ae86e3ccfe38bab77a80f4477d44",
        },
        GoldenVector {
            name: "Transaction",
            schema: delegation_schema,
            type_name: "Transaction",
            type_string: "Transaction(address to,uint256 gasLimit,bytes data)",
            type_hash: "b16dfdb3b8fa033fe30ac976cd4a50ad256b6811c80d90fcd0b323eec190047d",
        },
        GoldenVector {
            name: "ReplayProtection keeps uint alias",
            schema: delegation_schema,
            type_name: "ReplayProtection",
            type_string: "ReplayProtection(uint nonce,uint queue)",
            type_hash: "e8d3d963b33868fb116316bc3fd55e8f49123f30e4418f71e140d54b7cd3b2b9",
        },
        GoldenVector {
            name: "Delegation",
            schema: delegation_schema,
            type_name: "Delegation",
            type_string: "Delegation(address delegate,bytes32 authority,Caveat[] caveats)\
                          Caveat(address enforcer,bytes terms)",
            type_hash: "409f5114779a253e700d775d7845e6efc1e83685ac59868d2df3d4de51c7d621",
        },
        GoldenVector {
            name: "Caveat",
            schema: delegation_schema,
            type_name: "Caveat",
            type_string: "Caveat(address enforcer,bytes terms)",
            type_hash: "80ad7e1b04ee6d994a125f4714ca0720908bd80ed16063ec8aee4b88e9253e2d",
        },
        GoldenVector {
            name: "SignedDelegation",
            schema: delegation_schema,
            type_name: "SignedDelegation",
            type_string: "SignedDelegation(Delegation delegation,bytes signature)\
                          Caveat(address enforcer,bytes terms)\
                          Delegation(address delegate,bytes32 authority,Caveat[] caveats)",
            type_hash: "3c36a06e1d288b0f94f565588317a46ad11bc3c96992109f9a2365a2737259a7",
        },
    ]
}

/// Get all struct-hash vectors.
pub fn message_vectors() -> Vec<MessageVector> {
    vec![
        MessageVector {
            name: "Person Bob",
            schema: group_schema,
            type_name: "Person",
            message: r#"{ "name": "Bob", "wallet": "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb" }"#,
            struct_hash: "a60b95bc47d73886d6ae321b7dc9ed2f590f9ee8f8ab4b5f295c70a6777633c6",
        },
        MessageVector {
            name: "Group of Bob and Alice",
            schema: group_schema,
            type_name: "Group",
            message: r#"{
                "name": "Friends",
                "members": [
                    { "name": "Bob", "wallet": "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb" },
                    { "name": "Alice", "wallet": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa" }
                ]
            }"#,
            struct_hash: "b8f758a933866a15de6e488d5577a75b9478d307fc5426cd8b5138e7a5ece303",
        },
        MessageVector {
            name: "Group of Alice and Bob",
            schema: group_schema,
            type_name: "Group",
            message: r#"{
                "name": "Friends",
                "members": [
                    { "name": "Alice", "wallet": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa" },
                    { "name": "Bob", "wallet": "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb" }
                ]
            }"#,
            struct_hash: "f73dc54e5f16e78b9e2b20fcd7776c6d21597aca65284163d682661adfcd69f5",
        },
        MessageVector {
            name: "Empty group",
            schema: group_schema,
            type_name: "Group",
            message: r#"{ "name": "Nobody", "members": [] }"#,
            struct_hash: "26b3c210ebaa4e963e82ab8810ee908ab60a9eb04e9bc101da62de4c2524059b",
        },
        MessageVector {
            name: "Mail from Cow to Bob",
            schema: mail_schema,
            type_name: "Mail",
            message: r#"{
                "from": { "name": "Cow", "wallet": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826" },
                "to": { "name": "Bob", "wallet": "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB" },
                "contents": "Hello, Bob!"
            }"#,
            struct_hash: "71d8f33735c85a8c6c715a87bb2d4b72fcee19be4690d2348ad2541ab4bcbb1b",
        },
        MessageVector {
            name: "Caveat message",
            schema: delegation_schema,
            type_name: "Caveat",
            message: r#"{ "enforcer": "0x1111111111111111111111111111111111111111", "terms": "0xdeadbeef" }"#,
            struct_hash: "73dc4f0d27d421417cc63bcf725a9b9c82460ee60b5594a46b14e2468f61054d",
        },
        MessageVector {
            name: "Delegation with one caveat",
            schema: delegation_schema,
            type_name: "Delegation",
            message: r#"{
                "delegate": "0x2222222222222222222222222222222222222222",
                "authority": "0x0000000000000000000000000000000000000000000000000000000000000000",
                "caveats": [
                    { "enforcer": "0x1111111111111111111111111111111111111111", "terms": "0xdeadbeef" }
                ]
            }"#,
            struct_hash: "d01e0b474c9d1f44b900fb4b0dddae580eb74c0c20a31bd253c19f2c061bc194",
        },
        MessageVector {
            name: "SignedDelegation message",
            schema: delegation_schema,
            type_name: "SignedDelegation",
            message: r#"{
                "delegation": {
                    "delegate": "0x2222222222222222222222222222222222222222",
                    "authority": "0x0000000000000000000000000000000000000000000000000000000000000000",
                    "caveats": [
                        { "enforcer": "0x1111111111111111111111111111111111111111", "terms": "0xdeadbeef" }
                    ]
                },
                "signature": "0xabcd"
            }"#,
            struct_hash: "509237f2d05e9d2097dec8fbf53470030643adc68db8dccdd02b7681bafd3c39",
        },
        MessageVector {
            name: "ReplayProtection",
            schema: delegation_schema,
            type_name: "ReplayProtection",
            message: r#"{ "nonce": 1, "queue": 0 }"#,
            struct_hash: "4ee8c8a695d77565d8e52d9b662cba3662a058c62557c90ec4e71af987c490f5",
        },
    ]
}

/// Compute the type string and hash for a vector.
pub fn compute_type_hash(vector: &GoldenVector) -> (String, String) {
    let schema = (vector.schema)();
    let mut encoder = CanonicalEncoder::new(&schema);
    let type_string = encoder
        .encode_type(vector.type_name)
        .expect("vector type encodes");
    let hash = encoder.type_hash(vector.type_name).expect("vector type hashes");
    (type_string, hash.to_hex())
}

/// Compute the struct hash for a message vector.
pub fn compute_struct_hash(vector: &MessageVector) -> String {
    let schema = (vector.schema)();
    let json: serde_json::Value =
        serde_json::from_str(vector.message).expect("vector message is JSON");
    let ty = TypeRef::Struct(vector.type_name.to_string());
    let value = Value::from_json(&json, &ty, &schema).expect("vector message converts");
    hash_struct(vector.type_name, &value, &schema)
        .expect("vector message hashes")
        .to_hex()
}

/// Verify all vectors. Returns (name, passed, detail) per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let mut results = Vec::new();

    for vector in all_vectors() {
        let (type_string, hash) = compute_type_hash(&vector);
        let passed = type_string == vector.type_string
            && TypeHash::from_hex(&hash) == Ok(vector.expected_type_hash());
        let detail = if passed {
            hash
        } else {
            format!("got {type_string} / {hash}")
        };
        results.push((vector.name.to_string(), passed, detail));
    }

    for vector in message_vectors() {
        let hash = compute_struct_hash(&vector);
        let passed = Keccak256Hash::from_hex(&hash) == Ok(vector.expected_struct_hash());
        results.push((vector.name.to_string(), passed, hash));
    }

    results
}
