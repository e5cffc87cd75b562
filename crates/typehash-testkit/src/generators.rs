//! Proptest generators for property-based testing.

use proptest::prelude::*;
use proptest::sample::Index;

use typehash_core::{FieldDescriptor, TypeSchema, Value};

/// Scalar field types, including the bare integer aliases.
pub const SCALAR_TYPES: &[&str] = &[
    "address", "bool", "uint", "uint8", "uint256", "int", "int64", "bytes1", "bytes32", "bytes",
    "string",
];

/// Generate a scalar type name.
pub fn scalar_type() -> impl Strategy<Value = &'static str> {
    prop::sample::select(SCALAR_TYPES)
}

/// Generate an acyclic schema of `T0`..`T5`.
///
/// Type `Ti` only references types with a lower index, so every generated
/// schema validates. Any field may be an array.
pub fn acyclic_schema() -> impl Strategy<Value = TypeSchema> {
    let field = (any::<bool>(), scalar_type(), any::<Index>(), any::<bool>());
    prop::collection::vec(prop::collection::vec(field, 1..=4), 1..=6).prop_map(|types| {
        let mut schema = TypeSchema::new();
        for (i, fields) in types.iter().enumerate() {
            let fields = fields
                .iter()
                .enumerate()
                .map(|(k, (reference, scalar, target, array))| {
                    let base = if *reference && i > 0 {
                        format!("T{}", target.index(i))
                    } else {
                        scalar.to_string()
                    };
                    let ty = if *array { format!("{base}[]") } else { base };
                    FieldDescriptor::new(format!("f{k}"), ty)
                })
                .collect();
            schema.insert(format!("T{i}"), fields);
        }
        schema
    })
}

/// Rebuild `schema` with its types declared in `order`.
pub fn reordered(schema: &TypeSchema, order: &[String]) -> TypeSchema {
    let mut out = TypeSchema::new();
    for name in order {
        if let Some(fields) = schema.fields(name) {
            out.insert(name.clone(), fields.to_vec());
        }
    }
    out
}

/// A schema together with the same types in a shuffled declaration order.
#[derive(Debug, Clone)]
pub struct SchemaCase {
    pub schema: TypeSchema,
    pub shuffled: TypeSchema,
}

impl Arbitrary for SchemaCase {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        acyclic_schema()
            .prop_flat_map(|schema| {
                let names: Vec<String> = schema.names().map(String::from).collect();
                (Just(schema), Just(names).prop_shuffle())
            })
            .prop_map(|(schema, order)| SchemaCase {
                shuffled: reordered(&schema, &order),
                schema,
            })
            .boxed()
    }
}

/// Generate a `Person { string name; address wallet; }` value.
pub fn person_value() -> impl Strategy<Value = Value> {
    ("[A-Za-z ]{0,40}", any::<[u8; 20]>()).prop_map(|(name, wallet)| {
        Value::structure([("name", Value::string(name)), ("wallet", Value::Address(wallet))])
    })
}

/// Generate between `min` and `max` distinct `Person` values.
pub fn distinct_people(min: usize, max: usize) -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(person_value(), min..=max).prop_filter("people must differ", |people| {
        !people.iter().enumerate().any(|(i, p)| people[..i].contains(p))
    })
}
