//! Packet-hash getter requests.
//!
//! Walking the schema produces an append-only list of [`GetterKey`]s, one
//! per getter some generated code will call. The list may repeat keys;
//! [`dedup_getters`](crate::dedup::dedup_getters) reduces it afterwards.

use std::fmt;

use typehash_core::{SchemaError, TypeRef, TypeSchema};

/// Identity of a generated getter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GetterKey {
    /// Getter for a named composite type.
    Struct(String),
    /// Getter for `T[]`, keyed by its element type.
    Array(TypeRef),
}

impl GetterKey {
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// The Solidity type the getter takes.
    pub fn type_ref(&self) -> TypeRef {
        match self {
            Self::Struct(name) => TypeRef::Struct(name.clone()),
            Self::Array(element) => TypeRef::Array(Box::new(element.clone())),
        }
    }

    /// Solidity function name, e.g. `GET_PERSON_ARRAY_PACKETHASH`.
    pub fn function_name(&self) -> String {
        getter_name(&self.type_ref())
    }
}

impl fmt::Display for GetterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Struct(name) => f.write_str(name),
            Self::Array(element) => write!(f, "{element}[]"),
        }
    }
}

/// Name of the getter that hashes values of `ty`.
pub fn getter_name(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Array(element) => {
            format!("GET_{}_ARRAY_PACKETHASH", element.to_string().to_uppercase())
        }
        other => format!("GET_{}_PACKETHASH", other.to_string().to_uppercase()),
    }
}

/// Request the getters needed to hash `type_name`.
///
/// For a composite this pushes its own getter, an array getter for every
/// array field, and recurses into every referenced composite. For an
/// array name (`T[]`) it delegates to [`emit_array_getter`]; arrays have
/// no fields to scan.
pub fn emit_getter(
    type_name: &str,
    schema: &TypeSchema,
    working: &mut Vec<GetterKey>,
) -> Result<(), SchemaError> {
    match TypeRef::parse(type_name)? {
        TypeRef::Array(element) => emit_array_getter(&element, schema, working),
        TypeRef::Struct(name) => {
            let mut stack = Vec::new();
            walk(&name, schema, working, &mut stack)
        }
        TypeRef::Scalar(_) => Err(SchemaError::NotAComposite(type_name.to_string())),
    }
}

/// Request the getter for `element[]`, and the element's own getters if it
/// is a composite.
pub fn emit_array_getter(
    element: &TypeRef,
    schema: &TypeSchema,
    working: &mut Vec<GetterKey>,
) -> Result<(), SchemaError> {
    if element.is_array() {
        return Err(SchemaError::NestedArray(format!("{element}[]")));
    }
    working.push(GetterKey::Array(element.clone()));
    match element {
        TypeRef::Struct(name) => walk(name, schema, working, &mut Vec::new()),
        _ => Ok(()),
    }
}

fn walk(
    name: &str,
    schema: &TypeSchema,
    working: &mut Vec<GetterKey>,
    stack: &mut Vec<String>,
) -> Result<(), SchemaError> {
    if let Some(start) = stack.iter().position(|n| n == name) {
        let mut path = stack[start..].to_vec();
        path.push(name.to_string());
        return Err(SchemaError::Cycle { path });
    }

    let fields = schema.resolve_fields(name)?;
    working.push(GetterKey::Struct(name.to_string()));

    stack.push(name.to_string());
    for (_, ty) in &fields {
        if let TypeRef::Array(element) = ty {
            working.push(GetterKey::Array((**element).clone()));
        }
        if let Some(referenced) = ty.struct_name() {
            walk(referenced, schema, working, stack)?;
        }
    }
    stack.pop();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> TypeSchema {
        TypeSchema::new()
            .with_type("Group", [("name", "string"), ("members", "Person[]")])
            .with_type("Person", [("name", "string"), ("wallet", "address")])
    }

    fn person() -> GetterKey {
        GetterKey::Struct("Person".into())
    }

    fn person_array() -> GetterKey {
        GetterKey::Array(TypeRef::Struct("Person".into()))
    }

    #[test]
    fn test_getter_names() {
        assert_eq!(person().function_name(), "GET_PERSON_PACKETHASH");
        assert_eq!(person_array().function_name(), "GET_PERSON_ARRAY_PACKETHASH");
        assert_eq!(
            GetterKey::Array(TypeRef::parse("uint256").unwrap()).function_name(),
            "GET_UINT256_ARRAY_PACKETHASH"
        );
        assert_eq!(person_array().to_string(), "Person[]");
    }

    #[test]
    fn test_leaf_struct_requests_only_itself() {
        let mut working = Vec::new();
        emit_getter("Person", &group(), &mut working).unwrap();
        assert_eq!(working, vec![person()]);
    }

    #[test]
    fn test_array_field_requests_array_and_element() {
        let mut working = Vec::new();
        emit_getter("Group", &group(), &mut working).unwrap();
        assert_eq!(
            working,
            vec![GetterKey::Struct("Group".into()), person_array(), person()]
        );
    }

    #[test]
    fn test_array_name_does_not_scan_fields() {
        let mut working = Vec::new();
        emit_getter("Person[]", &group(), &mut working).unwrap();
        assert_eq!(working, vec![person_array(), person()]);
    }

    #[test]
    fn test_scalar_array_has_no_element_getter() {
        let schema = TypeSchema::new().with_type("Batch", [("targets", "address[]")]);
        let mut working = Vec::new();
        emit_getter("Batch", &schema, &mut working).unwrap();
        assert_eq!(
            working,
            vec![
                GetterKey::Struct("Batch".into()),
                GetterKey::Array(TypeRef::parse("address").unwrap()),
            ]
        );
    }

    #[test]
    fn test_unknown_reference_fails() {
        let schema = TypeSchema::new().with_type("Group", [("members", "Person[]")]);
        let mut working = Vec::new();
        assert!(matches!(
            emit_getter("Group", &schema, &mut working),
            Err(SchemaError::UnknownType { .. })
        ));
    }

    #[test]
    fn test_scalar_is_not_a_composite() {
        let mut working = Vec::new();
        assert_eq!(
            emit_getter("address", &group(), &mut working),
            Err(SchemaError::NotAComposite("address".into()))
        );
    }

    #[test]
    fn test_cycle_detected_without_validation() {
        let schema = TypeSchema::new().with_type("Node", [("children", "Node[]")]);
        let mut working = Vec::new();
        assert_eq!(
            emit_getter("Node", &schema, &mut working),
            Err(SchemaError::Cycle {
                path: vec!["Node".into(), "Node".into()]
            })
        );
    }
}
