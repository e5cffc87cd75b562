//! Schema validation: naming, type resolution and cycle checks.

use std::collections::{HashMap, HashSet};

use crate::error::SchemaError;
use crate::schema::{is_identifier, Scalar, TypeRef, TypeSchema};

/// Validate a whole schema before any code is generated.
///
/// This performs, per type in declaration order:
/// - Type name check (identifier, not a scalar name)
/// - Non-empty field list
/// - Field name checks (identifier, unique)
/// - Field type parsing and reference resolution
///
/// and finally rejects generated-name collisions and cyclic type graphs.
pub fn validate_schema(schema: &TypeSchema) -> Result<(), SchemaError> {
    for (name, fields) in schema.iter() {
        // 1. Type name
        if !is_identifier(name) || !matches!(Scalar::parse(name), Ok(None)) {
            return Err(SchemaError::InvalidTypeName(name.to_string()));
        }

        // 2. Solidity has no empty structs
        if fields.is_empty() {
            return Err(SchemaError::EmptyType(name.to_string()));
        }

        // 3. Field names
        let mut seen = HashSet::new();
        for field in fields {
            if !is_identifier(&field.name) {
                return Err(SchemaError::InvalidFieldName {
                    type_name: name.to_string(),
                    field: field.name.clone(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    type_name: name.to_string(),
                    field: field.name.clone(),
                });
            }
        }

        // 4. Field types
        schema.resolve_fields(name)?;
    }

    // 5. Generated names
    check_generated_names(schema)?;

    // 6. Cycles
    match find_cycle(schema) {
        Some(path) => Err(SchemaError::Cycle { path }),
        None => Ok(()),
    }
}

/// Reject types whose upper-cased Solidity identifiers would clash.
///
/// A composite `T` owns the stem `T` (`T_TYPEHASH`, `GET_T_PACKETHASH`),
/// an array `E[]` owns `E_ARRAY` (`GET_E_ARRAY_PACKETHASH`).
fn check_generated_names(schema: &TypeSchema) -> Result<(), SchemaError> {
    let mut owners: HashMap<String, String> = HashMap::new();
    let mut claim = |stem: String, owner: String| match owners.get(&stem) {
        Some(first) if *first != owner => Err(SchemaError::NameCollision {
            first: first.clone(),
            second: owner,
            stem,
        }),
        Some(_) => Ok(()),
        None => {
            owners.insert(stem, owner);
            Ok(())
        }
    };

    for (name, fields) in schema.iter() {
        claim(name.to_uppercase(), name.to_string())?;
        for field in fields {
            if let TypeRef::Array(element) = field.type_ref()? {
                claim(
                    format!("{}_ARRAY", element.to_string().to_uppercase()),
                    format!("{element}[]"),
                )?;
            }
        }
    }
    Ok(())
}

/// Find a reference cycle, if any, using DFS with a recursion stack.
///
/// The returned path starts and ends with the same type name.
pub fn find_cycle(schema: &TypeSchema) -> Option<Vec<String>> {
    let adjacency: HashMap<&str, Vec<&str>> = schema
        .iter()
        .map(|(name, fields)| {
            let refs = fields
                .iter()
                .filter_map(|f| f.type_ref().ok())
                .filter_map(|ty| ty.struct_name().map(str::to_string))
                .filter_map(|r| schema.names().find(|n| *n == r))
                .collect();
            (name, refs)
        })
        .collect();

    let mut visited = HashSet::new();
    let mut path = Vec::new();
    for node in schema.names() {
        if !visited.contains(node) {
            if let Some(cycle) = dfs(node, &adjacency, &mut visited, &mut path) {
                return Some(cycle);
            }
        }
    }
    None
}

fn dfs<'a>(
    node: &'a str,
    adjacency: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    visited.insert(node);
    path.push(node);

    for &neighbor in adjacency.get(node).into_iter().flatten() {
        if let Some(start) = path.iter().position(|n| *n == neighbor) {
            let mut cycle: Vec<String> = path[start..].iter().map(|s| s.to_string()).collect();
            cycle.push(neighbor.to_string());
            return Some(cycle);
        }
        if !visited.contains(neighbor) {
            if let Some(cycle) = dfs(neighbor, adjacency, visited, path) {
                return Some(cycle);
            }
        }
    }

    path.pop();
    None
}
