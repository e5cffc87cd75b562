//! Solidity source rendering.
//!
//! Every function here returns an opaque text block. Blocks are joined
//! with newlines when injected, so a block's trailing newline produces a
//! blank separator line in the target file.

use typehash_core::{
    EncodingClass, FieldDescriptor, Scalar, SchemaError, TypeHash, TypeRef, TypeSchema,
};

use crate::config::{CodegenConfig, TypeHashStyle};
use crate::getter::{getter_name, GetterKey};

/// `PERSON_TYPEHASH`
pub fn type_hash_constant(type_name: &str) -> String {
    format!("{}_TYPEHASH", type_name.to_uppercase())
}

/// The struct declaration, fields in declaration order.
pub fn render_struct(type_name: &str, fields: &[FieldDescriptor]) -> String {
    let body: String = fields
        .iter()
        .map(|f| format!("  {} {};\n", f.ty, f.name))
        .collect();
    format!("struct {type_name} {{\n{body}}}\n")
}

/// The `bytes32 constant` bound to a type's hash.
pub fn render_type_hash(
    type_name: &str,
    type_string: &str,
    type_hash: TypeHash,
    style: TypeHashStyle,
) -> String {
    let constant = type_hash_constant(type_name);
    match style {
        TypeHashStyle::Expression => {
            format!("bytes32 constant {constant} = keccak256(\"{type_string}\");\n")
        }
        TypeHashStyle::Literal => format!(
            "bytes32 constant {constant} = {}; // {type_string}\n",
            type_hash.to_literal()
        ),
    }
}

/// Expression contributing one struct field to `abi.encode`.
pub fn field_expression(field_name: &str, ty: &TypeRef) -> String {
    let value = format!("_input.{field_name}");
    match ty.class() {
        EncodingClass::Direct => value,
        EncodingClass::Hashed => format!("keccak256({value})"),
        EncodingClass::Getter => format!("{}({value})", getter_name(ty)),
    }
}

/// Expression yielding the 32 bytes one array element contributes.
pub fn element_expression(element: &TypeRef) -> String {
    let value = "_input[i]";
    match element {
        TypeRef::Scalar(Scalar::String) => format!("keccak256(bytes({value}))"),
        TypeRef::Scalar(Scalar::Bytes) => format!("keccak256({value})"),
        TypeRef::Scalar(_) => format!("abi.encode({value})"),
        other => format!("{}({value})", getter_name(other)),
    }
}

fn signature(key: &GetterKey, config: &CodegenConfig) -> String {
    format!(
        "  function {} ({} memory _input) {} pure returns (bytes32) {{\n",
        key.function_name(),
        key.type_ref(),
        config.visibility
    )
}

/// Render one getter function.
pub fn render_getter(
    key: &GetterKey,
    schema: &TypeSchema,
    config: &CodegenConfig,
) -> Result<String, SchemaError> {
    match key {
        GetterKey::Struct(name) => render_struct_getter(key, name, schema, config),
        GetterKey::Array(element) => Ok(render_array_getter(key, element, config)),
    }
}

fn render_struct_getter(
    key: &GetterKey,
    type_name: &str,
    schema: &TypeSchema,
    config: &CodegenConfig,
) -> Result<String, SchemaError> {
    let fields = schema.resolve_fields(type_name)?;
    let constant = type_hash_constant(type_name);

    let mut arguments = vec![constant.clone()];
    arguments.extend(fields.iter().map(|(f, ty)| field_expression(&f.name, ty)));

    let mut out = String::from("\n");
    out.push_str(&signature(key, config));
    if config.debug_logging {
        out.push_str(&format!("    console.log(\"{type_name} typehash: \");\n"));
        out.push_str(&format!("    console.logBytes32({constant});\n"));
    }
    out.push_str("    bytes memory encoded = abi.encode(\n");
    out.push_str(&format!("      {}\n", arguments.join(",\n      ")));
    out.push_str("    );\n");
    if config.debug_logging {
        out.push_str(&format!("    console.log(\"Encoded {type_name}: \");\n"));
        out.push_str("    console.logBytes(encoded);\n");
    }
    out.push_str("    return keccak256(encoded);\n");
    out.push_str("  }");
    Ok(out)
}

fn render_array_getter(key: &GetterKey, element: &TypeRef, config: &CodegenConfig) -> String {
    let mut out = String::from("\n");
    out.push_str(&signature(key, config));
    out.push_str("    bytes memory encoded;\n");
    out.push_str("    for (uint i = 0; i < _input.length; i++) {\n");
    out.push_str("      encoded = bytes.concat(\n");
    out.push_str("        encoded,\n");
    out.push_str(&format!("        {}\n", element_expression(element)));
    out.push_str("      );\n");
    out.push_str("    }\n");
    if config.debug_logging {
        out.push_str(&format!("    console.log(\"Encoded {key}: \");\n"));
        out.push_str("    console.logBytes(encoded);\n");
    }
    out.push_str("    bytes32 hash = keccak256(encoded);\n");
    out.push_str("    return hash;\n");
    out.push_str("  }");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> TypeSchema {
        TypeSchema::new()
            .with_type("Group", [("name", "string"), ("members", "Person[]"), ("proof", "bytes")])
            .with_type("Person", [("name", "string"), ("wallet", "address")])
    }

    #[test]
    fn test_render_struct() {
        let schema = group();
        assert_eq!(
            render_struct("Person", schema.fields("Person").unwrap()),
            "struct Person {\n  string name;\n  address wallet;\n}\n"
        );
    }

    #[test]
    fn test_render_type_hash_styles() {
        let ts = "Person(string name,address wallet)";
        let hash = TypeHash::of(ts);
        assert_eq!(
            render_type_hash("Person", ts, hash, TypeHashStyle::Expression),
            "bytes32 constant PERSON_TYPEHASH = keccak256(\"Person(string name,address wallet)\");\n"
        );
        assert_eq!(
            render_type_hash("Person", ts, hash, TypeHashStyle::Literal),
            "bytes32 constant PERSON_TYPEHASH = \
             0xb9d8c78acf9b987311de6c7b45bb6a9c8e1bf361fa7fd3467a2163f994c79500; \
             // Person(string name,address wallet)\n"
        );
    }

    #[test]
    fn test_field_expressions_by_class() {
        let p = |t: &str| TypeRef::parse(t).unwrap();
        assert_eq!(field_expression("name", &p("string")), "_input.name");
        assert_eq!(field_expression("amount", &p("uint")), "_input.amount");
        assert_eq!(field_expression("authority", &p("bytes32")), "_input.authority");
        assert_eq!(field_expression("terms", &p("bytes")), "keccak256(_input.terms)");
        assert_eq!(
            field_expression("delegation", &p("Delegation")),
            "GET_DELEGATION_PACKETHASH(_input.delegation)"
        );
        assert_eq!(
            field_expression("caveats", &p("Caveat[]")),
            "GET_CAVEAT_ARRAY_PACKETHASH(_input.caveats)"
        );
    }

    #[test]
    fn test_element_expressions() {
        let p = |t: &str| TypeRef::parse(t).unwrap();
        assert_eq!(element_expression(&p("Person")), "GET_PERSON_PACKETHASH(_input[i])");
        assert_eq!(element_expression(&p("address")), "abi.encode(_input[i])");
        assert_eq!(element_expression(&p("string")), "keccak256(bytes(_input[i]))");
        assert_eq!(element_expression(&p("bytes")), "keccak256(_input[i])");
    }

    #[test]
    fn test_struct_getter_text() {
        let getter = render_getter(
            &GetterKey::Struct("Group".into()),
            &group(),
            &CodegenConfig::default(),
        )
        .unwrap();
        assert_eq!(
            getter,
            "\n  function GET_GROUP_PACKETHASH (Group memory _input) public pure returns (bytes32) {\n\
             \x20   bytes memory encoded = abi.encode(\n\
             \x20     GROUP_TYPEHASH,\n\
             \x20     _input.name,\n\
             \x20     GET_PERSON_ARRAY_PACKETHASH(_input.members),\n\
             \x20     keccak256(_input.proof)\n\
             \x20   );\n\
             \x20   return keccak256(encoded);\n\
             \x20 }"
        );
    }

    #[test]
    fn test_array_getter_text() {
        let key = GetterKey::Array(TypeRef::Struct("Person".into()));
        let getter = render_getter(&key, &group(), &CodegenConfig::default()).unwrap();
        assert!(getter.starts_with(
            "\n  function GET_PERSON_ARRAY_PACKETHASH (Person[] memory _input) public pure returns (bytes32) {\n"
        ));
        assert!(getter.contains("        GET_PERSON_PACKETHASH(_input[i])\n"));
        assert!(getter.contains("    bytes32 hash = keccak256(encoded);\n"));
        assert_eq!(getter.matches("GET_PERSON_PACKETHASH(").count(), 1);
    }

    #[test]
    fn test_debug_logging_and_visibility() {
        let config = CodegenConfig {
            debug_logging: true,
            visibility: crate::config::Visibility::Internal,
            ..CodegenConfig::default()
        };
        let getter = render_getter(&GetterKey::Struct("Person".into()), &group(), &config).unwrap();
        assert!(getter.contains(") internal pure returns (bytes32)"));
        assert!(getter.contains("console.logBytes32(PERSON_TYPEHASH);"));
        assert!(getter.contains("console.logBytes(encoded);"));

        let quiet = render_getter(
            &GetterKey::Struct("Person".into()),
            &group(),
            &CodegenConfig::default(),
        )
        .unwrap();
        assert!(!quiet.contains("console."));
    }
}
