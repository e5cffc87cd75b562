//! In-place rewriting of a target contract.
//!
//! The target is read once. Injection runs entirely in memory; the file is
//! written only if injection succeeded and changed something, and then via
//! a temporary file in the same directory persisted over the original, so
//! a failed run never leaves a truncated contract behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{CodegenError, Result};
use crate::generate::GeneratedCode;
use crate::inject::{inject, RegionMarkers};

/// What [`update_file`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The regions changed and the file was rewritten.
    Updated,
    /// The file already held this output; nothing was written.
    Unchanged,
}

fn render_into(
    path: &Path,
    code: &GeneratedCode,
    markers: &RegionMarkers,
) -> Result<(String, String)> {
    let original = fs::read_to_string(path).map_err(CodegenError::io(path))?;
    let updated = inject(&original, &code.setup_block(), &code.body_block(), markers)?;
    Ok((original, updated))
}

/// Report whether `path` is up to date with `code`, without writing.
pub fn check_file(
    path: &Path,
    code: &GeneratedCode,
    markers: &RegionMarkers,
) -> Result<UpdateOutcome> {
    let (original, updated) = render_into(path, code, markers)?;
    Ok(if original == updated {
        UpdateOutcome::Unchanged
    } else {
        UpdateOutcome::Updated
    })
}

/// Replace the generated regions of `path` with `code`.
pub fn update_file(
    path: &Path,
    code: &GeneratedCode,
    markers: &RegionMarkers,
) -> Result<UpdateOutcome> {
    let (original, updated) = render_into(path, code, markers)?;
    if original == updated {
        debug!(path = %path.display(), "target already up to date");
        return Ok(UpdateOutcome::Unchanged);
    }

    write_atomic(path, updated.as_bytes())?;
    info!(
        path = %path.display(),
        types = code.types.len(),
        getters = code.getters.len(),
        "updated generated regions"
    );
    Ok(UpdateOutcome::Updated)
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path).map_err(CodegenError::io(path))?.permissions();

    let mut tmp = NamedTempFile::new_in(dir).map_err(CodegenError::io(dir))?;
    tmp.write_all(contents).map_err(CodegenError::io(tmp.path()))?;
    tmp.as_file().sync_all().map_err(CodegenError::io(tmp.path()))?;
    fs::set_permissions(tmp.path(), permissions).map_err(CodegenError::io(tmp.path()))?;
    tmp.persist(path)
        .map_err(|e| CodegenError::io(path)(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generate, CodegenConfig};
    use typehash_core::TypeSchema;

    const TARGET: &str = "contract C {\n\
                          // BEGIN EIP712 AUTOGENERATED SETUP\n\
                          // END EIP712 AUTOGENERATED SETUP\n\
                          // BEGIN EIP712 AUTOGENERATED BODY\n\
                          // END EIP712 AUTOGENERATED BODY\n\
                          }\n";

    fn person_code() -> GeneratedCode {
        let schema =
            TypeSchema::new().with_type("Person", [("name", "string"), ("wallet", "address")]);
        generate(&schema, &CodegenConfig::default()).unwrap()
    }

    #[test]
    fn test_update_then_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("C.sol");
        fs::write(&path, TARGET).unwrap();
        let markers = RegionMarkers::default();
        let code = person_code();

        assert_eq!(check_file(&path, &code, &markers).unwrap(), UpdateOutcome::Updated);
        assert_eq!(update_file(&path, &code, &markers).unwrap(), UpdateOutcome::Updated);
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("struct Person {"));
        assert!(written.ends_with("// END EIP712 AUTOGENERATED BODY\n}\n"));

        assert_eq!(check_file(&path, &code, &markers).unwrap(), UpdateOutcome::Unchanged);
        assert_eq!(update_file(&path, &code, &markers).unwrap(), UpdateOutcome::Unchanged);
        assert_eq!(fs::read_to_string(&path).unwrap(), written);
    }

    #[test]
    fn test_malformed_target_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("C.sol");
        let broken = "// BEGIN EIP712 AUTOGENERATED SETUP\nkeep me\n";
        fs::write(&path, broken).unwrap();

        let err = update_file(&path, &person_code(), &RegionMarkers::default()).unwrap_err();
        assert!(matches!(err, CodegenError::MalformedTarget(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), broken);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.sol");
        let err = update_file(&path, &person_code(), &RegionMarkers::default()).unwrap_err();
        assert!(matches!(err, CodegenError::Io { .. }));
        assert!(!path.exists());
    }
}
