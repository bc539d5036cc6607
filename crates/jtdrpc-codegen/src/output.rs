//! Committing generated source to disk

use crate::error::{CodegenError, CodegenResult};
use std::io::Write;
use std::path::Path;

/// Write `contents` to `path` atomically.
///
/// The bytes go to a temporary file in the destination directory, which is
/// renamed over `path` only once fully written. If any step fails the
/// destination is left untouched.
pub fn write_atomic(path: impl AsRef<Path>, contents: &[u8]) -> CodegenResult<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file =
        tempfile::NamedTempFile::new_in(dir).map_err(|e| CodegenError::io(dir, e))?;
    let temp_path = file.path().to_path_buf();
    file.write_all(contents)
        .map_err(|e| CodegenError::io(&temp_path, e))?;
    file.flush().map_err(|e| CodegenError::io(&temp_path, e))?;
    file.persist(path)
        .map_err(|e| CodegenError::io(path, e.error))?;

    tracing::debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

#[cfg(test)]
#[path = "output/output_tests.rs"]
mod output_tests;
