//! `.scsyndef` files on disk.

use std::path::{Path, PathBuf};

use scgraph_core::{Result, SynthDef, SynthDefError};

use crate::registry::decompile_all;

/// File extension the server loads definitions from.
pub const SYNTHDEF_EXTENSION: &str = "scsyndef";

/// Writes each SynthDef to `<dir>/<name>.scsyndef`, creating `dir` as needed.
///
/// Anonymous SynthDefs are named by their content hash. Returns the written
/// paths in input order.
///
/// # Errors
///
/// [`SynthDefError::InvalidFileName`] if a name is empty, `.` or `..`, or
/// contains a path separator. Nothing is written in that case.
pub fn write_synthdefs(dir: impl AsRef<Path>, synthdefs: &[SynthDef]) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    for synthdef in synthdefs {
        check_file_name(&synthdef.effective_name())?;
    }
    if !dir.as_os_str().is_empty() && !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| SynthDefError::create_dir(dir, e))?;
    }

    let mut paths = Vec::with_capacity(synthdefs.len());
    for synthdef in synthdefs {
        let bytes = synthdef.compile(false)?;
        let path = dir.join(format!(
            "{}.{SYNTHDEF_EXTENSION}",
            synthdef.effective_name()
        ));
        std::fs::write(&path, bytes).map_err(|e| SynthDefError::write_file(&path, e))?;
        tracing::debug!("wrote {}", path.display());
        paths.push(path);
    }
    Ok(paths)
}

/// A name must stay a single component inside the target directory.
fn check_file_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(SynthDefError::InvalidFileName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Reads and decodes every SynthDef in an `SCgf` file.
pub fn read_synthdefs(path: impl AsRef<Path>) -> Result<Vec<SynthDef>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| SynthDefError::read_file(path, e))?;
    decompile_all(&bytes)
}
