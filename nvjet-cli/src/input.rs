//! Input path traversal: one path in, an ordered file list out.

use std::fs;
use std::path::{Path, PathBuf};

use nvjet_core::error::{EngineError, Result};

/// Resolve `root` into an ordered list of candidate files.
///
/// A regular file yields a singleton list; a directory is walked
/// recursively and the result sorted for deterministic batch order.
pub fn collect(root: &Path) -> Result<Vec<PathBuf>> {
    let meta = fs::metadata(root).map_err(|err| {
        EngineError::Config(format!("input path {} is not accessible: {err}", root.display()))
    })?;

    if meta.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !meta.is_dir() {
        return Err(EngineError::Config(format!(
            "input path {} is neither a file nor a directory",
            root.display()
        )));
    }

    let mut files = Vec::new();
    walk(root, &mut files)?;
    if files.is_empty() {
        return Err(EngineError::Config(format!(
            "no files found under {}",
            root.display()
        )));
    }
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let meta = fs::metadata(&path)?;
        if meta.is_dir() {
            walk(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}
