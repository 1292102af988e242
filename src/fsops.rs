use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{PublishError, Result};

/// Recursively copies `src` into `dst`, merging with existing content.
///
/// Same-named destination files are overwritten; destination files with no
/// counterpart under `src` are left intact. Missing destination directories
/// are created. Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<u64> {
    fs::create_dir_all(dst).map_err(|e| PublishError::filesystem("create directory", dst, e))?;

    let entries =
        fs::read_dir(src).map_err(|e| PublishError::filesystem("read directory", src, e))?;

    let mut copied = 0;
    for entry in entries {
        let entry = entry.map_err(|e| PublishError::filesystem("read directory", src, e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());

        let file_type = entry
            .file_type()
            .map_err(|e| PublishError::filesystem("inspect", &from, e))?;

        if file_type.is_dir() {
            copied += copy_tree(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| PublishError::filesystem("copy file", &from, e))?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Recursively deletes a directory tree.
///
/// Attempted exactly once; any failure surfaces as a fatal filesystem error
/// rather than being skipped.
pub fn remove_tree(path: &Path) -> Result<()> {
    debug!("Removing directory tree: {}", path.display());
    fs::remove_dir_all(path).map_err(|e| PublishError::filesystem("remove directory", path, e))
}

/// Deletes whatever sits at `path`, directory tree or single file.
pub fn remove_entry(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path)
        .map_err(|e| PublishError::filesystem("inspect", path, e))?;

    if meta.is_dir() {
        remove_tree(path)
    } else {
        debug!("Removing file: {}", path.display());
        fs::remove_file(path).map_err(|e| PublishError::filesystem("remove file", path, e))
    }
}

/// Recursively collects every file under `root` whose name ends in
/// `.<extension>`. Results are sorted so callers process files in a
/// deterministic order.
pub fn files_with_extension(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let suffix = format!(".{extension}");
    let mut found = Vec::new();
    collect_files(root, &suffix, &mut found)?;
    found.sort();
    Ok(found)
}

fn collect_files(dir: &Path, suffix: &str, found: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        fs::read_dir(dir).map_err(|e| PublishError::filesystem("read directory", dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| PublishError::filesystem("read directory", dir, e))?;
        let path = entry.path();

        let file_type = entry
            .file_type()
            .map_err(|e| PublishError::filesystem("inspect", &path, e))?;

        if file_type.is_dir() {
            collect_files(&path, suffix, found)?;
        } else if entry.file_name().to_string_lossy().ends_with(suffix) {
            found.push(path);
        }
    }

    Ok(())
}
