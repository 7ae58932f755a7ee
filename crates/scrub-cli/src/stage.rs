//! Staging copy of the source tree.

use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

/// Mirror `source` into `output`, preserving relative paths and file
/// names. Returns the number of files copied.
pub fn copy_tree(source: &Path, output: &Path) -> anyhow::Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        let relative = entry.path().strip_prefix(source)?;
        if relative.as_os_str().is_empty() {
            continue;
        }
        let target = output.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            debug!(path = %relative.display(), "copied");
            copied += 1;
        }
    }
    Ok(copied)
}
