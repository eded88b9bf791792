use crate::prelude::*;
use std::path::Path;

pub(crate) fn symlink(src: &Path, dest: &Path) -> Result<()> {
    // Directory and file links are distinct objects on Windows.
    let result = if src.is_dir() {
        std::os::windows::fs::symlink_dir(src, dest)
    } else {
        std::os::windows::fs::symlink_file(src, dest)
    };

    result.with_context(|| {
        format!("unable to link {} to {}", dest.display(), src.display())
    })?;
    Ok(())
}

// Quarantine is a macOS concept; nothing to clear here.
pub(crate) fn clear_quarantine(_path: &Path) -> Result<()> {
    Ok(())
}
