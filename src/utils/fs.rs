use crate::prelude::*;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Returns true if anything lives at `path`, dangling symlinks included.
///
/// `Path::exists()` traverses symlinks, so a link whose target is gone would
/// look absent and a stale install would never get cleaned up.
pub(crate) fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Removes whatever lives at `path`: a file, a directory tree or a symlink.
/// Does nothing if the path is already gone.
pub(crate) fn remove_entry(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(_) => return Ok(()),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
    .with_context(|| format!("unable to remove {}", path.display()))?;

    Ok(())
}

pub(crate) fn copy_entry(src: &Path, dest: &Path) -> Result<()> {
    // Bundles are directories on most platforms, but a few targets produce
    // single-file bundles.
    if src.is_dir() {
        copy_dir(src, dest)
    } else {
        fs::copy(src, dest)
            .with_context(|| format!("unable to copy {} to {}", src.display(), dest.display()))?;
        Ok(())
    }
}

fn copy_dir(src_dir: &Path, dest_dir: &Path) -> Result<()> {
    for entry in WalkDir::new(src_dir) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(src_dir)?;
        let path = dest_dir.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&path)
                .with_context(|| format!("unable to create {}", path.display()))?;
        } else {
            fs::copy(entry.path(), &path).with_context(|| {
                format!("unable to copy {} to {}", entry.path().display(), path.display())
            })?;
        }
    }

    Ok(())
}
