use crate::prelude::*;
use std::path::Path;

pub(crate) fn symlink(src: &Path, dest: &Path) -> Result<()> {
    std::os::unix::fs::symlink(src, dest).with_context(|| {
        format!("unable to link {} to {}", dest.display(), src.display())
    })?;
    Ok(())
}

/// Gatekeeper refuses to load unsigned bundles carrying the quarantine
/// attribute, so strip the extended attributes off the installed entry the
/// same way the stock `xattr -cr` invocation does.
#[cfg(target_os = "macos")]
pub(crate) fn clear_quarantine(path: &Path) -> Result<()> {
    use std::ffi::OsStr;

    crate::run::run("xattr", &[OsStr::new("-cr"), path.as_os_str()]).with_context(|| {
        format!(
            "unable to clear the quarantine attribute on {}",
            path.display()
        )
    })
}

#[cfg(not(target_os = "macos"))]
pub(crate) fn clear_quarantine(_path: &Path) -> Result<()> {
    Ok(())
}
