#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub(crate) use self::unix::{clear_quarantine, symlink};
#[cfg(windows)]
pub(crate) use self::windows::{clear_quarantine, symlink};
