// Only the macOS quarantine step shells out today.
#![cfg_attr(not(target_os = "macos"), allow(dead_code))]

use crate::prelude::*;
use std::ffi::OsStr;
use std::process::Command;

pub(crate) fn run(name: &str, args: &[&OsStr]) -> Result<()> {
    let cmdstr = make_cmdstr(name, args);
    let mut cmd = Command::new(name);
    cmd.args(args);

    info!("running `{}`", cmdstr);
    let status = cmd
        .status()
        .with_context(|| format!("unable to run `{}`", cmdstr))?;

    if status.success() {
        Ok(())
    } else {
        bail!("command `{}` failed with {}", cmdstr, status)
    }
}

fn make_cmdstr(name: &str, args: &[&OsStr]) -> String {
    let mut pieces = vec![name.to_string()];
    pieces.extend(args.iter().map(|arg| arg.to_string_lossy().into_owned()));
    pieces.join(" ")
}

#[cfg(test)]
mod tests {
    use super::make_cmdstr;
    use std::ffi::OsStr;

    #[test]
    fn test_make_cmdstr() {
        assert_eq!(
            make_cmdstr("xattr", &[OsStr::new("-cr"), OsStr::new("/tmp/x.clap")]),
            "xattr -cr /tmp/x.clap"
        );
    }
}
