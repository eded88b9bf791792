use crate::prelude::*;
use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

string_enum!(pub enum PluginFormat {
    Clap => "clap",
    Vst3 => "vst3",
});

impl PluginFormat {
    pub const ALL: &'static [PluginFormat] = &[PluginFormat::Clap, PluginFormat::Vst3];

    /// The extension a bundle built in this format carries on disk.
    pub fn extension(self) -> &'static str {
        self.to_str()
    }
}

/// The name of a plugin in the workspace, as passed on the command line
/// (e.g. `cantrip_gain`).
///
/// A plugin name is always a single path component: anything that could
/// escape the bundle directory is rejected up front.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Plugin(String);

impl FromStr for Plugin {
    type Err = Error;

    fn from_str(name: &str) -> Result<Plugin> {
        if name.is_empty() {
            bail!("plugin name is empty");
        }
        if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
            bail!("invalid plugin name: {}", name);
        }

        Ok(Plugin(name.to_string()))
    }
}

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Plugin {
    pub fn name(&self) -> &str {
        &self.0
    }

    /// File name of this plugin's bundle for the given format, as the
    /// bundler writes it (`cantrip_gain.clap`, `cantrip_gain.vst3`, ...).
    pub fn bundle_name(&self, format: PluginFormat) -> String {
        format!("{}.{}", self.0, format.extension())
    }
}

/// Scans the bundle directory and returns every plugin bundle in it, sorted
/// by name so the output is stable. A missing directory yields an empty list
/// (nothing has been built yet).
pub fn discover(bundle_dir: &Path) -> Result<Vec<(Plugin, PluginFormat)>> {
    let mut found = Vec::new();
    if !bundle_dir.exists() {
        return Ok(found);
    }

    let entries = bundle_dir
        .read_dir()
        .with_context(|| format!("unable to read bundle directory {}", bundle_dir.display()))?;
    for entry in entries {
        let path = entry?.path();

        let Some(format) = path
            .extension()
            .and_then(OsStr::to_str)
            .and_then(|ext| ext.parse::<PluginFormat>().ok())
        else {
            continue;
        };
        let Some(plugin) = path
            .file_stem()
            .and_then(OsStr::to_str)
            .and_then(|stem| stem.parse::<Plugin>().ok())
        else {
            continue;
        };

        found.push((plugin, format));
    }

    found.sort_by(|(pa, fa), (pb, fb)| pa.cmp(pb).then_with(|| fa.to_str().cmp(fb.to_str())));
    Ok(found)
}
