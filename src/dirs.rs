use crate::config::Config;
use crate::plugins::PluginFormat;
use crate::prelude::*;
use lazy_static::lazy_static;
use std::env;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref DEFAULT_BUNDLE_DIR: PathBuf = Path::new("target").join("bundled");
}

pub(crate) fn home_dir() -> Option<PathBuf> {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    env::var_os(var).map(PathBuf::from)
}

/// The directory the bundler writes plugin bundles into.
///
/// Precedence: `CANTRIP_BUNDLE_DIR` environment variable, then the config
/// file, then `target/bundled` in the current directory.
pub fn bundle_dir(config: &Config) -> PathBuf {
    if let Some(dir) = env::var_os("CANTRIP_BUNDLE_DIR") {
        return dir.into();
    }

    config
        .bundle_dir()
        .unwrap_or_else(|| DEFAULT_BUNDLE_DIR.clone())
}

/// The user-level plugin directory bundles of the given format get installed
/// into.
///
/// Precedence: the format's search-path environment variable (`CLAP_PATH` /
/// `VST3_PATH`, first entry), then the config file, then the platform
/// convention for user installs.
pub fn plugin_dir(config: &Config, format: PluginFormat) -> Result<PathBuf> {
    let env_var = match format {
        PluginFormat::Clap => "CLAP_PATH",
        PluginFormat::Vst3 => "VST3_PATH",
    };
    if let Some(paths) = env::var_os(env_var) {
        if let Some(first) = env::split_paths(&paths).next() {
            return Ok(first);
        }
    }

    if let Some(dir) = config.plugin_dir(format) {
        return Ok(dir);
    }

    default_plugin_dir(format)
}

fn default_plugin_dir(format: PluginFormat) -> Result<PathBuf> {
    if cfg!(windows) {
        let common = env::var_os("COMMONPROGRAMFILES")
            .ok_or_else(|| anyhow!("COMMONPROGRAMFILES is not set"))?;
        let subdir = match format {
            PluginFormat::Clap => "CLAP",
            PluginFormat::Vst3 => "VST3",
        };
        return Ok(PathBuf::from(common).join(subdir));
    }

    let home = home_dir().ok_or_else(|| anyhow!("cannot determine the home directory"))?;
    if cfg!(target_os = "macos") {
        let subdir = match format {
            PluginFormat::Clap => "CLAP",
            PluginFormat::Vst3 => "VST3",
        };
        Ok(home.join("Library/Audio/Plug-Ins").join(subdir))
    } else {
        let subdir = match format {
            PluginFormat::Clap => ".clap",
            PluginFormat::Vst3 => ".vst3",
        };
        Ok(home.join(subdir))
    }
}
