use crate::dirs;
use crate::plugins::PluginFormat;
use crate::prelude::*;
use serde_derive::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

static CONFIG_FILE: &str = "config.toml";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    bundle_dir: Option<PathBuf>,
    plugin_dirs: PluginDirs,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
struct PluginDirs {
    clap: Option<PathBuf>,
    vst3: Option<PathBuf>,
}

impl Config {
    /// Loads `config.toml` (or the file named by `CANTRIP_CONFIG`). A missing
    /// file just means defaults; a malformed one is an error.
    pub fn load() -> Result<Self> {
        let path = env::var_os("CANTRIP_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        Self::load_from(&path)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let buffer = fs::read_to_string(path)
            .with_context(|| format!("unable to read {}", path.display()))?;
        toml::from_str(&buffer).with_context(|| format!("unable to parse {}", path.display()))
    }

    pub(crate) fn bundle_dir(&self) -> Option<PathBuf> {
        self.bundle_dir.as_deref().map(expand_tilde)
    }

    pub(crate) fn plugin_dir(&self, format: PluginFormat) -> Option<PathBuf> {
        let dir = match format {
            PluginFormat::Clap => self.plugin_dirs.clap.as_deref(),
            PluginFormat::Vst3 => self.plugin_dirs.vst3.as_deref(),
        };
        dir.map(expand_tilde)
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    expand_tilde_in(path, dirs::home_dir())
}

fn expand_tilde_in(path: &Path, home: Option<PathBuf>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };

    if path == Path::new("~") {
        return home;
    }
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
