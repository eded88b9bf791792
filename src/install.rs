use crate::config::Config;
use crate::dirs;
use crate::native;
use crate::plugins::{self, Plugin, PluginFormat};
use crate::prelude::*;
use crate::utils;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("no bundle for plugin `{plugin}` in {} (build the plugins first)", dir.display())]
    BundleNotFound { plugin: Plugin, dir: PathBuf },
    #[error("refusing to remove {}: not a bundle link created by this tool (use --force)", path.display())]
    ForeignEntry { path: PathBuf },
}

string_enum!(pub enum InstallStatus {
    Installed => "installed",
    Stale => "stale",
    Copied => "copied",
    NotInstalled => "not-installed",
});

pub struct ListEntry {
    pub plugin: Plugin,
    pub format: PluginFormat,
    pub status: InstallStatus,
}

/// Installs a plugin into the user plugin directories.
///
/// With an explicit format only that bundle is installed; otherwise every
/// format the bundler produced for this plugin is. Returns the installed
/// destinations.
pub fn install(
    config: &Config,
    plugin: &Plugin,
    format: Option<PluginFormat>,
    copy: bool,
) -> Result<Vec<(PluginFormat, PathBuf)>> {
    let bundle_dir = dirs::bundle_dir(config);

    let formats: Vec<PluginFormat> = match format {
        Some(format) => vec![format],
        None => PluginFormat::ALL
            .iter()
            .copied()
            .filter(|format| utils::fs::entry_exists(&bundle_dir.join(plugin.bundle_name(*format))))
            .collect(),
    };
    if formats.is_empty() {
        return Err(InstallError::BundleNotFound {
            plugin: plugin.clone(),
            dir: bundle_dir,
        }
        .into());
    }

    let mut installed = Vec::new();
    for format in formats {
        let dest = install_bundle(config, &bundle_dir, plugin, format, copy)?;
        installed.push((format, dest));
    }
    Ok(installed)
}

fn install_bundle(
    config: &Config,
    bundle_dir: &Path,
    plugin: &Plugin,
    format: PluginFormat,
    copy: bool,
) -> Result<PathBuf> {
    let bundle_name = plugin.bundle_name(format);

    let src = bundle_dir.join(&bundle_name);
    if !utils::fs::entry_exists(&src) {
        return Err(InstallError::BundleNotFound {
            plugin: plugin.clone(),
            dir: bundle_dir.to_path_buf(),
        }
        .into());
    }
    // Link to the canonical path so the install survives the caller's cwd.
    let src = fs::canonicalize(&src)
        .with_context(|| format!("unable to resolve {}", src.display()))?;

    let dest_dir = dirs::plugin_dir(config, format)?;
    fs::create_dir_all(&dest_dir)
        .with_context(|| format!("unable to create plugin directory {}", dest_dir.display()))?;

    // Replace whatever a previous install (or a manual copy) left behind.
    let dest = dest_dir.join(&bundle_name);
    utils::fs::remove_entry(&dest)?;

    if copy {
        info!("copying {} to {}", src.display(), dest.display());
        utils::fs::copy_entry(&src, &dest)?;
    } else {
        info!("linking {} to {}", dest.display(), src.display());
        native::symlink(&src, &dest)?;
    }

    native::clear_quarantine(&dest)?;
    Ok(dest)
}

/// Removes a plugin's installed bundles. Absent entries are skipped; an entry
/// this tool didn't create is only removed with `force`.
pub fn uninstall(
    config: &Config,
    plugin: &Plugin,
    format: Option<PluginFormat>,
    force: bool,
) -> Result<Vec<(PluginFormat, PathBuf)>> {
    let formats = match format {
        Some(format) => vec![format],
        None => PluginFormat::ALL.to_vec(),
    };

    let mut removed = Vec::new();
    for format in formats {
        let dest = dirs::plugin_dir(config, format)?.join(plugin.bundle_name(format));

        let metadata = match fs::symlink_metadata(&dest) {
            Ok(metadata) => metadata,
            Err(_) => {
                debug!("{} is not installed", dest.display());
                continue;
            }
        };
        if !force && !is_managed_link(config, &metadata, &dest)? {
            return Err(InstallError::ForeignEntry { path: dest }.into());
        }

        utils::fs::remove_entry(&dest)?;
        info!("removed {}", dest.display());
        removed.push((format, dest));
    }
    Ok(removed)
}

/// Removes every bundle link in the plugin directories that points into the
/// bundle directory. Entries this tool didn't create are left alone.
pub fn uninstall_all(
    config: &Config,
    format: Option<PluginFormat>,
) -> Result<Vec<(PluginFormat, PathBuf)>> {
    let formats = match format {
        Some(format) => vec![format],
        None => PluginFormat::ALL.to_vec(),
    };

    let mut removed = Vec::new();
    for format in formats {
        let dir = dirs::plugin_dir(config, format)?;
        if !dir.exists() {
            continue;
        }

        let entries = dir
            .read_dir()
            .with_context(|| format!("unable to read plugin directory {}", dir.display()))?;
        for entry in entries {
            let entry = entry?;
            let path = entry.path();

            if path.extension().and_then(std::ffi::OsStr::to_str) != Some(format.extension()) {
                continue;
            }
            let metadata = fs::symlink_metadata(&path)?;
            if !is_managed_link(config, &metadata, &path)? {
                continue;
            }

            utils::fs::remove_entry(&path)?;
            info!("removed {}", path.display());
            removed.push((format, path));
        }
    }
    Ok(removed)
}

/// Lists every bundle the bundler produced and whether it is installed.
pub fn list(config: &Config, format: Option<PluginFormat>) -> Result<Vec<ListEntry>> {
    let bundle_dir = dirs::bundle_dir(config);

    let mut entries = Vec::new();
    for (plugin, found) in plugins::discover(&bundle_dir)? {
        if format.is_some_and(|want| want != found) {
            continue;
        }

        let status = status_of(config, &bundle_dir, &plugin, found)?;
        entries.push(ListEntry {
            plugin,
            format: found,
            status,
        });
    }
    Ok(entries)
}

fn status_of(
    config: &Config,
    bundle_dir: &Path,
    plugin: &Plugin,
    format: PluginFormat,
) -> Result<InstallStatus> {
    let dest = dirs::plugin_dir(config, format)?.join(plugin.bundle_name(format));

    let metadata = match fs::symlink_metadata(&dest) {
        Ok(metadata) => metadata,
        Err(_) => return Ok(InstallStatus::NotInstalled),
    };
    if !metadata.file_type().is_symlink() {
        return Ok(InstallStatus::Copied);
    }

    let target = fs::read_link(&dest)
        .with_context(|| format!("unable to read the link at {}", dest.display()))?;
    let src = bundle_dir.join(plugin.bundle_name(format));
    match (fs::canonicalize(&target).ok(), fs::canonicalize(&src).ok()) {
        (Some(target), Some(src)) if target == src => Ok(InstallStatus::Installed),
        _ => Ok(InstallStatus::Stale),
    }
}

fn is_managed_link(config: &Config, metadata: &fs::Metadata, dest: &Path) -> Result<bool> {
    if !metadata.file_type().is_symlink() {
        return Ok(false);
    }

    let target = fs::read_link(dest)
        .with_context(|| format!("unable to read the link at {}", dest.display()))?;
    let bundle_dir = dirs::bundle_dir(config);
    // The bundle a dangling link points at may be gone, so compare against
    // the canonical bundle directory rather than the link target.
    let bundle_dir = fs::canonicalize(&bundle_dir).unwrap_or(bundle_dir);

    Ok(target.starts_with(&bundle_dir))
}

#[cfg(all(test, unix))]
mod tests {
    use super::{install, list, uninstall, uninstall_all, InstallError, InstallStatus};
    use crate::config::Config;
    use crate::plugins::{Plugin, PluginFormat};
    use std::fs;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    struct Scratch {
        root: TempDir,
        config: Config,
    }

    impl Scratch {
        fn new() -> Self {
            let root = tempdir().unwrap();
            for dir in ["bundled", "clap", "vst3"] {
                fs::create_dir(root.path().join(dir)).unwrap();
            }

            let config: Config = toml::from_str(&format!(
                "bundle-dir = {:?}\n[plugin-dirs]\nclap = {:?}\nvst3 = {:?}\n",
                root.path().join("bundled"),
                root.path().join("clap"),
                root.path().join("vst3"),
            ))
            .unwrap();

            Scratch { root, config }
        }

        fn add_bundle(&self, name: &str, format: PluginFormat) {
            let bundle = self
                .root
                .path()
                .join("bundled")
                .join(format!("{}.{}", name, format.extension()));
            fs::create_dir_all(&bundle).unwrap();
            fs::write(bundle.join("module"), b"\x7fELF").unwrap();
        }

        fn dest(&self, name: &str, format: PluginFormat) -> std::path::PathBuf {
            self.root
                .path()
                .join(format.extension())
                .join(format!("{}.{}", name, format.extension()))
        }
    }

    fn plugin(name: &str) -> Plugin {
        name.parse().unwrap()
    }

    fn assert_links_to(link: &Path, target: &Path) {
        let metadata = fs::symlink_metadata(link).unwrap();
        assert!(metadata.file_type().is_symlink());
        assert_eq!(
            fs::read_link(link).unwrap(),
            fs::canonicalize(target).unwrap()
        );
    }

    #[test]
    fn test_install_links_every_built_format() {
        let scratch = Scratch::new();
        scratch.add_bundle("cantrip_gain", PluginFormat::Clap);
        scratch.add_bundle("cantrip_gain", PluginFormat::Vst3);

        let installed = install(&scratch.config, &plugin("cantrip_gain"), None, false).unwrap();
        assert_eq!(installed.len(), 2);

        for format in [PluginFormat::Clap, PluginFormat::Vst3] {
            assert_links_to(
                &scratch.dest("cantrip_gain", format),
                &scratch
                    .root
                    .path()
                    .join("bundled")
                    .join(format!("cantrip_gain.{}", format.extension())),
            );
        }
    }

    #[test]
    fn test_install_missing_bundle_fails() {
        let scratch = Scratch::new();

        let err = install(&scratch.config, &plugin("cantrip_gain"), None, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InstallError>(),
            Some(InstallError::BundleNotFound { .. })
        ));
    }

    #[test]
    fn test_install_explicit_format_must_exist() {
        let scratch = Scratch::new();
        scratch.add_bundle("cantrip_gain", PluginFormat::Clap);

        assert!(install(
            &scratch.config,
            &plugin("cantrip_gain"),
            Some(PluginFormat::Vst3),
            false
        )
        .is_err());
    }

    #[test]
    fn test_reinstall_replaces_existing_entries() {
        let scratch = Scratch::new();
        scratch.add_bundle("cantrip_gain", PluginFormat::Clap);
        let dest = scratch.dest("cantrip_gain", PluginFormat::Clap);

        // A manually copied install
        fs::create_dir_all(dest.join("Contents")).unwrap();
        install(&scratch.config, &plugin("cantrip_gain"), None, false).unwrap();
        assert!(fs::symlink_metadata(&dest).unwrap().file_type().is_symlink());

        // A dangling link left over from a deleted workspace
        fs::remove_file(&dest).unwrap();
        std::os::unix::fs::symlink(scratch.root.path().join("gone"), &dest).unwrap();
        install(&scratch.config, &plugin("cantrip_gain"), None, false).unwrap();
        assert_links_to(
            &dest,
            &scratch.root.path().join("bundled/cantrip_gain.clap"),
        );
    }

    #[test]
    fn test_install_copy_mode() {
        let scratch = Scratch::new();
        scratch.add_bundle("cantrip_gain", PluginFormat::Clap);

        install(&scratch.config, &plugin("cantrip_gain"), None, true).unwrap();

        let dest = scratch.dest("cantrip_gain", PluginFormat::Clap);
        assert!(!fs::symlink_metadata(&dest).unwrap().file_type().is_symlink());
        assert_eq!(fs::read(dest.join("module")).unwrap(), b"\x7fELF");
    }

    #[test]
    fn test_uninstall_removes_links_and_is_idempotent() {
        let scratch = Scratch::new();
        scratch.add_bundle("cantrip_gain", PluginFormat::Clap);

        install(&scratch.config, &plugin("cantrip_gain"), None, false).unwrap();
        let removed = uninstall(&scratch.config, &plugin("cantrip_gain"), None, false).unwrap();
        assert_eq!(removed.len(), 1);
        assert!(fs::symlink_metadata(scratch.dest("cantrip_gain", PluginFormat::Clap)).is_err());

        let removed = uninstall(&scratch.config, &plugin("cantrip_gain"), None, false).unwrap();
        assert!(removed.is_empty());
    }

    #[test]
    fn test_uninstall_refuses_foreign_entries() {
        let scratch = Scratch::new();
        let dest = scratch.dest("cantrip_gain", PluginFormat::Clap);
        fs::create_dir_all(&dest).unwrap();

        let err = uninstall(&scratch.config, &plugin("cantrip_gain"), None, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InstallError>(),
            Some(InstallError::ForeignEntry { .. })
        ));
        assert!(dest.exists());

        uninstall(&scratch.config, &plugin("cantrip_gain"), None, true).unwrap();
        assert!(!dest.exists());
    }

    #[test]
    fn test_uninstall_all_leaves_foreign_entries_alone() {
        let scratch = Scratch::new();
        scratch.add_bundle("cantrip_gain", PluginFormat::Clap);
        scratch.add_bundle("cantrip_delay", PluginFormat::Clap);
        install(&scratch.config, &plugin("cantrip_gain"), None, false).unwrap();
        install(&scratch.config, &plugin("cantrip_delay"), None, false).unwrap();

        let foreign = scratch.dest("other_vendor", PluginFormat::Clap);
        fs::create_dir_all(&foreign).unwrap();

        let removed = uninstall_all(&scratch.config, None).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(foreign.exists());
    }

    #[test]
    fn test_list_reports_status() {
        let scratch = Scratch::new();
        scratch.add_bundle("cantrip_gain", PluginFormat::Clap);
        scratch.add_bundle("cantrip_delay", PluginFormat::Clap);
        scratch.add_bundle("cantrip_filter", PluginFormat::Clap);

        install(&scratch.config, &plugin("cantrip_gain"), None, false).unwrap();
        install(&scratch.config, &plugin("cantrip_filter"), None, true).unwrap();

        // Point the delay link somewhere else entirely
        let stale = scratch.dest("cantrip_delay", PluginFormat::Clap);
        std::os::unix::fs::symlink(scratch.root.path().join("elsewhere"), &stale).unwrap();

        let entries = list(&scratch.config, None).unwrap();
        let entries: Vec<_> = entries
            .iter()
            .map(|entry| (entry.plugin.name(), entry.status))
            .collect();

        assert_eq!(
            entries,
            vec![
                ("cantrip_delay", InstallStatus::Stale),
                ("cantrip_filter", InstallStatus::Copied),
                ("cantrip_gain", InstallStatus::Installed),
            ]
        );
    }

    #[test]
    fn test_list_format_filter() {
        let scratch = Scratch::new();
        scratch.add_bundle("cantrip_gain", PluginFormat::Clap);
        scratch.add_bundle("cantrip_gain", PluginFormat::Vst3);

        let entries = list(&scratch.config, Some(PluginFormat::Vst3)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].format, PluginFormat::Vst3);
    }
}
