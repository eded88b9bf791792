use anyhow::{bail, Result};
use cantrip_install::config::Config;
use cantrip_install::install;
use cantrip_install::plugins::{self, Plugin, PluginFormat};
use cantrip_install::{dirs, utils};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "cantrip-install",
    about = "link cantrip plugin bundles into the user plugin directories",
    version,
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    install: InstallArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// install plugin bundles (the default when no subcommand is given)
    Install(InstallArgs),
    /// remove installed plugin bundles from the plugin directories
    Uninstall(UninstallArgs),
    /// list the built bundles and their install state
    List {
        /// only list bundles in this packaging format
        #[arg(long)]
        format: Option<PluginFormat>,
    },
}

#[derive(Debug, Args)]
struct InstallArgs {
    /// names of the plugins to install (e.g. cantrip_gain)
    #[arg(value_name = "PLUGIN", required_unless_present = "all")]
    plugins: Vec<Plugin>,

    /// install every bundle found in the bundle directory
    #[arg(long, conflicts_with = "plugins")]
    all: bool,

    /// only install bundles in this packaging format
    #[arg(long)]
    format: Option<PluginFormat>,

    /// copy the bundle instead of linking it
    #[arg(long)]
    copy: bool,
}

#[derive(Debug, Args)]
struct UninstallArgs {
    /// names of the plugins to uninstall
    #[arg(value_name = "PLUGIN", required_unless_present = "all")]
    plugins: Vec<Plugin>,

    /// remove every bundle link this tool created
    #[arg(long, conflicts_with = "plugins")]
    all: bool,

    /// only touch bundles in this packaging format
    #[arg(long)]
    format: Option<PluginFormat>,

    /// also remove destination entries this tool did not create
    #[arg(long)]
    force: bool,
}

impl Cli {
    pub(crate) fn run(self) -> Result<()> {
        let config = Config::load()?;

        match self.command {
            None => run_install(&config, self.install),
            Some(Command::Install(args)) => run_install(&config, args),
            Some(Command::Uninstall(args)) => run_uninstall(&config, args),
            Some(Command::List { format }) => run_list(&config, format),
        }
    }
}

fn run_install(config: &Config, args: InstallArgs) -> Result<()> {
    let targets: Vec<(Plugin, Option<PluginFormat>)> = if args.all {
        let bundle_dir = dirs::bundle_dir(config);
        let discovered: Vec<_> = plugins::discover(&bundle_dir)?
            .into_iter()
            .filter(|(_, format)| args.format.map_or(true, |want| want == *format))
            .map(|(plugin, format)| (plugin, Some(format)))
            .collect();
        if discovered.is_empty() {
            bail!("no plugin bundles found in {}", bundle_dir.display());
        }
        discovered
    } else {
        args.plugins
            .iter()
            .map(|plugin| (plugin.clone(), args.format))
            .collect()
    };

    let mut failures = 0;
    for (plugin, format) in targets {
        match install::install(config, &plugin, format, args.copy) {
            Ok(installed) => {
                for (format, dest) in installed {
                    println!("installed {} ({}) at {}", plugin, format, dest.display());
                }
            }
            Err(err) => {
                let err = err.context(format!("unable to install {}", plugin));
                utils::report_failure(&err);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("failed to install {} plugin(s)", failures);
    }
    Ok(())
}

fn run_uninstall(config: &Config, args: UninstallArgs) -> Result<()> {
    if args.all {
        for (format, dest) in install::uninstall_all(config, args.format)? {
            println!("removed {} ({})", dest.display(), format);
        }
        return Ok(());
    }

    let mut failures = 0;
    for plugin in &args.plugins {
        match install::uninstall(config, plugin, args.format, args.force) {
            Ok(removed) => {
                if removed.is_empty() {
                    println!("{} is not installed", plugin);
                }
                for (format, dest) in removed {
                    println!("removed {} ({})", dest.display(), format);
                }
            }
            Err(err) => {
                let err = err.context(format!("unable to uninstall {}", plugin));
                utils::report_failure(&err);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("failed to uninstall {} plugin(s)", failures);
    }
    Ok(())
}

fn run_list(config: &Config, format: Option<PluginFormat>) -> Result<()> {
    let entries = install::list(config, format)?;
    if entries.is_empty() {
        println!(
            "no plugin bundles found in {}",
            dirs::bundle_dir(config).display()
        );
        return Ok(());
    }

    for entry in entries {
        println!("{} ({}) [{}]", entry.plugin, entry.format, entry.status);
    }
    Ok(())
}
