mod cli;

use clap::Parser;
use std::process;

fn main() {
    cantrip_install::logs::init();

    if let Err(err) = cli::Cli::parse().run() {
        cantrip_install::utils::report_failure(&err);
        process::exit(1);
    }
}
