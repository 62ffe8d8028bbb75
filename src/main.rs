//! `dot-templater` binary entry point.
use anyhow::Result;
use clap::Parser;

use dot_templater::cli::Cli;
use dot_templater::commands;
use dot_templater::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let cli = Cli::parse();
    logging::init_subscriber(cli.verbose);
    let log = Logger::new();

    commands::run(&cli, &log)
}
