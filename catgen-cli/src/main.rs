mod cmd;
mod config;

use anyhow::Result;
use clap::Command;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let matches = Command::new("catgen")
        .about("Generate category index pages and Atom feeds for a static site")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(cmd::build::make_subcommand())
        .get_matches();

    match matches.subcommand() {
        Some(("build", args)) => {
            init_logging(args.get_flag("verbose"));
            cmd::build::execute(args)
        }
        _ => unreachable!("subcommand is required"),
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
