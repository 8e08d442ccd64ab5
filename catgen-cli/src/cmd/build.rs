use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::Path;
use tracing::info;

use catgen_core::{PostScanner, Site, SiteBuilder, write_category_indexes};
use crate::config::load_build_config;

pub fn add_build_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("source")
                .short('s')
                .long("source")
                .value_name("DIR")
                .help("Site source directory containing _posts and _layouts")
                .default_value(".")
        )
        .arg(
            Arg::new("dest")
                .short('d')
                .long("dest")
                .value_name("DIR")
                .help("Output directory for generated pages")
                .default_value("./_site")
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file")
                .default_value("./catgen.toml")
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log every skipped template and loaded layout")
                .action(ArgAction::SetTrue)
        )
}

pub fn make_subcommand() -> Command {
    add_build_args(Command::new("build"))
        .about("Generate an index page and Atom feed for every category")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    // Load cascading configuration
    let catgen_config = load_build_config(args)?;
    let build_config = catgen_config.build_config();

    let source_dir = Path::new(&build_config.source);
    let dest_dir = Path::new(&build_config.dest);

    let posts = PostScanner::new(source_dir).scan()?;
    info!("Found {} posts in {}", posts.len(), source_dir.display());

    let mut site = SiteBuilder::new()
        .source_dir(source_dir)
        .dest_dir(dest_dir)
        .config(catgen_config.site_config().clone())
        .add_posts(posts)
        .build()?;
    info!(
        "Loaded {} layouts, {} categories",
        site.layouts().len(),
        site.categories().len()
    );

    let written = write_category_indexes(&mut site)?;

    info!("Wrote {} category pages to {}", written, dest_dir.display());

    Ok(())
}
