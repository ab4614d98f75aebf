//! Folio - author, compile and publish portfolio project pages.

mod cli;
mod compiler;
mod config;
mod generator;
mod logger;
mod project;
mod session;
mod storage;
mod text;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::FolioConfig;
use storage::BlobStore;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static FolioConfig = Box::leak(Box::new(FolioConfig::load(cli)?));

    match &cli.command {
        Commands::New { name } => session::new_project(config, name),
        Commands::List => {
            session::list_projects(open_store(config)?.as_ref(), config);
            Ok(())
        }
        Commands::Pull { name } => session::pull_project(open_store(config)?.as_ref(), config, name),
        Commands::Compile { compile_args, clean } => {
            let store = open_store(config)?;
            session::compile_local(store.as_ref(), config, &compile_args.name, *clean).map(|_| ())
        }
        Commands::Publish { compile_args } => {
            let store = open_store(config)?;
            session::publish_project(store.as_ref(), config, &compile_args.name).map(|_| ())
        }
        Commands::Remove { name } => {
            session::remove_project(open_store(config)?.as_ref(), config, name)
        }
        Commands::Sitemap { dir } => session::build_sitemap(config, dir.as_deref()),
    }
}

/// Load and validate configuration from CLI arguments
fn open_store(config: &FolioConfig) -> Result<Box<dyn BlobStore>> {
    storage::open_store(&config.storage)
        .with_context(|| format!("Failed to open bucket `{}`", config.storage.bucket))
}
