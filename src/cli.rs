//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Author, compile and publish portfolio project pages
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root; every configured path is relative to it
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: folio.toml)
    #[arg(short = 'C', long, default_value = "folio.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared arguments for Compile and Publish
#[derive(clap::Args, Debug, Clone)]
pub struct CompileArgs {
    /// Project record name, `.json` is appended if missing
    pub name: String,

    /// Minify the project text
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create an empty project record and a starter body
    New {
        /// Project record name
        name: String,
    },

    /// List projects published to storage
    List,

    /// Download a record and reverse compile it into the body file
    Pull {
        /// Project record name
        name: String,
    },

    /// Compile the body into the local record for previewing
    Compile {
        #[command(flatten)]
        compile_args: CompileArgs,

        /// Remove the staging directory first
        #[arg(long)]
        clean: bool,
    },

    /// Upload media, publish the record, then recompile locally
    Publish {
        #[command(flatten)]
        compile_args: CompileArgs,
    },

    /// Delete a record and its media from storage
    Remove {
        /// Project record name
        name: String,
    },

    /// Generate sitemap.xml for a built site
    Sitemap {
        /// Site directory (default: root)
        dir: Option<PathBuf>,
    },
}

impl Cli {
    /// Commands that never reach storage.
    pub const fn is_offline(&self) -> bool {
        matches!(self.command, Commands::New { .. } | Commands::Sitemap { .. })
    }

    pub const fn is_sitemap(&self) -> bool {
        matches!(self.command, Commands::Sitemap { .. })
    }

    /// `--minify` of Compile and Publish.
    pub const fn minify(&self) -> Option<bool> {
        match &self.command {
            Commands::Compile { compile_args, .. } | Commands::Publish { compile_args } => {
                compile_args.minify
            }
            _ => None,
        }
    }
}
