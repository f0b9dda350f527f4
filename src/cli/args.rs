//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `import`: Import translation files from the application and its bundles
//! - `status`: Show translation counts stored in the database
//! - `init`: Initialize transync configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::CommitPolicy;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Import(cmd)) => cmd.args.common.verbose,
            Some(Command::Status(cmd)) => cmd.args.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project root directory, where the config file is searched from
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// SQLite database path (overrides config file)
    #[arg(long, env = "TRANSYNC_DATABASE")]
    pub database: Option<PathBuf>,

    /// Managed locale (overrides config file)
    /// Can be specified multiple times: --locale en --locale fr
    #[arg(long = "locale", value_name = "LOCALE")]
    pub locales: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct ImportArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Remove translations cache files for managed locales
    #[arg(short = 'c', long)]
    pub cache_clear: bool,

    /// When to commit imported translations (overrides config file)
    #[arg(long, value_enum)]
    pub commit: Option<CommitPolicy>,
}

#[derive(Debug, Args)]
pub struct ImportCommand {
    #[command(flatten)]
    pub args: ImportArgs,
}

#[derive(Debug, Parser)]
pub struct StatusArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Only show this domain
    #[arg(long)]
    pub domain: Option<String>,
}

#[derive(Debug, Args)]
pub struct StatusCommand {
    #[command(flatten)]
    pub args: StatusArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import translation files (xliff, yml, php, json) into the database
    Import(ImportCommand),
    /// Show translation units and translations stored in the database
    Status(StatusCommand),
    /// Initialize a new .transyncrc.json configuration file
    Init,
}
