use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Plexus: a plugin orchestration host
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Simple ping command for a basic liveness check
    #[arg(long)]
    pub ping: bool,

    /// Directory to search for plugins (repeatable)
    #[arg(long = "plugin-dir", value_name = "DIR")]
    pub plugin_dirs: Vec<PathBuf>,

    /// Disable a plugin by id (repeatable)
    #[arg(long = "disable", value_name = "ID")]
    pub disabled: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List discovered plugins without running them
    List {},
}
