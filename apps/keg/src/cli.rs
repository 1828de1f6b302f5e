//! Command line interface definition

use clap::{Parser, Subcommand};
use keg_config::ColorChoice;
use std::path::PathBuf;

/// keg - formula-driven installer for standalone Python CLI tools
#[derive(Parser)]
#[command(name = "keg")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Formula-driven installer for standalone Python CLI tools")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the installation prefix
    #[arg(long, global = true, value_name = "PATH")]
    pub prefix: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Install a formula
    #[command(alias = "i")]
    Install {
        /// Formula name
        formula: String,

        /// Install from the development branch instead of the release archive
        #[arg(long)]
        head: bool,

        /// Replace an existing install
        #[arg(long)]
        force: bool,

        /// Skip the post-install smoke test
        #[arg(long)]
        no_test: bool,
    },

    /// Run a formula's smoke test against the current install
    Test {
        /// Formula name
        formula: String,
    },

    /// Show information about a formula
    Info {
        /// Formula name
        formula: String,
    },

    /// List installed formulae
    #[command(alias = "ls")]
    List,

    /// Uninstall a formula
    #[command(alias = "rm")]
    Uninstall {
        /// Formula name
        formula: String,
    },
}
