//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Mirror - one-way, content-verified directory synchronization
#[derive(Parser, Debug)]
#[command(name = "mirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mirror a source directory into a target directory
    ///
    /// Runs scan -> apply -> cleanup cycles until the schedule ends or
    /// Ctrl-C is pressed. The cancel signal is only honored between
    /// cycles; a running cycle always completes.
    ///
    /// Examples:
    ///   mirror run --source /data/in --target /data/out
    ///   mirror run --source /data/in --target /data/out --every 10
    ///   mirror run --config mirror.toml
    Run(RunArgs),

    /// List the catalogue of a directory tree without changing anything
    Scan(ScanArgs),

    /// Generate shell completions
    ///
    /// Examples:
    ///   mirror completions bash > ~/.local/share/bash-completion/completions/mirror
    ///   mirror completions zsh > ~/.zfunc/_mirror
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for `mirror run`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Absolute path to the source directory (never modified)
    #[arg(short, long, required_unless_present = "config", conflicts_with = "config")]
    pub source: Option<PathBuf>,

    /// Absolute path to the target directory (created if missing)
    #[arg(short, long, required_unless_present = "config", conflicts_with = "config")]
    pub target: Option<PathBuf>,

    /// Minutes between cycle starts; 0 runs a single cycle
    #[arg(short, long, default_value_t = 0, conflicts_with = "config")]
    pub every: u64,

    /// Load source, target, and interval from a TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print each cycle report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `mirror scan`
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Absolute path to the directory to catalogue
    #[arg(short, long)]
    pub source: PathBuf,

    /// Output as JSON for scripting
    #[arg(long)]
    pub json: bool,
}
