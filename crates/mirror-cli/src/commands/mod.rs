//! Command implementations

mod run;
mod scan;

use std::io;

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::Cli;

pub use run::run_sync;
pub use scan::run_scan;

/// Write a completion script for `shell` to stdout.
pub fn run_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "mirror", &mut io::stdout());
}
