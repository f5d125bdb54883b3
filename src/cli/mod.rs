//! CLI module for coursecsv
//!
//! Provides command-line interface for:
//! - serve: Run the HTTP CSV export API
//! - export: One-shot export of a quarter to a file or stdout

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{export, run_command, serve, Config};
pub use errors::{CliError, CliErrorCode, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}
