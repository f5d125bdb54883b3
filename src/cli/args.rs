//! CLI argument definitions using clap
//!
//! Commands:
//! - coursecsv serve --config <path>
//! - coursecsv export --config <path> --quarter <yyyyq> [--output <file>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// coursecsv - Streaming CSV export of course sections
#[derive(Parser, Debug)]
#[command(name = "coursecsv")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the CSV export API over HTTP
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./coursecsv.json")]
        config: PathBuf,
    },

    /// Export one quarter as CSV and exit
    Export {
        /// Path to configuration file
        #[arg(long, default_value = "./coursecsv.json")]
        config: PathBuf,

        /// Quarter in yyyyq format, e.g. 20252
        #[arg(long)]
        quarter: String,

        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["coursecsv", "serve"]).unwrap();
        match cli.command {
            Command::Serve { config } => assert_eq!(config, PathBuf::from("./coursecsv.json")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_export() {
        let cli = Cli::try_parse_from([
            "coursecsv", "export", "--quarter", "20252", "-o", "out.csv",
        ])
        .unwrap();
        match cli.command {
            Command::Export {
                quarter, output, ..
            } => {
                assert_eq!(quarter, "20252");
                assert_eq!(output, Some(PathBuf::from("out.csv")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_export_requires_quarter() {
        assert!(Cli::try_parse_from(["coursecsv", "export"]).is_err());
    }
}
