//! CLI command implementations
//!
//! `serve` runs the HTTP API; `export` runs the same export pipeline once
//! against a file or stdout.

use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::csv_export::{ExportJob, QueryKey};
use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::{init_logging, log_event, Event};
use crate::sections::{JsonFileSectionStore, SectionStore};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON array of section documents (required)
    pub data_file: String,

    /// Log level used when RUST_LOG is unset (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: HttpServerConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_file.trim().is_empty() {
            return Err(CliError::config_error("data_file must not be empty"));
        }

        self.server
            .validate()
            .map_err(|e| CliError::config_error(format!("Server config error: {}", e)))?;

        Ok(())
    }

    /// Data file path; relative paths resolve against the config file
    pub fn data_path(&self, config_path: &Path) -> std::path::PathBuf {
        let data = Path::new(&self.data_file);
        match config_path.parent() {
            Some(dir) if data.is_relative() => dir.join(data),
            _ => data.to_path_buf(),
        }
    }
}

/// Dispatch a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve { config } => serve(&config),
        Command::Export {
            config,
            quarter,
            output,
        } => export(&config, &quarter, output.as_deref()),
    }
}

/// Load config, install logging and open the section store
fn boot(config_path: &Path) -> CliResult<(Config, Arc<dyn SectionStore>)> {
    let config = Config::load(config_path)?;

    // a subscriber may already be installed when embedded; keep it
    let _ = init_logging(&config.log_level);
    log_event(
        Event::ConfigLoaded,
        &format!("loaded {}", config_path.display()),
    );

    let store = open_store(&config.data_path(config_path))?;
    Ok((config, store))
}

fn open_store(path: &Path) -> CliResult<Arc<dyn SectionStore>> {
    let store = JsonFileSectionStore::open(path).map_err(|e| CliError::store_error(e.to_string()))?;
    log_event(
        Event::StoreOpened,
        &format!("{} sections from {}", store.len(), store.path().display()),
    );
    Ok(Arc::new(store))
}

/// Serve the HTTP API until the process is stopped
pub fn serve(config_path: &Path) -> CliResult<()> {
    let (config, store) = boot(config_path)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime
        .block_on(HttpServer::with_config(config.server, store).start())
        .map_err(|e| CliError::serve_failed(e.to_string()))
}

/// Export one quarter to `output`, or stdout when absent
pub fn export(config_path: &Path, quarter: &str, output: Option<&Path>) -> CliResult<()> {
    let (config, store) = boot(config_path)?;

    let mut job = ExportJob::new(store, QueryKey::new(quarter))
        .with_options(config.server.export.encoder.clone());

    let result = match output {
        Some(path) => job.run(File::create(path)?),
        None => job.run(io::stdout().lock()),
    };

    result
        .map(|_| ())
        .map_err(|e| CliError::export_failed(e.to_string()))
}
