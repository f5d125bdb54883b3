//! HTTP Server Configuration
//!
//! Configuration for the HTTP server including host, port, CORS and the
//! CSV export endpoint.

use serde::{Deserialize, Serialize};

use crate::csv_export::EncoderOptions;

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (default: local dev servers)
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default)]
    pub export: ExportConfig,
}

/// CSV export endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Honour the `testException` query parameter (default: false)
    ///
    /// Only meant for test deployments.
    #[serde(default)]
    pub allow_fault_injection: bool,

    /// Chunks buffered between the encoder and the response body (default: 16)
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Attachment filename prefix; files are named `<prefix>_<quarter>.csv`
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,

    #[serde(flatten)]
    pub encoder: EncoderOptions,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(), // React dev server
        "http://127.0.0.1:3000".to_string(),
    ]
}

fn default_channel_capacity() -> usize {
    16
}

fn default_filename_prefix() -> String {
    "courses".to_string()
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            export: ExportConfig::default(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            allow_fault_injection: false,
            channel_capacity: default_channel_capacity(),
            filename_prefix: default_filename_prefix(),
            encoder: EncoderOptions::default(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.export.validate()
    }
}

impl ExportConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.channel_capacity == 0 {
            return Err("export.channel_capacity must be > 0".to_string());
        }
        if self.filename_prefix.is_empty()
            || !self
                .filename_prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(format!(
                "invalid export.filename_prefix: '{}'",
                self.filename_prefix
            ));
        }
        self.encoder.validate()
    }
}
