//! Application configuration loaded from environment variables.

use std::time::Duration;

use processor::table::DEFAULT_DETAILS_BASE;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_SPARQL_ENDPOINT: &str = "http://localhost:8890/sparql";
const DEFAULT_SPARQL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TABLE_CAPTION: &str = "Events";

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `SPARQL_ENDPOINT`: query endpoint URL (default: `"http://localhost:8890/sparql"`)
/// - `SPARQL_TIMEOUT_SECS`: per-request timeout (default: `30`)
/// - `DETAILS_BASE`: page linked from table rows (default: `"eventDetails.php"`)
/// - `TABLE_CAPTION`: caption used when a request names none (default: `"Events"`)
///
/// Unparseable numeric values fall back to their defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub sparql_endpoint: String,
    pub sparql_timeout: Duration,
    pub details_base: String,
    pub table_caption: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: var_or("HOST", defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: var_or("RUST_LOG", defaults.log_level),
            sparql_endpoint: var_or("SPARQL_ENDPOINT", defaults.sparql_endpoint),
            sparql_timeout: std::env::var("SPARQL_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.sparql_timeout),
            details_base: var_or("DETAILS_BASE", defaults.details_base),
            table_caption: var_or("TABLE_CAPTION", defaults.table_caption),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            sparql_endpoint: DEFAULT_SPARQL_ENDPOINT.to_string(),
            sparql_timeout: Duration::from_secs(DEFAULT_SPARQL_TIMEOUT_SECS),
            details_base: DEFAULT_DETAILS_BASE.to_string(),
            table_caption: DEFAULT_TABLE_CAPTION.to_string(),
        }
    }
}

fn var_or(name: &str, default: String) -> String {
    std::env::var(name).unwrap_or(default)
}
