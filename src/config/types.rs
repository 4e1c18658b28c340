// Configuration data structures, deserialized from file/env/CLI sources.

use serde::Deserialize;

/// Root configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    /// Directory-to-prefix bindings. Must be non-empty by the time the
    /// server starts; the binary enforces this after merging CLI flags.
    #[serde(default)]
    pub sites: Vec<SiteConfig>,
}

/// Listen address and runtime sizing.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// combined, common, json, or a custom `$variable` pattern
    pub access_log_format: String,
    #[serde(default)]
    pub access_log_file: Option<String>,
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Connection handling limits, all timeouts in seconds.
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// One directory served under one URL prefix.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub dir: String,
    pub prefix: String,
}
