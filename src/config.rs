//! Application configuration loaded from environment variables.

use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Upstream APIs ===
    /// First upstream endpoint, reported as `api1Response`.
    #[serde(default = "default_api1_url")]
    pub api1_url: String,

    /// Second upstream endpoint, reported as `api2Response`.
    #[serde(default = "default_api2_url")]
    pub api2_url: String,

    // === Outbound HTTP ===
    /// Per-call timeout in milliseconds.
    #[serde(default = "default_upstream_timeout_ms")]
    pub upstream_timeout_ms: u64,

    /// Idle connections kept per upstream host.
    #[serde(default = "default_pool_size")]
    pub http_pool_size: usize,

    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,

    // === Metrics ===
    /// Install the Prometheus exporter.
    #[serde(default)]
    pub metrics_enabled: bool,

    /// Port for the Prometheus exporter.
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

fn default_api1_url() -> String {
    "https://jsonblob.com/api/jsonBlob/1278302869768757248".to_string()
}

fn default_api2_url() -> String {
    "https://jsonblob.com/api/jsonBlob/1278303163344871424".to_string()
}

fn default_upstream_timeout_ms() -> u64 {
    15_000
}

fn default_pool_size() -> usize {
    10
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metrics_port() -> u16 {
    9090
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api1_url: default_api1_url(),
            api2_url: default_api2_url(),
            upstream_timeout_ms: default_upstream_timeout_ms(),
            http_pool_size: default_pool_size(),
            port: default_port(),
            rust_log: default_log_level(),
            verbose: false,
            metrics_enabled: false,
            metrics_port: default_metrics_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        for (name, url) in [("API1_URL", &self.api1_url), ("API2_URL", &self.api2_url)] {
            if url.trim().is_empty() {
                return Err(format!("{name} is required"));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!("{name} must start with http:// or https://"));
            }
        }

        if self.upstream_timeout_ms == 0 {
            return Err("UPSTREAM_TIMEOUT_MS must be greater than 0".to_string());
        }

        if self.port == 0 {
            return Err("PORT must be greater than 0".to_string());
        }

        if self.metrics_enabled && self.metrics_port == self.port {
            return Err("METRICS_PORT must differ from PORT".to_string());
        }

        Ok(())
    }

    /// Per-call timeout, covering connect through body read.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }

    /// Log filter directives: crate debug when verbose, otherwise `rust_log`.
    pub fn log_directives(&self, verbose_flag: bool) -> String {
        if verbose_flag || self.verbose {
            "concurrent_api=debug,tower_http=debug,info".to_string()
        } else {
            self.rust_log.clone()
        }
    }
}
