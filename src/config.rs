//! Application configuration loaded from environment variables.

use serde::Deserialize;

/// Environment name that enables development conveniences.
pub const DEVELOPMENT: &str = "development";

/// Filter used in development and with `--verbose`.
pub const VERBOSE_LOG_FILTER: &str = "backend_template=debug,tower_http=debug,info";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Deployment ===
    /// Environment name reported by the API (development, staging, production...).
    #[serde(default = "default_environment")]
    pub environment: String,

    // === Server Configuration ===
    /// Host or IP address the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Optional port for the Prometheus exporter. Disabled when unset.
    #[serde(default)]
    pub metrics_port: Option<u16>,

    /// Log filter directive. Falls back to [`Config::log_filter`] defaults.
    #[serde(default)]
    pub rust_log: Option<String>,
}

fn default_environment() -> String {
    DEVELOPMENT.to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            host: default_host(),
            port: default_port(),
            metrics_port: None,
            rust_log: None,
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
        if self.host.trim().is_empty() {
            return Err("HOST must not be empty".to_string());
        }

        if self.environment.trim().is_empty() {
            return Err("ENVIRONMENT must not be empty".to_string());
        }

        if self.metrics_port == Some(self.port) {
            return Err("METRICS_PORT must differ from PORT".to_string());
        }

        Ok(())
    }

    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format_address(&self.host, self.port)
    }

    /// Address of the Prometheus exporter, if enabled.
    pub fn metrics_address(&self) -> Option<String> {
        self.metrics_port.map(|port| format_address(&self.host, port))
    }

    /// Development mode: verbose logging and a reload hint at startup.
    pub fn is_development(&self) -> bool {
        self.environment == DEVELOPMENT
    }

    /// Effective `EnvFilter` directive.
    pub fn log_filter(&self) -> String {
        match &self.rust_log {
            Some(filter) => filter.clone(),
            None if self.is_development() => VERBOSE_LOG_FILTER.to_string(),
            None => "info".to_string(),
        }
    }
}

fn format_address(host: &str, port: u16) -> String {
    // Bare IPv6 literals need brackets before the port.
    if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}
