//! Application configuration loaded from environment variables.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Backend ===
    /// Full URL of the backend status endpoint.
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Timeout for one status request, in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    // === Page ===
    /// Heading shown on the rendered page.
    #[serde(default = "default_page_title")]
    pub page_title: String,

    // === Server Configuration ===
    /// HTTP server port for the page.
    #[serde(default = "default_port")]
    pub port: u16,

    // === Metrics ===
    /// Expose a Prometheus scrape endpoint.
    #[serde(default)]
    pub metrics_enabled: bool,

    /// Port for the Prometheus scrape endpoint.
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

fn default_http_timeout_ms() -> u64 {
    5000
}

fn default_page_title() -> String {
    "Dark Search".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_metrics_port() -> u16 {
    9090
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            http_timeout_ms: default_http_timeout_ms(),
            page_title: default_page_title(),
            port: default_port(),
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

    /// Replace the page port when one was given on the command line.
    pub fn with_port_override(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        self.base_url()?;

        if self.http_timeout_ms == 0 {
            return Err("HTTP_TIMEOUT_MS must be greater than 0".to_string());
        }

        if self.metrics_enabled && self.metrics_port == self.port {
            return Err("METRICS_PORT must differ from PORT".to_string());
        }

        Ok(())
    }

    /// Parsed backend status URL.
    pub fn base_url(&self) -> Result<Url, String> {
        let raw = match self.api_base_url.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Err("API_BASE_URL is required".to_string()),
        };

        let url = Url::parse(raw).map_err(|e| format!("API_BASE_URL is not a valid URL: {}", e))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(format!("API_BASE_URL must use http or https, got {}", other)),
        }
    }

    /// Status request timeout.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}
