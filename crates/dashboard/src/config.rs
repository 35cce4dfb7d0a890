//! Configuration management for the OptimoRoute dashboard
//!
//! Loads configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::env;

use crate::settings::{validate_base_url, validate_endpoint_path, ApiSettings, AuthStyle};

/// Logical endpoint names and their default OptimoRoute paths
pub const DEFAULT_ENDPOINTS: &[(&str, &str)] = &[
    ("get_routes", "/get_routes"),
    ("get_orders", "/get_orders"),
    ("get_drivers", "/get_drivers"),
    ("get_scheduling_info", "/get_scheduling_info"),
    ("create_order", "/create_order"),
    ("create_or_update_orders", "/create_or_update_orders"),
    ("delete_orders", "/delete_orders"),
    ("delete_all_orders", "/delete_all_orders"),
];

pub const DEFAULT_BASE_URL: &str = "https://api.optimoroute.com/v1";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Dashboard server host
    pub api_host: String,

    /// Dashboard server port
    pub api_port: u16,

    /// OptimoRoute API key
    pub api_key: String,

    /// OptimoRoute base URL, without trailing slash
    pub base_url: String,

    /// Logical endpoint name to remote path
    pub endpoints: BTreeMap<String, String>,

    /// Upper bound for a single remote call
    pub timeout_secs: u64,

    /// Where the API key is attached on outgoing requests
    pub auth_style: AuthStyle,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        let endpoints = DEFAULT_ENDPOINTS
            .iter()
            .map(|(name, path)| {
                let var = format!("OPTIMOROUTE_ENDPOINT_{}", name.to_uppercase());
                (
                    name.to_string(),
                    env::var(var).unwrap_or_else(|_| path.to_string()),
                )
            })
            .collect();

        let config = Config {
            api_host: env::var("DASHBOARD_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            api_port: env::var("DASHBOARD_PORT")
                .unwrap_or_else(|_| "5001".to_string())
                .parse()
                .context("Invalid DASHBOARD_PORT")?,

            api_key: env::var("OPTIMOROUTE_API_KEY").unwrap_or_default(),

            base_url: env::var("OPTIMOROUTE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),

            endpoints,

            timeout_secs: env::var("OPTIMOROUTE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Invalid OPTIMOROUTE_TIMEOUT_SECS")?,

            auth_style: env::var("OPTIMOROUTE_AUTH_STYLE")
                .unwrap_or_else(|_| "both".to_string())
                .parse()
                .context("Invalid OPTIMOROUTE_AUTH_STYLE (expected bearer/query/both)")?,
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.api_port == 0 {
            anyhow::bail!("DASHBOARD_PORT must be greater than 0");
        }

        if self.timeout_secs == 0 {
            anyhow::bail!("OPTIMOROUTE_TIMEOUT_SECS must be greater than 0");
        }

        validate_base_url(&self.base_url).context("Invalid OPTIMOROUTE_BASE_URL")?;

        for (name, path) in &self.endpoints {
            validate_endpoint_path(path)
                .with_context(|| format!("Invalid path for endpoint {}", name))?;
        }

        Ok(())
    }

    /// Get the dashboard server address
    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    /// Initial contents of the runtime settings store
    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            endpoints: self.endpoints.clone(),
            auth_style: self.auth_style,
        }
    }
}
