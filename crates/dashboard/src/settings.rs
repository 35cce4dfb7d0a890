//! Runtime API settings
//!
//! The settings form can replace the API key, base URL and endpoint paths
//! while the process runs. Changes live in memory only and are lost on
//! restart.

use optimo_common::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Where the API key is attached on outgoing requests.
///
/// Mutating calls carry the `key` query parameter regardless of the style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStyle {
    Bearer,
    Query,
    Both,
}

impl FromStr for AuthStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bearer" => Ok(AuthStyle::Bearer),
            "query" => Ok(AuthStyle::Query),
            "both" => Ok(AuthStyle::Both),
            other => Err(Error::InvalidSettings(format!("unknown auth style: {}", other))),
        }
    }
}

/// Connection settings for the OptimoRoute API
#[derive(Debug, Clone, Serialize)]
pub struct ApiSettings {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub base_url: String,
    pub endpoints: BTreeMap<String, String>,
    pub auth_style: AuthStyle,
}

impl ApiSettings {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// First 20 characters of the key, for display
    pub fn masked_key(&self) -> String {
        if !self.has_api_key() {
            return "(not configured)".to_string();
        }
        let prefix: String = self.api_key.chars().take(20).collect();
        format!("{}...", prefix)
    }

    /// Full URL for a logical endpoint
    pub fn endpoint_url(&self, name: &str) -> Result<String> {
        let path = self
            .endpoints
            .get(name)
            .ok_or_else(|| Error::UnknownEndpoint(name.to_string()))?;
        Ok(format!("{}{}", self.base_url, path))
    }
}

/// Changes submitted through the settings form
#[derive(Debug, Default, Clone)]
pub struct SettingsUpdate {
    /// Blank keeps the current key
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub endpoints: BTreeMap<String, String>,
}

pub fn validate_base_url(base_url: &str) -> Result<()> {
    let parsed = url::Url::parse(base_url)
        .map_err(|e| Error::InvalidSettings(format!("base URL {:?}: {}", base_url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::InvalidSettings(format!(
            "base URL must use http or https: {}",
            base_url
        )));
    }

    Ok(())
}

pub fn validate_endpoint_path(path: &str) -> Result<()> {
    if !path.starts_with('/') || path.chars().any(char::is_whitespace) {
        return Err(Error::InvalidSettings(format!(
            "endpoint path must start with '/' and contain no spaces: {:?}",
            path
        )));
    }
    Ok(())
}

/// Shared, lock-guarded settings
#[derive(Debug, Clone)]
pub struct SettingsStore {
    inner: Arc<RwLock<ApiSettings>>,
}

impl SettingsStore {
    pub fn new(settings: ApiSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Copy of the current settings
    pub async fn snapshot(&self) -> ApiSettings {
        self.inner.read().await.clone()
    }

    /// Validate and apply an update; nothing changes if any part is invalid
    pub async fn update(&self, update: SettingsUpdate) -> Result<ApiSettings> {
        let base_url = match update.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => {
                let url = url.trim_end_matches('/');
                validate_base_url(url)?;
                Some(url.to_string())
            }
            _ => None,
        };

        let mut settings = self.inner.write().await;

        for (name, path) in &update.endpoints {
            if !settings.endpoints.contains_key(name) {
                return Err(Error::UnknownEndpoint(name.clone()));
            }
            validate_endpoint_path(path.trim())?;
        }

        if let Some(key) = update.api_key.as_deref().map(str::trim) {
            if !key.is_empty() {
                settings.api_key = key.to_string();
                info!("API key updated");
            }
        }

        if let Some(base_url) = base_url {
            info!("Base URL updated: {}", base_url);
            settings.base_url = base_url;
        }

        for (name, path) in update.endpoints {
            settings.endpoints.insert(name, path.trim().to_string());
        }

        Ok(settings.clone())
    }
}
