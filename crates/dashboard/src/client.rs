//! Client for the OptimoRoute REST API
//!
//! Every call is a single attempt. Transport problems come back as
//! [`CallError`]; [`OptimoClient::send`] folds them into a 500 response with an
//! `{"error": ...}` payload so page handlers only ever inspect status and body.

use anyhow::{Context, Result};
use reqwest::{header::CONTENT_TYPE, Method};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::settings::{AuthStyle, SettingsStore};

/// Status and decoded JSON body of a remote call
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteResponse {
    pub status: u16,
    pub payload: Value,
}

impl RemoteResponse {
    /// 200/201 and no `"success": false` in the payload
    pub fn is_success(&self) -> bool {
        matches!(self.status, 200 | 201)
            && self.payload.get("success").and_then(Value::as_bool) != Some(false)
    }

    /// The remote's own message, or the whole payload when it has none
    pub fn error_message(&self) -> String {
        ["message", "error"]
            .iter()
            .find_map(|key| self.payload.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| pretty_json(&self.payload))
    }

    /// List items: either the payload itself or the array under `key`
    pub fn items(&self, key: &str) -> Vec<Value> {
        match &self.payload {
            Value::Array(items) => items.clone(),
            other => other
                .get(key)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
        }
    }
}

pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Why a remote call produced no usable response
#[derive(Debug, Error)]
pub enum CallError {
    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Invalid response from API: {0}")]
    InvalidResponse(String),
}

impl CallError {
    pub fn into_response(self) -> RemoteResponse {
        RemoteResponse {
            status: 500,
            payload: json!({ "error": self.to_string() }),
        }
    }
}

/// Client for the OptimoRoute API
#[derive(Debug, Clone)]
pub struct OptimoClient {
    settings: SettingsStore,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl OptimoClient {
    /// Create a new client reading connection settings from `settings` on every call
    pub fn new(settings: SettingsStore, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            settings,
            client,
            timeout_secs,
        })
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Issue one request against a logical endpoint
    pub async fn call(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        query: &[(&str, String)],
    ) -> std::result::Result<RemoteResponse, CallError> {
        let settings = self.settings.snapshot().await;

        let url = settings
            .endpoint_url(endpoint)
            .map_err(|_| CallError::UnknownEndpoint(endpoint.to_string()))?;
        let url = reqwest::Url::parse(&url)
            .map_err(|e| CallError::InvalidUrl(format!("{}: {}", url, e)))?;

        debug!("Calling OptimoRoute: {} {}", method, url);

        let key_in_query = settings.auth_style != AuthStyle::Bearer || method != Method::GET;
        let bearer = settings.auth_style != AuthStyle::Query;

        let mut request = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");

        if bearer {
            request = request.bearer_auth(&settings.api_key);
        }
        if key_in_query {
            request = request.query(&[("key", settings.api_key.as_str())]);
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| self.classify(e))?;

        if text.trim().is_empty() {
            return Ok(RemoteResponse {
                status,
                payload: json!({}),
            });
        }

        let payload = serde_json::from_str(&text)
            .map_err(|e| CallError::InvalidResponse(format!("status {}: {}", status, e)))?;

        Ok(RemoteResponse { status, payload })
    }

    /// Like [`call`](Self::call), but failures become a 500 response
    pub async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        query: &[(&str, String)],
    ) -> RemoteResponse {
        match self.call(method, endpoint, body, query).await {
            Ok(response) => response,
            Err(e) => {
                warn!("OptimoRoute call to {} failed: {}", endpoint, e);
                e.into_response()
            }
        }
    }

    pub async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> RemoteResponse {
        self.send(Method::GET, endpoint, None, query).await
    }

    pub async fn post(&self, endpoint: &str, body: &Value) -> RemoteResponse {
        self.send(Method::POST, endpoint, Some(body), &[]).await
    }

    fn classify(&self, err: reqwest::Error) -> CallError {
        if err.is_timeout() {
            CallError::Timeout(self.timeout_secs)
        } else if err.is_decode() {
            CallError::InvalidResponse(err.to_string())
        } else {
            CallError::Connection(err.to_string())
        }
    }
}
