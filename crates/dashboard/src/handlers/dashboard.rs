//! Home page, connection status, settings and the API test console

use axum::{
    extract::{rejection::FormRejection, Form, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    Json,
};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::{list_items, render_page, today, ApiError};
use crate::flash::{self, Flash};
use crate::settings::SettingsUpdate;
use crate::views::{self, TestResult};
use crate::AppState;

/// Counts of today's routes, drivers and orders
pub async fn home_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let flash = Flash::from_headers(&headers);
    let client = &state.client;
    let route_query = [("date", today())];

    let (routes, drivers, orders) = tokio::join!(
        client.get("get_routes", &route_query),
        client.get("get_drivers", &[]),
        client.get("get_orders", &[]),
    );

    let (routes, routes_notice) = list_items(&routes, "routes", "routes");
    let (drivers, drivers_notice) = list_items(&drivers, "drivers", "drivers");
    let (orders, orders_notice) = list_items(&orders, "orders", "orders");
    let notices: Vec<String> = [routes_notice, drivers_notice, orders_notice]
        .into_iter()
        .flatten()
        .collect();

    let settings = client.settings().snapshot().await;
    let html = views::home_page(
        flash.as_ref(),
        &settings.masked_key(),
        routes.len(),
        drivers.len(),
        orders.len(),
        &notices,
    );
    render_page(flash.is_some(), html)
}

/// Connectivity probe against `get_routes` for today
pub async fn status_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let client = &state.client;
    let response = client.get("get_routes", &[("date", today())]).await;
    let settings = client.settings().snapshot().await;

    let status = if response.status == 200 {
        "connected"
    } else {
        "error"
    };

    Json(json!({
        "status": status,
        "http_status": response.status,
        "api_key_configured": settings.has_api_key(),
        "base_url": settings.base_url,
        "endpoints": settings.endpoints,
        "response": response.payload,
    }))
}

pub async fn settings_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let flash = Flash::from_headers(&headers);
    let settings = state.client.settings().snapshot().await;
    render_page(flash.is_some(), views::settings_page(flash.as_ref(), &settings))
}

/// Apply the settings form: `api_key`, `base_url` and one `endpoint_<name>`
/// field per endpoint
pub async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Response, ApiError> {
    let Form(form) = form?;
    let mut update = SettingsUpdate::default();

    for (field, value) in form {
        match field.as_str() {
            "api_key" => update.api_key = Some(value),
            "base_url" => update.base_url = Some(value),
            _ => {
                if let Some(name) = field.strip_prefix("endpoint_") {
                    update.endpoints.insert(name.to_string(), value);
                }
            }
        }
    }

    state.client.settings().update(update).await.map_err(|e| {
        warn!("Rejected settings update: {}", e);
        ApiError::from(e)
    })?;

    info!("Settings updated");
    Ok(flash::redirect_with(
        "/settings",
        Flash::success("Settings updated"),
    ))
}

pub async fn api_test_form_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    let settings = state.client.settings().snapshot().await;
    let endpoints: Vec<String> = settings.endpoints.keys().cloned().collect();
    Html(views::api_test_page(&endpoints, None))
}

#[derive(Debug, Deserialize)]
pub struct ApiTestForm {
    pub endpoint: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub payload: String,
}

/// Send one ad-hoc call and show the raw result
pub async fn api_test_handler(
    State(state): State<Arc<AppState>>,
    form: Result<Form<ApiTestForm>, FormRejection>,
) -> Result<Html<String>, ApiError> {
    let Form(form) = form?;
    let body: Option<Value> = match form.payload.trim() {
        "" => None,
        text => Some(
            serde_json::from_str(text)
                .map_err(|e| ApiError::bad_request(format!("Invalid JSON payload: {}", e)))?,
        ),
    };

    let method = match form.method.trim().to_ascii_uppercase().as_str() {
        "" | "GET" => Method::GET,
        "POST" => Method::POST,
        other => return Err(ApiError::bad_request(format!("Unsupported method: {}", other))),
    };

    let response = state
        .client
        .send(method.clone(), &form.endpoint, body.as_ref(), &[])
        .await;

    let settings = state.client.settings().snapshot().await;
    let endpoints: Vec<String> = settings.endpoints.keys().cloned().collect();

    Ok(Html(views::api_test_page(
        &endpoints,
        Some(TestResult {
            endpoint: &form.endpoint,
            method: method.as_str(),
            status: response.status,
            payload: &response.payload,
        }),
    )))
}
