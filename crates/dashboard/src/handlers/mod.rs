//! Page handlers for the OptimoRoute dashboard

pub mod dashboard;
pub mod orders;
pub mod routes;

use axum::{
    extract::{multipart::MultipartRejection, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::any::Any;
use tracing::error;

use crate::client::{pretty_json, RemoteResponse};
use crate::flash;
use crate::views;

/// Error rendered as the generic error page
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Remote rejection, keeping its status when it is an error status
    pub fn remote(response: &RemoteResponse, message: String) -> Self {
        let status = StatusCode::from_u16(response.status)
            .ok()
            .filter(|s| s.is_client_error() || s.is_server_error())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        ApiError { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Html(views::error_page(&self.message))).into_response()
    }
}

impl From<optimo_common::Error> for ApiError {
    fn from(err: optimo_common::Error) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::bad_request(format!("Invalid form: {}", rejection.body_text()))
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::bad_request(format!("Invalid upload: {}", rejection.body_text()))
    }
}

/// Optional `?date=` filter; blank counts as absent
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

impl DateQuery {
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref().map(str::trim).filter(|d| !d.is_empty())
    }
}

pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Items of a list call, or an empty list and a notice when the call failed
pub fn list_items(response: &RemoteResponse, key: &str, what: &str) -> (Vec<Value>, Option<String>) {
    let flagged_failure = response.payload.get("success").and_then(Value::as_bool) == Some(false);

    if response.status != 200 || flagged_failure {
        error!("Failed to load {}: {}", what, response.error_message());
        let notice = format!("Could not load {}: {}", what, response.error_message());
        return (Vec::new(), Some(notice));
    }

    (response.items(key), None)
}

/// Page response; consumes the flash notice if one was shown
pub fn render_page(shown_flash: bool, html: String) -> Response {
    let mut response = Html(html).into_response();
    if shown_flash {
        flash::clear(&mut response);
    }
    response
}

pub fn raw_payload(response: &RemoteResponse) -> String {
    pretty_json(&response.payload)
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "optimo-dashboard"
    }))
}

pub async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(views::error_page("Page not found")))
}

pub fn panic_handler(_panic: Box<dyn Any + Send + 'static>) -> Response {
    error!("Handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(views::error_page("Server error")),
    )
        .into_response()
}
