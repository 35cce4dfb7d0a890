//! OptimoRoute Dashboard
//!
//! A small web front end over the OptimoRoute REST API for viewing routes,
//! drivers and orders, creating orders by hand or from a spreadsheet, and
//! deleting them.
//!
//! ## Architecture
//!
//! Handlers never talk HTTP to OptimoRoute themselves. They go through
//! [`client::OptimoClient`], which reads the current connection settings from
//! the shared [`settings::SettingsStore`] on every call and always hands back
//! a status and a JSON payload.
//!
//! ## Endpoints
//!
//! - `GET /` - Dashboard with today's counts
//! - `GET /routes?date=` - Routes for a date
//! - `GET /routes/{driver_serial}?date=` - One driver's route
//! - `GET /drivers` - Drivers
//! - `GET /orders?date=` - Orders
//! - `GET|POST /orders/create` - Create an order
//! - `GET /orders/{order_no}/schedule` - Scheduling info for an order
//! - `POST /orders/upload` - Import orders from `.xlsx`/`.xls`
//! - `POST /orders/delete` - Delete listed orders
//! - `POST /orders/delete-all` - Delete all orders
//! - `GET|POST /settings` - View or change connection settings
//! - `GET|POST /api-test` - Send an ad-hoc API call
//! - `GET /api/status` - Connection status as JSON
//! - `GET /health` - Health check

pub mod batch;
pub mod client;
pub mod config;
pub mod flash;
pub mod handlers;
pub mod settings;
pub mod spreadsheet;
pub mod views;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use client::OptimoClient;

const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// OptimoRoute client, holding the live settings
    pub client: OptimoClient,
}

impl AppState {
    pub fn new(client: OptimoClient) -> Self {
        Self { client }
    }
}

/// Create the dashboard router
pub fn create_router(state: AppState) -> Router {
    use handlers::{dashboard, orders, routes};

    let state = Arc::new(state);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_handler))
        // Overview and connection status
        .route("/", get(dashboard::home_handler))
        .route("/api/status", get(dashboard::status_handler))
        // Routes and drivers
        .route("/routes", get(routes::list_routes_handler))
        .route("/routes/{driver_serial}", get(routes::route_detail_handler))
        .route("/drivers", get(routes::list_drivers_handler))
        // Orders
        .route("/orders", get(orders::list_orders_handler))
        .route(
            "/orders/create",
            get(orders::create_order_form_handler).post(orders::create_order_handler),
        )
        .route(
            "/orders/{order_no}/schedule",
            get(orders::scheduling_info_handler),
        )
        .route("/orders/upload", post(orders::upload_orders_handler))
        .route("/orders/delete", post(orders::delete_orders_handler))
        .route("/orders/delete-all", post(orders::delete_all_orders_handler))
        // Settings and API console
        .route(
            "/settings",
            get(dashboard::settings_handler).post(dashboard::update_settings_handler),
        )
        .route(
            "/api-test",
            get(dashboard::api_test_form_handler).post(dashboard::api_test_handler),
        )
        .fallback(handlers::not_found_handler)
        // Middleware
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CatchPanicLayer::custom(handlers::panic_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
