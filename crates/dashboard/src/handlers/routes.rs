//! Route and driver pages

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, Response},
};
use serde_json::Value;
use std::sync::Arc;

use super::{list_items, raw_payload, render_page, today, ApiError, DateQuery};
use crate::flash::Flash;
use crate::views;
use crate::AppState;

/// Routes for `?date=` (today when absent)
pub async fn list_routes_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
    headers: HeaderMap,
) -> Response {
    let flash = Flash::from_headers(&headers);
    let date = query.date().map(str::to_string).unwrap_or_else(today);

    let response = state.client.get("get_routes", &[("date", date.clone())]).await;
    let (routes, notice) = list_items(&response, "routes", "routes");

    let html = views::routes_page(flash.as_ref(), &date, &routes, notice.as_deref());
    render_page(flash.is_some(), html)
}

/// One driver's route and its stops
pub async fn route_detail_handler(
    State(state): State<Arc<AppState>>,
    Path(driver_serial): Path<String>,
    Query(query): Query<DateQuery>,
) -> Result<Html<String>, ApiError> {
    let date = query.date().map(str::to_string).unwrap_or_else(today);

    let response = state
        .client
        .get(
            "get_routes",
            &[("driverSerial", driver_serial.clone()), ("date", date.clone())],
        )
        .await;

    if response.status != 200 {
        return Err(ApiError::remote(&response, raw_payload(&response)));
    }

    let route = response
        .items("routes")
        .into_iter()
        .find(|route| {
            route
                .get("driverSerial")
                .and_then(Value::as_str)
                .map_or(true, |serial| serial == driver_serial)
        })
        .ok_or_else(|| ApiError {
            status: StatusCode::NOT_FOUND,
            message: format!("No route for driver {} on {}", driver_serial, date),
        })?;

    Ok(Html(views::route_detail_page(&driver_serial, &date, &route)))
}

pub async fn list_drivers_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let flash = Flash::from_headers(&headers);

    let response = state.client.get("get_drivers", &[]).await;
    let (drivers, notice) = list_items(&response, "drivers", "drivers");

    let html = views::drivers_page(flash.as_ref(), &drivers, notice.as_deref());
    render_page(flash.is_some(), html)
}
