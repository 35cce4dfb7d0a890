//! Order pages: listing, manual entry, spreadsheet import and deletion

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::FormRejection,
        Form, Multipart, Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{Html, Response},
};
use optimo_common::{map_rows, Error, OrderBuilder, OrderField, Row};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::{list_items, raw_payload, render_page, ApiError, DateQuery};
use crate::batch::BatchResult;
use crate::flash::{self, Flash};
use crate::spreadsheet;
use crate::views;
use crate::AppState;

/// Create-order form fields and the order fields they fill
const FORM_FIELDS: &[(&str, OrderField)] = &[
    ("order_no", OrderField::OrderNo),
    ("type", OrderField::Type),
    ("date", OrderField::Date),
    ("address", OrderField::Address),
    ("customer_name", OrderField::LocationName),
    ("latitude", OrderField::Latitude),
    ("longitude", OrderField::Longitude),
    ("duration", OrderField::Duration),
    ("tw_from", OrderField::WindowFrom),
    ("tw_to", OrderField::WindowTo),
    ("load", OrderField::Load),
    ("customer_email", OrderField::Email),
    ("customer_phone", OrderField::Phone),
    ("notes", OrderField::Notes),
];

pub async fn list_orders_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
    headers: HeaderMap,
) -> Response {
    let flash = Flash::from_headers(&headers);
    let date = query.date();

    let params: Vec<(&str, String)> = date
        .map(|date| ("date", date.to_string()))
        .into_iter()
        .collect();
    let response = state.client.get("get_orders", &params).await;
    let (orders, notice) = list_items(&response, "orders", "orders");

    let html = views::orders_page(flash.as_ref(), date, &orders, notice.as_deref());
    render_page(flash.is_some(), html)
}

pub async fn create_order_form_handler() -> Html<String> {
    Html(views::create_order_page())
}

/// Submit one order; blank fields are left out of the request
pub async fn create_order_handler(
    State(state): State<Arc<AppState>>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Response, ApiError> {
    let Form(form) = form?;
    let mut builder = OrderBuilder::new();
    for (name, field) in FORM_FIELDS {
        if let Some(value) = form.get(*name) {
            builder.text(*field, value);
        }
    }
    let order = builder.build();
    let body = serde_json::to_value(&order).map_err(Error::from)?;

    let response = state.client.post("create_order", &body).await;
    if !response.is_success() {
        warn!("Order creation rejected: {}", response.error_message());
        return Err(ApiError::remote(&response, response.error_message()));
    }

    let order_no = order.order_no.unwrap_or_default();
    info!("Created order {}", order_no);
    Ok(flash::redirect_with(
        "/orders",
        Flash::success(format!("Order {} created", order_no)),
    ))
}

/// Placement of one order in the current plan
pub async fn scheduling_info_handler(
    State(state): State<Arc<AppState>>,
    Path(order_no): Path<String>,
) -> Result<Html<String>, ApiError> {
    let response = state
        .client
        .get("get_scheduling_info", &[("orderNo", order_no.clone())])
        .await;

    if !response.is_success() {
        return Err(ApiError::remote(&response, raw_payload(&response)));
    }

    Ok(Html(views::scheduling_page(&order_no, &response.payload)))
}

/// Import orders from an uploaded `.xlsx`/`.xls` file in one bulk call
pub async fn upload_orders_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Html<String>, ApiError> {
    let mut multipart = multipart?;
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid upload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid upload: {}", e)))?;
        upload = Some((filename, bytes));
    }

    let (filename, bytes) = upload
        .filter(|(filename, _)| !filename.trim().is_empty())
        .ok_or(Error::MissingFile)?;

    let sheet_rows = tokio::task::spawn_blocking({
        let filename = filename.clone();
        move || spreadsheet::read_rows(&filename, bytes.to_vec())
    })
    .await
    .map_err(|e| ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: format!("Spreadsheet reader failed: {}", e),
    })??;
    if sheet_rows.is_empty() {
        return Err(Error::Spreadsheet("No order rows found".to_string()).into());
    }

    let (row_numbers, rows): (Vec<usize>, Vec<Row>) = sheet_rows.into_iter().unzip();
    let orders = map_rows(&rows);
    let labels: Vec<String> = row_numbers
        .iter()
        .zip(&orders)
        .map(|(row_number, order)| match &order.order_no {
            Some(order_no) => format!("Row {} ({})", row_number, order_no),
            None => format!("Row {}", row_number),
        })
        .collect();

    info!("Importing {} orders from {}", orders.len(), filename);
    let response = state
        .client
        .post("create_or_update_orders", &json!({ "orders": orders }))
        .await;

    let result = BatchResult::from_response(&labels, &response);
    info!(
        "Import of {} finished: {} of {} succeeded",
        filename, result.success_count, result.total
    );

    Ok(Html(views::batch_result_page(
        &filename,
        result.total,
        result.success_count,
        &result.errors,
    )))
}

#[derive(Debug, Deserialize)]
pub struct DeleteOrdersForm {
    #[serde(default)]
    pub order_numbers: String,
}

/// Delete a comma-separated list of order numbers
pub async fn delete_orders_handler(
    State(state): State<Arc<AppState>>,
    form: Result<Form<DeleteOrdersForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return rejected_form(rejection),
    };
    let order_numbers: Vec<&str> = form
        .order_numbers
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .collect();

    if order_numbers.is_empty() {
        return flash::redirect_with("/orders", Flash::error("No order numbers given"));
    }

    let body = json!({
        "orders": order_numbers
            .iter()
            .map(|order_no| json!({ "orderNo": order_no }))
            .collect::<Vec<Value>>()
    });
    let response = state.client.post("delete_orders", &body).await;

    let labels: Vec<String> = order_numbers
        .iter()
        .map(|order_no| format!("Order {}", order_no))
        .collect();
    let result = BatchResult::from_response(&labels, &response);
    info!(
        "Deleted {} of {} orders",
        result.success_count, result.total
    );

    let summary = format!("Deleted {} of {} orders", result.success_count, result.total);
    let flash = if result.failed() == 0 {
        Flash::success(summary)
    } else {
        Flash::error(format!("{}. {}", summary, result.errors.join("; ")))
    };
    flash::redirect_with("/orders", flash)
}

/// Delete every order, optionally only those on `date`
pub async fn delete_all_orders_handler(
    State(state): State<Arc<AppState>>,
    form: Result<Form<DateQuery>, FormRejection>,
) -> Response {
    let Form(query) = match form {
        Ok(form) => form,
        Err(rejection) => return rejected_form(rejection),
    };
    let body = match query.date() {
        Some(date) => json!({ "date": date }),
        None => json!({}),
    };
    let response = state.client.post("delete_all_orders", &body).await;

    let scope = match query.date() {
        Some(date) => format!("on {}", date),
        None => "in the plan".to_string(),
    };
    let flash = if response.is_success() {
        info!("Deleted all orders {}", scope);
        Flash::success(format!("Deleted all orders {}", scope))
    } else {
        warn!("Delete all orders failed: {}", response.error_message());
        Flash::error(format!(
            "Could not delete orders {}: {}",
            scope,
            response.error_message()
        ))
    };
    flash::redirect_with("/orders", flash)
}

/// Deletions never run on a malformed request; the order list reports why
fn rejected_form(rejection: FormRejection) -> Response {
    warn!("Rejected delete request: {}", rejection.body_text());
    flash::redirect_with(
        "/orders",
        Flash::error(format!("Invalid request: {}", rejection.body_text())),
    )
}
