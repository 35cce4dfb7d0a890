//! Integration tests for the OptimoRoute dashboard

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use optimo_dashboard::{
    client::OptimoClient,
    config::DEFAULT_ENDPOINTS,
    create_router,
    settings::{ApiSettings, AuthStyle, SettingsStore},
    AppState,
};
use rust_xlsxwriter::Workbook;
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a test app talking to `base_url`
fn create_test_app(base_url: &str) -> (Router, SettingsStore) {
    let settings = SettingsStore::new(ApiSettings {
        api_key: "test-key".to_string(),
        base_url: base_url.to_string(),
        endpoints: DEFAULT_ENDPOINTS
            .iter()
            .map(|(name, path)| (name.to_string(), path.to_string()))
            .collect(),
        auth_style: AuthStyle::Both,
    });
    let client = OptimoClient::new(settings.clone(), 5).unwrap();

    (create_router(AppState::new(client)), settings)
}

async fn body_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

fn post_file(uri: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
    post_multipart(uri, "file", filename, bytes)
}

fn post_multipart(uri: &str, field: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
    let boundary = "dashboard-test-boundary";
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn received_json(server: &MockServer, endpoint: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == endpoint)
        .map(|request| serde_json::from_slice(&request.body).unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = create_test_app("http://127.0.0.1:9");

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "optimo-dashboard");
}

#[tokio::test]
async fn test_unknown_page_is_404() {
    let (app, _) = create_test_app("http://127.0.0.1:9");

    let response = app.oneshot(get("/no/such/page")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Page not found"));
}

#[tokio::test]
async fn test_create_order_omits_blank_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/create_order"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "id": "abc" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());
    let form = "order_no=A-1&type=D&date=2026-10-19&address=123+Main+St&customer_name=\
                &latitude=&longitude=&duration=10&tw_from=&tw_to=&load=\
                &customer_email=&customer_phone=&notes=";

    let response = app
        .oneshot(post_form("/orders/create", form))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/orders");
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("flash=level=success&message=Order+A-1+created"));

    let bodies = received_json(&server, "/create_order").await;
    assert_eq!(bodies.len(), 1);
    let order = &bodies[0];
    assert_eq!(order["orderNo"], "A-1");
    assert_eq!(order["location"], json!({ "address": "123 Main St" }));
    assert!(order.get("timeWindows").is_none());
    assert!(order.get("email").is_none());
    assert!(order.get("notes").is_none());
}

#[tokio::test]
async fn test_create_order_rejection_shows_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/create_order"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({ "success": false, "code": "ERR_ORD_EXISTS", "message": "Order already exists" }),
        ))
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());

    let response = app
        .oneshot(post_form("/orders/create", "order_no=A-1&address=x"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(body_text(response).await.contains("Order already exists"));
}

fn orders_workbook() -> Vec<u8> {
    workbook_from(&[
        ["Order No", "Address", "Latitude", "Longitude"],
        ["A-1", "1 First St", "40.1", "-73.1"],
        ["A-2", "2 Nowhere Rd", "", ""],
        ["A-3", "3 Third St", "40.3", "-73.3"],
    ])
}

fn workbook_from(rows: &[[&str; 4]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}

#[tokio::test]
async fn test_upload_reports_per_row_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/create_or_update_orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "orders": [
                { "success": true, "orderNo": "A-1", "id": "1" },
                { "success": false, "orderNo": "A-2", "code": "ERR_LOC_GEOCODING", "message": "Address not found" },
                { "success": true, "orderNo": "A-3", "id": "3" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());

    let response = app
        .oneshot(post_file("/orders/upload", "orders.xlsx", &orders_workbook()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Total rows: 3"));
    assert!(html.contains("Succeeded: 2"));
    assert!(html.contains("Failed: 1"));
    assert!(html.contains("Row 2 (A-2): Address not found"));

    let bodies = received_json(&server, "/create_or_update_orders").await;
    let orders = bodies[0]["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 3);
    assert_eq!(orders[0]["operation"], "SYNC");
    assert_eq!(orders[0]["location"]["latitude"], json!(40.1));
    assert!(orders[1]["location"].get("latitude").is_none());
}

#[tokio::test]
async fn test_upload_rejects_other_file_types() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());

    let response = app
        .oneshot(post_file("/orders/upload", "orders.csv", b"Order No\nA-1\n"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("orders.csv"));
}

#[tokio::test]
async fn test_status_when_api_unreachable() {
    // Nothing listens on the discard port
    let (app, _) = create_test_app("http://127.0.0.1:9");

    let response = app.oneshot(get("/api/status")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["http_status"], 500);
    assert_eq!(json["api_key_configured"], true);
    assert!(!json["response"]["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_status_connected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_routes"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "routes": [] })),
        )
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());

    let response = app.oneshot(get("/api/status")).await.unwrap();
    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();

    assert_eq!(json["status"], "connected");
    assert_eq!(json["http_status"], 200);
    assert_eq!(json["endpoints"]["get_routes"], "/get_routes");
}

#[tokio::test]
async fn test_list_routes_is_repeatable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_routes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "routes": [{ "driverSerial": "D1", "driverName": "Ana", "duration": 240 }]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());

    let first = app
        .clone()
        .oneshot(get("/routes?date=2026-10-19"))
        .await
        .unwrap();
    let second = app.oneshot(get("/routes?date=2026-10-19")).await.unwrap();

    assert_eq!(first.status(), StatusCode::OK);
    let first = body_text(first).await;
    assert_eq!(first, body_text(second).await);
    assert!(first.contains("Ana"));
    assert!(first.contains("/routes/D1?date=2026-10-19"));
}

#[tokio::test]
async fn test_list_failure_shows_notice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_drivers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({ "success": false, "code": "ERR_AUTH", "message": "Invalid API key" }),
        ))
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());

    let response = app.oneshot(get("/drivers")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Could not load drivers: Invalid API key"));
    assert!(html.contains("Nothing to show."));
}

#[tokio::test]
async fn test_route_detail_error_shows_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_routes"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "code": "ERR_NOT_FOUND" })),
        )
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());

    let response = app
        .oneshot(get("/routes/D9?date=2026-10-19"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("ERR_NOT_FOUND"));
}

#[tokio::test]
async fn test_flash_is_shown_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_orders"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "orders": [] })),
        )
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());
    let request = Request::builder()
        .uri("/orders")
        .header(header::COOKIE, "flash=level=success&message=Order+A-1+created")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));
    assert!(body_text(response).await.contains("Order A-1 created"));
}

#[tokio::test]
async fn test_delete_orders_counts_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/delete_orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "orders": [
                { "success": true, "orderNo": "A-1" },
                { "success": false, "orderNo": "A-9", "code": "ERR_ORD_NOT_FOUND" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());

    let response = app
        .oneshot(post_form("/orders/delete", "order_numbers=A-1%2C+A-9%2C"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("flash=level=error&message=Deleted+1+of+2+orders"));

    let bodies = received_json(&server, "/delete_orders").await;
    assert_eq!(
        bodies[0],
        json!({ "orders": [{ "orderNo": "A-1" }, { "orderNo": "A-9" }] })
    );
}

#[tokio::test]
async fn test_delete_all_redirects_even_on_failure() {
    let (app, _) = create_test_app("http://127.0.0.1:9");

    let response = app
        .oneshot(post_form("/orders/delete-all", "date=2026-10-19"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/orders");
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("flash=level=error"));
}

#[tokio::test]
async fn test_settings_update_applies_to_next_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/get_drivers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "drivers": [{ "serial": "D7", "name": "Bo" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, settings) = create_test_app(&server.uri());

    let response = app
        .clone()
        .oneshot(post_form(
            "/settings",
            "api_key=new-key-0123456789abcdef&base_url=&endpoint_get_drivers=%2Fv2%2Fget_drivers",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let current = settings.snapshot().await;
    assert_eq!(current.api_key, "new-key-0123456789abcdef");
    assert_eq!(current.base_url, server.uri());
    assert_eq!(current.endpoints["get_drivers"], "/v2/get_drivers");

    let response = app.oneshot(get("/drivers")).await.unwrap();
    assert!(body_text(response).await.contains("Bo"));
}

#[tokio::test]
async fn test_settings_rejects_unknown_endpoint() {
    let (app, settings) = create_test_app("http://127.0.0.1:9");

    let response = app
        .oneshot(post_form(
            "/settings",
            "api_key=other&endpoint_get_weather=%2Fweather",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(settings.snapshot().await.api_key, "test-key");
}

#[tokio::test]
async fn test_api_test_rejects_invalid_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());

    let response = app
        .oneshot(post_form(
            "/api-test",
            "endpoint=create_order&method=POST&payload=%7Bnot+json",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Invalid JSON payload"));
}

#[tokio::test]
async fn test_api_test_shows_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/create_order"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "id": "xyz-42" })),
        )
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());

    let response = app
        .oneshot(post_form(
            "/api-test",
            "endpoint=create_order&method=POST&payload=%7B%22orderNo%22%3A%22T-1%22%7D",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("POST create_order returned 200"));
    assert!(html.contains("xyz-42"));
}

#[tokio::test]
async fn test_home_page_counts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_routes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "routes": [{ "driverSerial": "D1" }, { "driverSerial": "D2" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get_drivers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "drivers": [{ "serial": "D1" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get_orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "orders": [{ "orderNo": "A-1" }, { "orderNo": "A-2" }, { "orderNo": "A-3" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Routes today</a>: 2"));
    assert!(html.contains("Drivers</a>: 1"));
    assert!(html.contains("Orders</a>: 3"));
    assert!(!html.contains("Could not load"));
}

#[tokio::test]
async fn test_home_page_explains_failed_counts() {
    let (app, _) = create_test_app("http://127.0.0.1:9");

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Could not load routes: Connection failed"));
    assert!(html.contains("Could not load drivers"));
    assert!(html.contains("Could not load orders"));
}

#[tokio::test]
async fn test_scheduling_info_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_scheduling_info"))
        .and(query_param("orderNo", "A/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "orderScheduled": true,
            "scheduleInformation": { "driverName": "Ana", "stopNumber": 3, "scheduledAt": "09:30" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());

    let response = app
        .oneshot(get("/orders/A%2F1/schedule"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Order A/1"));
    assert!(html.contains("<p>Scheduled: true</p>"));
    assert!(html.contains("<p>Driver: Ana</p>"));
    assert!(html.contains("<p>Scheduled at: 09:30</p>"));
}

#[tokio::test]
async fn test_scheduling_info_rejection_shows_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_scheduling_info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({ "success": false, "code": "ERR_ORD_NOT_FOUND" }),
        ))
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());

    let response = app.oneshot(get("/orders/A-404/schedule")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(body_text(response).await.contains("ERR_ORD_NOT_FOUND"));
}

#[tokio::test]
async fn test_route_detail_shows_stops() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_routes"))
        .and(query_param("driverSerial", "D1"))
        .and(query_param("date", "2026-10-19"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "routes": [{
                "driverSerial": "D1",
                "driverName": "Ana",
                "stops": [{ "stopNumber": 1, "orderNo": "A-1", "address": "1 First St" }]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());

    let response = app
        .oneshot(get("/routes/D1?date=2026-10-19"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Route D1 on 2026-10-19"));
    assert!(html.contains("Ana"));
    assert!(html.contains("1 First St"));
}

#[tokio::test]
async fn test_route_detail_without_route_is_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_routes"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "routes": [] })),
        )
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());

    let response = app
        .oneshot(get("/routes/D2?date=2026-10-19"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response)
        .await
        .contains("No route for driver D2 on 2026-10-19"));
}

#[tokio::test]
async fn test_upload_without_file_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());

    let response = app
        .clone()
        .oneshot(post_multipart("/orders/upload", "attachment", "orders.xlsx", b"x"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("No file uploaded"));

    let response = app
        .oneshot(post_form("/orders/upload", "file=orders.xlsx"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Invalid upload"));
}

#[tokio::test]
async fn test_upload_errors_name_sheet_rows() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/create_or_update_orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "orders": [
                { "success": true, "orderNo": "A-1" },
                { "success": false, "orderNo": "A-3", "message": "bad" }
            ]
        })))
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());
    let workbook = workbook_from(&[
        ["Order No", "Address", "", ""],
        ["A-1", "1 First St", "", ""],
        ["", "", "", ""],
        ["A-3", "3 Third St", "", ""],
    ]);

    let response = app
        .oneshot(post_file("/orders/upload", "orders.xlsx", &workbook))
        .await
        .unwrap();

    let html = body_text(response).await;
    assert!(html.contains("Total rows: 2"));
    assert!(html.contains("Row 3 (A-3): bad"));
}

#[tokio::test]
async fn test_delete_all_orders() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/delete_all_orders"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());

    let response = app
        .oneshot(post_form("/orders/delete-all", "date="))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/orders");
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("flash=level=success&message=Deleted+all+orders+in+the+plan"));
}

#[tokio::test]
async fn test_malformed_delete_requests_redirect_without_calling_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    let (app, _) = create_test_app(&server.uri());

    for uri in ["/orders/delete-all", "/orders/delete"] {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::from("date=2026-10-19"))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/orders");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("flash=level=error&message=Invalid+request"));
    }
}

#[tokio::test]
async fn test_malformed_forms_get_error_page() {
    let (app, _) = create_test_app("http://127.0.0.1:9");

    let response = app
        .clone()
        .oneshot(post_form("/api-test", "method=GET"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    assert!(body_text(response).await.contains("Invalid form"));

    let request = Request::builder()
        .method("POST")
        .uri("/orders/create")
        .body(Body::from("order_no=A-1"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Invalid form"));
}
