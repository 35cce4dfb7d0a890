//! HTML pages
//!
//! Plain string building; every dynamic value goes through [`escape`].

use serde_json::Value;
use std::fmt::Write;
use url::form_urlencoded;

use crate::client::pretty_json;
use crate::flash::Flash;
use crate::settings::ApiSettings;

/// Table column: header text and JSON pointer into each item
pub struct Column {
    pub header: &'static str,
    pub pointer: &'static str,
}

const fn col(header: &'static str, pointer: &'static str) -> Column {
    Column { header, pointer }
}

pub const ROUTE_COLUMNS: &[Column] = &[
    col("Driver", "/driverName"),
    col("Serial", "/driverSerial"),
    col("Vehicle", "/vehicleRegistration"),
    col("Duration (min)", "/duration"),
    col("Distance (km)", "/distance"),
];

pub const STOP_COLUMNS: &[Column] = &[
    col("#", "/stopNumber"),
    col("Order", "/orderNo"),
    col("Address", "/address"),
    col("Scheduled", "/scheduledAt"),
];

pub const DRIVER_COLUMNS: &[Column] = &[
    col("Serial", "/serial"),
    col("Name", "/name"),
    col("Vehicle", "/vehicleRegistration"),
    col("Shift start", "/workTimeFrom"),
    col("Shift end", "/workTimeTo"),
];

pub const ORDER_COLUMNS: &[Column] = &[
    col("Order No", "/orderNo"),
    col("Type", "/type"),
    col("Date", "/date"),
    col("Address", "/location/address"),
    col("Duration", "/duration"),
    col("Notes", "/notes"),
];

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Look up a pointer, also inside a `data` wrapper object
pub fn lookup<'a>(item: &'a Value, pointer: &str) -> Option<&'a Value> {
    item.pointer(pointer)
        .or_else(|| item.pointer(&format!("/data{}", pointer)))
}

/// Percent-encode one URL path segment
pub fn path_segment(text: &str) -> String {
    // byte_serialize leaves spaces as '+', which a path keeps literally
    query_value(text).replace('+', "%20")
}

pub fn query_value(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

pub fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn layout(title: &str, flash: Option<&Flash>, body: &str) -> String {
    let notice = flash
        .map(|f| {
            format!(
                r#"<div class="flash {}">{}</div>"#,
                f.level.as_str(),
                escape(&f.message)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - OptimoRoute Dashboard</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
nav a {{ margin-right: 1rem; }}
table {{ border-collapse: collapse; margin: 1rem 0; }}
td, th {{ border: 1px solid #ccc; padding: 0.3rem 0.6rem; text-align: left; }}
.flash {{ padding: 0.6rem; margin: 1rem 0; }}
.success {{ background: #e3f6e3; }}
.error {{ background: #fbe3e3; }}
form {{ margin: 1rem 0; }}
label {{ display: block; margin: 0.3rem 0; }}
</style>
</head>
<body>
<nav><a href="/">Home</a><a href="/routes">Routes</a><a href="/orders">Orders</a><a href="/drivers">Drivers</a><a href="/settings">Settings</a><a href="/api-test">API test</a></nav>
<h1>{title}</h1>
{notice}
{body}
</body>
</html>"#,
        title = escape(title),
        notice = notice,
        body = body,
    )
}

fn notice_block(notice: Option<&str>) -> String {
    notice
        .map(|n| format!(r#"<div class="flash error">{}</div>"#, escape(n)))
        .unwrap_or_default()
}

/// Builds the href for an item's first cell
pub type LinkFn<'a> = &'a dyn Fn(&Value) -> Option<String>;

/// Render items as a table; `link` turns the first cell into a link
pub fn table(items: &[Value], columns: &[Column], link: Option<LinkFn<'_>>) -> String {
    if items.is_empty() {
        return "<p>Nothing to show.</p>".to_string();
    }

    let mut html = String::from("<table><thead><tr>");
    for column in columns {
        let _ = write!(html, "<th>{}</th>", escape(column.header));
    }
    html.push_str("</tr></thead><tbody>");

    for item in items {
        html.push_str("<tr>");
        for (index, column) in columns.iter().enumerate() {
            let text = escape(&value_text(lookup(item, column.pointer)));
            let href = if index == 0 { link.and_then(|f| f(item)) } else { None };
            match href {
                Some(href) => {
                    let _ = write!(html, r#"<td><a href="{}">{}</a></td>"#, escape(&href), text);
                }
                None => {
                    let _ = write!(html, "<td>{}</td>", text);
                }
            }
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html
}

pub fn home_page(
    flash: Option<&Flash>,
    masked_key: &str,
    routes: usize,
    drivers: usize,
    orders: usize,
    notices: &[String],
) -> String {
    let notices: String = notices.iter().map(|n| notice_block(Some(n.as_str()))).collect();
    let body = format!(
        r#"{}<p>API key: <code>{}</code></p>
<ul>
<li><a href="/routes">Routes today</a>: {}</li>
<li><a href="/drivers">Drivers</a>: {}</li>
<li><a href="/orders">Orders</a>: {}</li>
</ul>
<p><a href="/orders/create">Create order</a> | <a href="/api/status">API status (JSON)</a></p>"#,
        notices,
        escape(masked_key),
        routes,
        drivers,
        orders
    );
    layout("Dashboard", flash, &body)
}

pub fn routes_page(flash: Option<&Flash>, date: &str, routes: &[Value], notice: Option<&str>) -> String {
    let link: LinkFn = &|route: &Value| {
        let serial = value_text(lookup(route, "/driverSerial"));
        (!serial.is_empty()).then(|| {
            format!("/routes/{}?date={}", path_segment(&serial), query_value(date))
        })
    };

    let body = format!(
        r#"{}<form method="get" action="/routes"><label>Date <input type="date" name="date" value="{}"></label><button>Show</button></form>{}"#,
        notice_block(notice),
        escape(date),
        table(routes, ROUTE_COLUMNS, Some(link))
    );
    layout(&format!("Routes for {}", date), flash, &body)
}

pub fn route_detail_page(driver_serial: &str, date: &str, route: &Value) -> String {
    let stops = lookup(route, "/stops")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let body = format!(
        r#"<p>Driver: {} ({})</p>
<p>Vehicle: {}</p>
<h2>Stops</h2>
{}
<h2>Raw</h2>
<pre>{}</pre>"#,
        escape(&value_text(lookup(route, "/driverName"))),
        escape(driver_serial),
        escape(&value_text(lookup(route, "/vehicleRegistration"))),
        table(&stops, STOP_COLUMNS, None),
        escape(&pretty_json(route))
    );
    layout(&format!("Route {} on {}", driver_serial, date), None, &body)
}

pub fn drivers_page(flash: Option<&Flash>, drivers: &[Value], notice: Option<&str>) -> String {
    let body = format!(
        "{}{}",
        notice_block(notice),
        table(drivers, DRIVER_COLUMNS, None)
    );
    layout("Drivers", flash, &body)
}

pub fn orders_page(
    flash: Option<&Flash>,
    date: Option<&str>,
    orders: &[Value],
    notice: Option<&str>,
) -> String {
    let link: LinkFn = &|order: &Value| {
        let order_no = value_text(lookup(order, "/orderNo"));
        (!order_no.is_empty()).then(|| format!("/orders/{}/schedule", path_segment(&order_no)))
    };

    let body = format!(
        r#"{notice}
<form method="get" action="/orders"><label>Date <input type="date" name="date" value="{date}"></label><button>Filter</button></form>
<p><a href="/orders/create">Create order</a></p>
{table}
<h2>Upload spreadsheet</h2>
<form method="post" action="/orders/upload" enctype="multipart/form-data">
<input type="file" name="file" accept=".xlsx,.xls"><button>Upload</button>
</form>
<h2>Delete orders</h2>
<form method="post" action="/orders/delete">
<label>Order numbers (comma separated) <input name="order_numbers"></label><button>Delete</button>
</form>
<form method="post" action="/orders/delete-all">
<label>Only date (optional) <input type="date" name="date"></label><button>Delete all orders</button>
</form>"#,
        notice = notice_block(notice),
        date = escape(date.unwrap_or_default()),
        table = table(orders, ORDER_COLUMNS, Some(link)),
    );
    layout("Orders", flash, &body)
}

pub fn create_order_page() -> String {
    let body = r#"<form method="post" action="/orders/create">
<label>Order No <input name="order_no"></label>
<label>Type <select name="type"><option value="D">Delivery</option><option value="P">Pickup</option><option value="T">Task</option></select></label>
<label>Date <input type="date" name="date"></label>
<label>Address <input name="address"></label>
<label>Customer name <input name="customer_name"></label>
<label>Latitude <input name="latitude"></label>
<label>Longitude <input name="longitude"></label>
<label>Duration (min) <input name="duration"></label>
<label>Time window from <input type="time" name="tw_from"></label>
<label>Time window to <input type="time" name="tw_to"></label>
<label>Load <input name="load"></label>
<label>Customer email <input type="email" name="customer_email"></label>
<label>Customer phone <input name="customer_phone"></label>
<label>Notes <textarea name="notes"></textarea></label>
<button>Create</button>
</form>"#;
    layout("Create order", None, body)
}

pub fn batch_result_page(filename: &str, total: usize, success_count: usize, errors: &[String]) -> String {
    let mut body = format!(
        "<p>File: {}</p><p>Total rows: {}</p><p>Succeeded: {}</p><p>Failed: {}</p>",
        escape(filename),
        total,
        success_count,
        total.saturating_sub(success_count)
    );
    if !errors.is_empty() {
        body.push_str("<h2>Errors</h2><ul>");
        for error in errors {
            let _ = write!(body, "<li>{}</li>", escape(error));
        }
        body.push_str("</ul>");
    }
    body.push_str(r#"<p><a href="/orders">Back to orders</a></p>"#);
    layout("Upload result", None, &body)
}

pub fn settings_page(flash: Option<&Flash>, settings: &ApiSettings) -> String {
    let mut endpoints = String::new();
    for (name, path) in &settings.endpoints {
        let _ = write!(
            endpoints,
            r#"<label>{name} <input name="endpoint_{name}" value="{path}"></label>"#,
            name = escape(name),
            path = escape(path)
        );
    }

    let body = format!(
        r#"<p>Current key: <code>{key}</code></p>
<form method="post" action="/settings">
<label>API key (blank keeps current) <input type="password" name="api_key"></label>
<label>Base URL <input name="base_url" value="{base_url}"></label>
<h2>Endpoints</h2>
{endpoints}
<button>Save</button>
</form>
<p>Changes last until the dashboard restarts.</p>"#,
        key = escape(&settings.masked_key()),
        base_url = escape(&settings.base_url),
        endpoints = endpoints,
    );
    layout("Settings", flash, &body)
}

/// Result of an API test call: status and payload
pub struct TestResult<'a> {
    pub endpoint: &'a str,
    pub method: &'a str,
    pub status: u16,
    pub payload: &'a Value,
}

pub fn api_test_page(endpoints: &[String], result: Option<TestResult<'_>>) -> String {
    let options: String = endpoints
        .iter()
        .map(|name| format!(r#"<option value="{0}">{0}</option>"#, escape(name)))
        .collect();

    let mut body = format!(
        r#"<form method="post" action="/api-test">
<label>Endpoint <select name="endpoint">{options}</select></label>
<label>Method <select name="method"><option>GET</option><option>POST</option></select></label>
<label>JSON payload (optional) <textarea name="payload" rows="8" cols="60"></textarea></label>
<button>Send</button>
</form>"#
    );

    if let Some(result) = result {
        let _ = write!(
            body,
            "<h2>{} {} returned {}</h2><pre>{}</pre>",
            escape(result.method),
            escape(result.endpoint),
            result.status,
            escape(&pretty_json(result.payload))
        );
    }
    layout("API test", None, &body)
}

pub fn scheduling_page(order_no: &str, info: &Value) -> String {
    let body = format!(
        r#"<p>Scheduled: {}</p><p>Driver: {}</p><p>Stop: {}</p><p>Scheduled at: {}</p><pre>{}</pre><p><a href="/orders">Back to orders</a></p>"#,
        escape(&value_text(lookup(info, "/orderScheduled"))),
        escape(&value_text(lookup(info, "/scheduleInformation/driverName"))),
        escape(&value_text(lookup(info, "/scheduleInformation/stopNumber"))),
        escape(&value_text(lookup(info, "/scheduleInformation/scheduledAt"))),
        escape(&pretty_json(info))
    );
    layout(&format!("Order {}", order_no), None, &body)
}

pub fn error_page(error: &str) -> String {
    let body = format!(
        r#"<pre>{}</pre><p><a href="/">Back to dashboard</a></p>"#,
        escape(error)
    );
    layout("Error", None, &body)
}
