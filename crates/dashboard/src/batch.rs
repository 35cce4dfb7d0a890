//! Per-item outcome of bulk calls (`create_or_update_orders`, `delete_orders`)

use serde::Serialize;
use serde_json::Value;

use crate::client::RemoteResponse;

/// Error lines kept for display; the counts still cover every item
pub const MAX_REPORTED_ERRORS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub total: usize,
    pub success_count: usize,
    pub errors: Vec<String>,
}

impl BatchResult {
    /// Read the outcome of a bulk call. `labels` names each submitted item in
    /// request order and prefixes its error line.
    ///
    /// When the remote answers with an `orders` array, each entry reports its
    /// own `success`; a missing entry counts as failed. A successful call
    /// without that array succeeds for every item. Anything else fails the
    /// whole batch with a single error line.
    pub fn from_response(labels: &[String], response: &RemoteResponse) -> Self {
        let total = labels.len();
        let results = response.payload.get("orders").and_then(Value::as_array);

        match results {
            Some(results) if matches!(response.status, 200 | 201) => {
                let mut success_count = 0;
                let mut errors = Vec::new();

                for (index, label) in labels.iter().enumerate() {
                    match results.get(index) {
                        Some(result) if item_succeeded(result) => success_count += 1,
                        Some(result) => {
                            errors.push(format!("{}: {}", label, item_error(result)))
                        }
                        None => errors.push(format!("{}: no result returned", label)),
                    }
                }
                errors.truncate(MAX_REPORTED_ERRORS);

                BatchResult {
                    total,
                    success_count,
                    errors,
                }
            }
            _ if response.is_success() => BatchResult {
                total,
                success_count: total,
                errors: Vec::new(),
            },
            _ => BatchResult {
                total,
                success_count: 0,
                errors: vec![format!("Request failed: {}", response.error_message())],
            },
        }
    }

    pub fn failed(&self) -> usize {
        self.total - self.success_count
    }
}

fn item_succeeded(result: &Value) -> bool {
    result.get("success").and_then(Value::as_bool) != Some(false)
}

fn item_error(result: &Value) -> String {
    let message = result.get("message").and_then(Value::as_str);
    let code = result.get("code").and_then(Value::as_str);

    match (message, code) {
        (Some(message), Some(code)) => format!("{} ({})", message, code),
        (Some(message), None) => message.to_string(),
        (None, Some(code)) => code.to_string(),
        (None, None) => "rejected".to_string(),
    }
}
