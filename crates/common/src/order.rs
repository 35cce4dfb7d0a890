//! Order schema accepted by the OptimoRoute API
//!
//! Orders are only ever assembled and forwarded; the remote service owns the
//! schema. The single local rule is that blank values never reach the wire:
//! every optional field is skipped when absent.

use serde::{Deserialize, Serialize};

/// Operation marker for bulk create/update requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    /// Create the order, or replace it if the order number already exists
    Sync,
}

/// Order location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Location {
    pub fn is_empty(&self) -> bool {
        self.address.is_none()
            && self.location_name.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
    }
}

/// Delivery time window, bounds kept in their textual form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub tw_from: String,
    pub tw_to: String,
}

/// An order as sent to `create_order` or inside a bulk request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_no: Option<String>,

    /// `D` (delivery), `P` (pickup) or `T` (task)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// Service duration in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_windows: Option<Vec<TimeWindow>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub load1: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Logical order fields that forms and spreadsheet columns map onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    OrderNo,
    Type,
    Date,
    Address,
    LocationName,
    Latitude,
    Longitude,
    Duration,
    WindowFrom,
    WindowTo,
    Load,
    Email,
    Phone,
    Notes,
}

impl OrderField {
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            OrderField::Latitude | OrderField::Longitude | OrderField::Duration | OrderField::Load
        )
    }
}

/// Incrementally assembles an [`Order`] from loosely typed input.
///
/// Blank text is ignored, numeric fields that do not parse are ignored, the
/// location is attached only if one of its parts was set, and a time window is
/// attached only once both bounds are known.
#[derive(Debug, Default)]
pub struct OrderBuilder {
    order: Order,
    location: Location,
    window_from: Option<String>,
    window_to: Option<String>,
}

impl OrderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operation(mut self, operation: Operation) -> Self {
        self.order.operation = Some(operation);
        self
    }

    /// Set a field from text; numeric fields are parsed
    pub fn text(&mut self, field: OrderField, value: &str) -> &mut Self {
        let value = value.trim();
        if value.is_empty() {
            return self;
        }

        if field.is_numeric() {
            if let Ok(number) = value.parse::<f64>() {
                self.number(field, number);
            }
            return self;
        }

        let value = Some(value.to_string());
        match field {
            OrderField::OrderNo => self.order.order_no = value,
            OrderField::Type => self.order.order_type = value,
            OrderField::Date => self.order.date = value,
            OrderField::Address => self.location.address = value,
            OrderField::LocationName => self.location.location_name = value,
            OrderField::WindowFrom => self.window_from = value,
            OrderField::WindowTo => self.window_to = value,
            OrderField::Email => self.order.email = value,
            OrderField::Phone => self.order.phone = value,
            OrderField::Notes => self.order.notes = value,
            OrderField::Latitude
            | OrderField::Longitude
            | OrderField::Duration
            | OrderField::Load => {}
        }
        self
    }

    /// Set a field from a number; text fields receive its shortest rendering
    pub fn number(&mut self, field: OrderField, value: f64) -> &mut Self {
        if !value.is_finite() {
            return self;
        }

        match field {
            OrderField::Latitude => self.location.latitude = Some(value),
            OrderField::Longitude => self.location.longitude = Some(value),
            OrderField::Duration => self.order.duration = Some(value),
            OrderField::Load => self.order.load1 = Some(value),
            other => {
                self.text(other, &format_number(value));
            }
        }
        self
    }

    pub fn build(self) -> Order {
        let mut order = self.order;

        if !self.location.is_empty() {
            order.location = Some(self.location);
        }

        if let (Some(tw_from), Some(tw_to)) = (self.window_from, self.window_to) {
            order.time_windows = Some(vec![TimeWindow { tw_from, tw_to }]);
        }

        order
    }
}

/// Render whole numbers without a fractional part (`1001.0` becomes `1001`)
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
