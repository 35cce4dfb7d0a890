//! Spreadsheet rows to OptimoRoute orders
//!
//! Translation is driven by [`COLUMN_MAPPINGS`]: each entry names the
//! spreadsheet column, the order field it fills and how the cell is coerced.
//! Adding a column means adding a row to the table.

use std::collections::HashMap;

use crate::order::{format_number, Operation, Order, OrderBuilder, OrderField};

/// A spreadsheet cell, independent of the file format it was read from
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(n) => !n.is_finite(),
            Cell::Bool(b) => !b,
        }
    }

    fn as_text(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        match self {
            Cell::Text(s) => Some(s.trim().to_string()),
            Cell::Number(n) => Some(format_number(*n)),
            Cell::Bool(b) => Some(b.to_string()),
            Cell::Empty => None,
        }
    }

    fn as_number(&self) -> Option<f64> {
        let number = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Empty | Cell::Bool(_) => return None,
        };
        number.is_finite().then_some(number)
    }
}

/// One spreadsheet row keyed by header name
pub type Row = HashMap<String, Cell>;

/// How a cell value is interpreted before it reaches the order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    Text,
    Number,
}

/// Spreadsheet column to order field
#[derive(Debug, Clone, Copy)]
pub struct ColumnMapping {
    pub column: &'static str,
    pub field: OrderField,
    pub coercion: Coercion,
}

const fn text(column: &'static str, field: OrderField) -> ColumnMapping {
    ColumnMapping {
        column,
        field,
        coercion: Coercion::Text,
    }
}

const fn number(column: &'static str, field: OrderField) -> ColumnMapping {
    ColumnMapping {
        column,
        field,
        coercion: Coercion::Number,
    }
}

pub const COLUMN_MAPPINGS: &[ColumnMapping] = &[
    text("Order No", OrderField::OrderNo),
    text("Type", OrderField::Type),
    text("Date", OrderField::Date),
    text("Address", OrderField::Address),
    text("Location Name", OrderField::LocationName),
    number("Latitude", OrderField::Latitude),
    number("Longitude", OrderField::Longitude),
    number("Duration", OrderField::Duration),
    text("Time Window Start", OrderField::WindowFrom),
    text("Time Window End", OrderField::WindowTo),
    number("Load", OrderField::Load),
    text("Email", OrderField::Email),
    text("Phone", OrderField::Phone),
    text("Notes", OrderField::Notes),
];

/// Translate a single row into an upsert order
pub fn map_row(row: &Row) -> Order {
    let mut builder = OrderBuilder::new().operation(Operation::Sync);

    for mapping in COLUMN_MAPPINGS {
        let Some(cell) = row.get(mapping.column) else {
            continue;
        };

        match mapping.coercion {
            Coercion::Text => {
                if let Some(value) = cell.as_text() {
                    builder.text(mapping.field, &value);
                }
            }
            Coercion::Number => {
                if let Some(value) = cell.as_number() {
                    builder.number(mapping.field, value);
                }
            }
        }
    }

    builder.build()
}

/// Translate every row, in order
pub fn map_rows(rows: &[Row]) -> Vec<Order> {
    rows.iter().map(map_row).collect()
}
