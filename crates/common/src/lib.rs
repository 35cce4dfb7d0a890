pub mod error;
pub mod import;
pub mod order;

pub use error::{Error, Result};
pub use import::{map_row, map_rows, Cell, Coercion, ColumnMapping, Row, COLUMN_MAPPINGS};
pub use order::{Location, Operation, Order, OrderBuilder, OrderField, TimeWindow};
