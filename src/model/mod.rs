//! Core data model: values, rows, and tables

mod table;
mod value;

pub use table::{Row, Table};
pub use value::Value;
