//! Presenters for tables and diff records

mod json;
mod table;

pub use json::render_json;
pub use table::{render_diffs, render_table};
