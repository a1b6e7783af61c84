//! Data model: what the upstream query layer hands to the renderers.
//!
//! This module holds the read-only inputs of every render call:
//!
//! - **Values**: typed scalars with JSON and display forms (`Value`, `ValueType`)
//! - **Tables**: validated columns and rows of cells (`Table`, `Column`, `Cell`)
//! - **Status**: the response outcome and its reason (`ResponseStatus`, `ReasonType`)
//!
//! ## Example
//!
//! ```rust
//! use vizrenderlib::data::{Cell, Column, Table, ValueType};
//!
//! let mut table = Table::new();
//! table.add_column(Column::new("name", ValueType::Text, "Name")).unwrap();
//! table.add_row(vec![Cell::new("aaa")]).unwrap();
//! assert_eq!(table.row_count(), 1);
//! ```

pub mod status;
pub mod table;
pub mod value;

pub use status::{ReasonType, ResponseStatus, Warning};
pub use table::{Cell, Column, Properties, Table, TableRow};
pub use value::{Value, ValueType};
