//! # vizrenderlib
//!
//! Renders an in-memory data table into the wire formats a visualization
//! data source serves: JSON, JSONP, CSV, TSV, TSV for spreadsheet import
//! (UTF-16LE) and a minimal HTML preview.
//!
//! ## Overview
//!
//! The upstream query layer hands over a fully built [`Table`] and a
//! [`ResponseStatus`]; the request layer hands over parsed
//! [`RenderOptions`]. The [`ResponseWriter`] picks the renderer for the
//! requested format, produces the body and tells the transport which
//! content type and headers to send.
//!
//! ## Features
//!
//! - **Byte-exact JSON**: fixed key order, compact output, JVM-compatible
//!   number text, ASCII-only escaping
//! - **Table signatures**: a deterministic `sig` clients use to skip
//!   unchanged tables
//! - **Error envelopes**: failed requests render as a JSON `errors` list
//! - **Safe JSONP**: callback names are validated before anything is rendered
//! - **Pure functions**: no I/O, no shared state; render from any thread
//!
//! ## Example
//!
//! ```rust
//! use vizrenderlib::{
//!     render_json_response, Cell, Column, RenderOptions, ResponseStatus, Table, ValueType,
//! };
//!
//! let mut table = Table::new();
//! table.add_column(Column::new("A", ValueType::Text, "col0")).unwrap();
//! table.add_column(Column::new("B", ValueType::Number, "col1")).unwrap();
//! table.add_row(vec![Cell::new("aaa"), Cell::with_formatted(222, "222")]).unwrap();
//!
//! let json = render_json_response(&RenderOptions::new(), &ResponseStatus::ok(), Some(&table))
//!     .unwrap();
//! assert!(json.contains(r#"{"v":222.0,"f":"222"}"#));
//! ```

pub mod data;
pub mod error;
pub mod options;
pub mod output;
pub mod response;
pub mod signature;

pub use data::{
    Cell, Column, Properties, ReasonType, ResponseStatus, Table, TableRow, Value, ValueType,
    Warning,
};
pub use error::RenderError;
pub use options::{OutputFormat, RenderOptions};
pub use output::{
    render_csv, render_data_table, render_html, render_json_response, render_tsv,
    render_tsv_excel,
};
pub use response::{BufferedResponse, RenderedResponse, ResponseSink, ResponseWriter};
pub use signature::signature;

/// Result type for vizrenderlib operations
pub type Result<T> = std::result::Result<T, RenderError>;
