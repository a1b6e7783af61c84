//! Error types for vizrenderlib

use thiserror::Error;

use crate::data::value::ValueType;
use crate::options::OutputFormat;

/// Errors that can occur while building a table or rendering a response
#[derive(Error, Debug)]
pub enum RenderError {
    /// Output format literal is not one of the supported formats
    #[error("unsupported output format '{format}' (expected json, jsonp, csv, tsv, tsv_excel or html)")]
    UnsupportedFormat { format: String },

    /// JSONP callback name contains characters outside `[A-Za-z0-9_.]`
    #[error("invalid response handler '{handler}': only letters, digits, '.' and '_' are allowed")]
    InvalidResponseHandler { handler: String },

    /// Attachment file name contains control characters
    #[error("invalid output file name {name:?}: control characters are not allowed")]
    InvalidOutFileName { name: String },

    /// Two columns share the same identifier
    #[error("duplicate column id '{id}'")]
    DuplicateColumnId { id: String },

    /// Columns must all be declared before the first row is added
    #[error("cannot add column '{id}' to a table that already has rows")]
    ColumnAfterRows { id: String },

    /// A row has a different number of cells than the table has columns
    #[error("row {row} has {actual} cells but the table has {expected} columns")]
    RowArity {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A cell value does not match its column's declared type
    #[error("row {row}, column '{column}': expected a {expected} value, found {actual}")]
    CellTypeMismatch {
        row: usize,
        column: String,
        expected: ValueType,
        actual: ValueType,
    },

    /// The requested format cannot express a non-OK status
    #[error("cannot render a '{status}' status as {format}")]
    StatusNotRenderable {
        format: OutputFormat,
        status: &'static str,
    },

    /// A table is required for an OK or WARNING response
    #[error("no table supplied for a '{status}' response")]
    MissingTable { status: &'static str },

    /// Writing to the response sink failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
