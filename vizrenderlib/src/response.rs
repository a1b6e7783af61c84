//! Response dispatch: pick the renderer for the requested format and hand
//! the body and its metadata to the transport layer.
//!
//! The transport is abstracted as a [`ResponseSink`]. Rendering always
//! completes before anything is written to the sink, so a failed render
//! never leaves a half-written response behind.
//!
//! ## Example
//!
//! ```rust
//! use vizrenderlib::{
//!     BufferedResponse, Cell, Column, OutputFormat, RenderOptions, ResponseStatus,
//!     ResponseWriter, Table, ValueType,
//! };
//!
//! let mut table = Table::new();
//! table.add_column(Column::new("A", ValueType::Text, "col0")).unwrap();
//! table.add_row(vec![Cell::new("aaa")]).unwrap();
//!
//! let options = RenderOptions::new()
//!     .format(OutputFormat::Csv)
//!     .out_file_name("report");
//! let mut response = BufferedResponse::default();
//! ResponseWriter::instance()
//!     .write_response(&options, &ResponseStatus::ok(), Some(&table), &mut response)
//!     .unwrap();
//!
//! assert_eq!(response.content_type.as_deref(), Some("text/csv; charset=UTF-8"));
//! assert_eq!(response.body, b"col0\naaa\n");
//! ```

use std::io;

use crate::data::{ResponseStatus, Table};
use crate::error::RenderError;
use crate::options::{OutputFormat, RenderOptions};
use crate::output::{
    ensure_table_format_status, render_csv, render_html, render_json_response, render_tsv,
    render_tsv_excel,
};
use crate::Result;

/// Name of the attachment header written for downloadable formats
pub const CONTENT_DISPOSITION: &str = "Content-Disposition";

/// The part of an HTTP response the renderers need to control.
pub trait ResponseSink {
    fn set_content_type(&mut self, content_type: &str);
    fn set_header(&mut self, name: &str, value: &str);
    fn write_body(&mut self, body: &[u8]) -> io::Result<()>;
}

/// A [`ResponseSink`] that keeps everything in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferedResponse {
    pub content_type: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl BufferedResponse {
    /// Value of the first header with the given name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl ResponseSink for BufferedResponse {
    fn set_content_type(&mut self, content_type: &str) {
        self.content_type = Some(content_type.to_string());
    }

    fn set_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    fn write_body(&mut self, body: &[u8]) -> io::Result<()> {
        self.body.extend_from_slice(body);
        Ok(())
    }
}

/// A fully rendered response: metadata plus body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResponse {
    pub content_type: &'static str,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl RenderedResponse {
    /// Write metadata, then the body, to a sink
    pub fn write_to<S: ResponseSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        sink.set_content_type(self.content_type);
        for (name, value) in &self.headers {
            sink.set_header(name, value);
        }
        sink.write_body(&self.body)?;
        Ok(())
    }
}

/// Content type of a format
fn content_type(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Html => "text/html; charset=UTF-8",
        OutputFormat::Json => "application/json; charset=UTF-8",
        OutputFormat::Jsonp => "text/javascript; charset=UTF-8",
        OutputFormat::Csv => "text/csv; charset=UTF-8",
        OutputFormat::Tsv => "text/tab-separated-values; charset=UTF-8",
        OutputFormat::TsvExcel => "text/csv; charset=UTF-16LE",
    }
}

/// `Content-Disposition` value for the download formats, `None` for inline ones.
fn attachment(format: OutputFormat, options: &RenderOptions) -> Result<Option<String>> {
    let extension = match format {
        OutputFormat::Csv => ".csv",
        OutputFormat::Tsv => ".tsv",
        OutputFormat::TsvExcel => ".xls",
        OutputFormat::Html | OutputFormat::Json | OutputFormat::Jsonp => return Ok(None),
    };
    let file_name = options.attachment_file_name(extension)?;
    Ok(Some(format!("attachment; filename={}", file_name)))
}

/// Stateless response dispatcher.
///
/// Carries no per-request state, so one instance (see
/// [`ResponseWriter::instance`]) can serve any number of concurrent
/// requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseWriter;

static INSTANCE: ResponseWriter = ResponseWriter;

impl ResponseWriter {
    /// The process-wide shared instance
    pub fn instance() -> &'static ResponseWriter {
        &INSTANCE
    }

    /// Render the response for `options.format` without writing it anywhere.
    ///
    /// JSON formats render any status (an ERROR becomes an `errors`
    /// envelope). The table formats require an OK status and a table.
    pub fn render(
        &self,
        options: &RenderOptions,
        status: &ResponseStatus,
        table: Option<&Table>,
    ) -> Result<RenderedResponse> {
        let format = options.format;
        ensure_table_format_status(format, status)?;
        let disposition = attachment(format, options)?;

        let body = match format {
            OutputFormat::Json | OutputFormat::Jsonp => {
                render_json_response(options, status, table)?.into_bytes()
            }
            OutputFormat::Csv => render_csv(require_table(table, status)?).into_bytes(),
            OutputFormat::Tsv => render_tsv(require_table(table, status)?).into_bytes(),
            OutputFormat::TsvExcel => render_tsv_excel(require_table(table, status)?),
            OutputFormat::Html => render_html(require_table(table, status)?).into_bytes(),
        };

        log::debug!(
            "rendered {} response ({} status, {} bytes)",
            format,
            status,
            body.len()
        );
        Ok(RenderedResponse {
            content_type: content_type(format),
            headers: disposition
                .map(|value| (CONTENT_DISPOSITION, value))
                .into_iter()
                .collect(),
            body,
        })
    }

    /// Render the response and write it to the sink.
    ///
    /// Nothing is written when rendering fails.
    pub fn write_response<S: ResponseSink + ?Sized>(
        &self,
        options: &RenderOptions,
        status: &ResponseStatus,
        table: Option<&Table>,
        sink: &mut S,
    ) -> Result<()> {
        self.render(options, status, table)?.write_to(sink)
    }

    /// Set the metadata of a JSON response
    pub fn set_response_json<S: ResponseSink + ?Sized>(&self, sink: &mut S) {
        sink.set_content_type(content_type(OutputFormat::Json));
    }

    /// Set the metadata of a JSONP response
    pub fn set_response_jsonp<S: ResponseSink + ?Sized>(&self, sink: &mut S) {
        sink.set_content_type(content_type(OutputFormat::Jsonp));
    }

    /// Set the metadata of an HTML response
    pub fn set_response_html<S: ResponseSink + ?Sized>(&self, sink: &mut S) {
        sink.set_content_type(content_type(OutputFormat::Html));
    }

    /// Set the metadata of a CSV attachment named after `options.out_file_name`
    pub fn set_response_csv<S: ResponseSink + ?Sized>(
        &self,
        options: &RenderOptions,
        sink: &mut S,
    ) -> Result<()> {
        self.set_attachment_metadata(OutputFormat::Csv, options, sink)
    }

    /// Set the metadata of a TSV attachment named after `options.out_file_name`
    pub fn set_response_tsv<S: ResponseSink + ?Sized>(
        &self,
        options: &RenderOptions,
        sink: &mut S,
    ) -> Result<()> {
        self.set_attachment_metadata(OutputFormat::Tsv, options, sink)
    }

    /// Set the metadata of a spreadsheet TSV attachment named after
    /// `options.out_file_name`
    pub fn set_response_tsv_excel<S: ResponseSink + ?Sized>(
        &self,
        options: &RenderOptions,
        sink: &mut S,
    ) -> Result<()> {
        self.set_attachment_metadata(OutputFormat::TsvExcel, options, sink)
    }

    /// Nothing reaches the sink when the file name is rejected.
    fn set_attachment_metadata<S: ResponseSink + ?Sized>(
        &self,
        format: OutputFormat,
        options: &RenderOptions,
        sink: &mut S,
    ) -> Result<()> {
        let disposition = attachment(format, options)?;
        sink.set_content_type(content_type(format));
        if let Some(value) = disposition {
            sink.set_header(CONTENT_DISPOSITION, &value);
        }
        Ok(())
    }
}

fn require_table<'a>(table: Option<&'a Table>, status: &ResponseStatus) -> Result<&'a Table> {
    table.ok_or(RenderError::MissingTable {
        status: status.as_str(),
    })
}
