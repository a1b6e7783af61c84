//! Output formatting: turn a table (and status) into a response body.
//!
//! One renderer per wire format:
//!
//! - **json**: JSON envelope, optionally wrapped as JSONP (`render_json_response`)
//! - **delimited**: CSV, TSV and UTF-16LE TSV for spreadsheets (`render_csv`, ...)
//! - **html**: bare `<table>` preview (`render_html`)
//!
//! Only the JSON formats can describe a failed request; the others require
//! an OK status, see [`ensure_table_format_status`].

pub mod delimited;
pub mod escape;
pub mod html;
pub mod json;

pub use delimited::{render_csv, render_tsv, render_tsv_excel};
pub use html::render_html;
pub use json::{render_data_table, render_json_response};

use crate::data::ResponseStatus;
use crate::error::RenderError;
use crate::options::OutputFormat;
use crate::Result;

/// Check that a non-JSON format is asked to render an OK response.
///
/// CSV, TSV and HTML bodies have no place for a status or error list, so a
/// WARNING or ERROR status would silently produce a misleading file.
pub fn ensure_table_format_status(format: OutputFormat, status: &ResponseStatus) -> Result<()> {
    if format.is_json() || status.is_ok() {
        Ok(())
    } else {
        log::warn!("cannot render a '{}' status as {}", status, format);
        Err(RenderError::StatusNotRenderable {
            format,
            status: status.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ReasonType;

    #[test]
    fn test_json_formats_accept_any_status() {
        let error = ResponseStatus::error(ReasonType::InternalError, None);
        assert!(ensure_table_format_status(OutputFormat::Json, &error).is_ok());
        assert!(ensure_table_format_status(OutputFormat::Jsonp, &error).is_ok());
    }

    #[test]
    fn test_table_formats_require_ok() {
        let error = ResponseStatus::error(ReasonType::InternalError, None);
        let warning = ResponseStatus::warning(ReasonType::DataTruncated, None);
        for format in [
            OutputFormat::Csv,
            OutputFormat::Tsv,
            OutputFormat::TsvExcel,
            OutputFormat::Html,
        ] {
            assert!(ensure_table_format_status(format, &ResponseStatus::ok()).is_ok());
            let err = ensure_table_format_status(format, &error).unwrap_err();
            assert!(matches!(
                err,
                RenderError::StatusNotRenderable { status: "error", .. }
            ));
            assert!(ensure_table_format_status(format, &warning).is_err());
        }
    }
}
