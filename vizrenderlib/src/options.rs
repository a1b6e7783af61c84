//! Render options: which format to produce and the request details that
//! shape it.
//!
//! Options arrive already parsed from the request; this module only
//! validates and defaults them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RenderError;
use crate::Result;

/// Protocol version written into every JSON envelope
pub const PROTOCOL_VERSION: &str = "0.6";

/// Callback used for JSONP when the request names none
pub const DEFAULT_RESPONSE_HANDLER: &str = "google.visualization.Query.setResponse";

/// Base file name used for attachments when the request names none
pub const DEFAULT_OUT_FILE_NAME: &str = "data";

/// Requested wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Plain JSON object
    #[default]
    Json,
    /// JSON wrapped in a callback invocation
    Jsonp,
    /// Comma-separated values
    Csv,
    /// Tab-separated values
    Tsv,
    /// Tab-separated values encoded UTF-16LE for spreadsheet import
    TsvExcel,
    /// Minimal HTML table preview
    Html,
}

impl OutputFormat {
    /// The literal used for this format in requests
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Jsonp => "jsonp",
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::TsvExcel => "tsv_excel",
            OutputFormat::Html => "html",
        }
    }

    /// Whether the format can carry a status and error list
    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Jsonp)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "jsonp" => Ok(OutputFormat::Jsonp),
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "tsv_excel" => Ok(OutputFormat::TsvExcel),
            "html" => Ok(OutputFormat::Html),
            _ => Err(RenderError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

/// Parsed request options consumed by the renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Requested output format
    pub format: OutputFormat,
    /// Opaque request id echoed back as `reqId`
    pub request_id: Option<String>,
    /// JSONP callback name
    pub response_handler: Option<String>,
    /// File name for attachment downloads
    pub out_file_name: Option<String>,
    /// Signature of the table the client already holds
    pub signature: Option<String>,
}

impl RenderOptions {
    /// Create options for the default (JSON) format
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the output format
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Builder: set the request id
    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Builder: set the JSONP callback name
    pub fn response_handler(mut self, handler: impl Into<String>) -> Self {
        self.response_handler = Some(handler.into());
        self
    }

    /// Builder: set the attachment file name
    pub fn out_file_name(mut self, name: impl Into<String>) -> Self {
        self.out_file_name = Some(name.into());
        self
    }

    /// Builder: set the signature the client already holds
    pub fn signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    /// The JSONP callback name, validated.
    ///
    /// Falls back to [`DEFAULT_RESPONSE_HANDLER`] when unset. Names may only
    /// contain ASCII letters, digits, `.` and `_`; anything else could inject
    /// script into the callback wrapper and is rejected.
    pub fn checked_response_handler(&self) -> Result<&str> {
        let handler = self
            .response_handler
            .as_deref()
            .unwrap_or(DEFAULT_RESPONSE_HANDLER);
        if is_safe_handler(handler) {
            Ok(handler)
        } else {
            Err(RenderError::InvalidResponseHandler {
                handler: handler.to_string(),
            })
        }
    }

    /// Attachment file name with the given extension.
    ///
    /// The extension is appended only when the name does not already end
    /// with it (ignoring ASCII case), so `report.csv` and `report.CSV` are
    /// kept as they are. Names containing control characters would break
    /// out of the `Content-Disposition` header and are rejected.
    pub fn attachment_file_name(&self, extension: &str) -> Result<String> {
        let name = self
            .out_file_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_OUT_FILE_NAME);
        if name.chars().any(char::is_control) {
            return Err(RenderError::InvalidOutFileName {
                name: name.to_string(),
            });
        }
        if has_extension(name, extension) {
            Ok(name.to_string())
        } else {
            Ok(format!("{}{}", name, extension))
        }
    }
}

fn has_extension(name: &str, extension: &str) -> bool {
    name.len() >= extension.len()
        && name
            .get(name.len() - extension.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(extension))
}

fn is_safe_handler(handler: &str) -> bool {
    !handler.is_empty()
        && handler
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
}
