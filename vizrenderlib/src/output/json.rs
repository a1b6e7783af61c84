//! JSON and JSONP responses.
//!
//! The envelope is written by hand rather than through a serializer because
//! clients compare it byte for byte: key order, number text and escaping
//! are all part of the wire contract.
//!
//! ```text
//! {"version":"0.6","reqId":"7","status":"ok","sig":"...","table":{"cols":[...],"rows":[...]}}
//! ```

use crate::data::{Cell, Column, Properties, ReasonType, ResponseStatus, Table, Value, ValueType};
use crate::error::RenderError;
use crate::options::{OutputFormat, RenderOptions, PROTOCOL_VERSION};
use crate::output::escape::json_quote;
use crate::signature::signature;
use crate::Result;

/// One entry of the `errors` array.
struct ErrorEntry<'a> {
    reason: ReasonType,
    detailed_message: Option<&'a str>,
}

/// Render a complete JSON response, wrapped in the response handler when
/// the requested format is JSONP.
///
/// An ERROR status is rendered as an `errors` envelope; the table is then
/// not needed. OK and WARNING responses require a table.
pub fn render_json_response(
    options: &RenderOptions,
    status: &ResponseStatus,
    table: Option<&Table>,
) -> Result<String> {
    if options.format == OutputFormat::Jsonp {
        let handler = options.checked_response_handler().map_err(|e| {
            log::warn!("rejecting JSONP response: {}", e);
            e
        })?;
        let body = render_envelope(options, status, table)?;
        Ok(format!("{}({});", handler, body))
    } else {
        render_envelope(options, status, table)
    }
}

fn render_envelope(
    options: &RenderOptions,
    status: &ResponseStatus,
    table: Option<&Table>,
) -> Result<String> {
    let mut out = String::from("{\"version\":");
    out.push_str(&json_quote(PROTOCOL_VERSION));
    if let Some(request_id) = &options.request_id {
        out.push_str(",\"reqId\":");
        out.push_str(&json_quote(request_id));
    }

    let table = match status {
        ResponseStatus::Error { reason, message } => {
            let entry = ErrorEntry {
                reason: *reason,
                detailed_message: message.as_deref(),
            };
            push_status(&mut out, "error");
            push_errors(&mut out, &[entry]);
            out.push('}');
            return Ok(out);
        }
        ResponseStatus::Ok | ResponseStatus::Warning { .. } => {
            table.ok_or(RenderError::MissingTable {
                status: status.as_str(),
            })?
        }
    };

    let sig = signature(table);
    if options.signature.as_deref() == Some(sig.as_str()) {
        log::debug!("table signature {} unchanged, answering not_modified", sig);
        push_status(&mut out, "error");
        push_errors(
            &mut out,
            &[ErrorEntry {
                reason: ReasonType::NotModified,
                detailed_message: None,
            }],
        );
        out.push('}');
        return Ok(out);
    }

    let mut entries = Vec::new();
    if let ResponseStatus::Warning { reason, message } = status {
        entries.push(ErrorEntry {
            reason: *reason,
            detailed_message: message.as_deref(),
        });
    }
    entries.extend(table.warnings().iter().map(|w| ErrorEntry {
        reason: w.reason,
        detailed_message: Some(w.message.as_str()),
    }));

    push_status(&mut out, if entries.is_empty() { "ok" } else { "warning" });
    out.push_str(",\"sig\":");
    out.push_str(&json_quote(&sig));
    out.push_str(",\"table\":");
    out.push_str(&render_data_table(table, true));
    if !entries.is_empty() {
        push_errors(&mut out, &entries);
    }
    out.push('}');

    log::debug!(
        "rendered JSON table: {} columns, {} rows, sig {}",
        table.column_count(),
        table.row_count(),
        sig
    );
    Ok(out)
}

fn push_status(out: &mut String, status: &str) {
    out.push_str(",\"status\":");
    out.push_str(&json_quote(status));
}

fn push_errors(out: &mut String, entries: &[ErrorEntry<'_>]) {
    out.push_str(",\"errors\":[");
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str("{\"reason\":");
        out.push_str(&json_quote(entry.reason.as_str()));
        out.push_str(",\"message\":");
        out.push_str(&json_quote(entry.reason.message()));
        if let Some(detail) = entry.detailed_message {
            out.push_str(",\"detailed_message\":");
            out.push_str(&json_quote(detail));
        }
        out.push('}');
    }
    out.push(']');
}

/// Render the `{"cols":[...],"rows":[...]}` object of a table.
///
/// With `include_formatting` off, formatted overrides are left out; this is
/// the form the signature is computed over.
pub fn render_data_table(table: &Table, include_formatting: bool) -> String {
    let mut out = String::from("{\"cols\":[");
    for (i, column) in table.columns().iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_column(&mut out, column);
    }
    out.push_str("],\"rows\":[");
    for (i, row) in table.rows().iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str("{\"c\":[");
        for (j, (column, cell)) in table.columns().iter().zip(row.cells()).enumerate() {
            if j > 0 {
                out.push(',');
            }
            push_cell(&mut out, column, cell, include_formatting);
        }
        out.push_str("]}");
    }
    out.push(']');
    if !table.properties().is_empty() {
        out.push_str(",\"p\":");
        push_properties(&mut out, table.properties());
    }
    out.push('}');
    out
}

fn push_column(out: &mut String, column: &Column) {
    out.push_str("{\"id\":");
    out.push_str(&json_quote(column.id()));
    out.push_str(",\"label\":");
    out.push_str(&json_quote(column.label()));
    out.push_str(",\"type\":");
    out.push_str(&json_quote(column.value_type().as_str()));
    out.push_str(",\"pattern\":");
    out.push_str(&json_quote(column.pattern().unwrap_or("")));
    if !column.properties().is_empty() {
        out.push_str(",\"p\":");
        push_properties(out, column.properties());
    }
    out.push('}');
}

fn push_cell(out: &mut String, column: &Column, cell: &Cell, include_formatting: bool) {
    let mut fields = Vec::with_capacity(3);
    if let Some(value) = cell.value() {
        fields.push(format!("\"v\":{}", value.to_json()));
    }
    if include_formatting {
        if let Some(formatted) = cell.formatted_value() {
            if !repeats_text_value(column, cell.value(), formatted) {
                fields.push(format!("\"f\":{}", json_quote(formatted)));
            }
        }
    }
    if !cell.properties().is_empty() {
        let mut properties = String::new();
        push_properties(&mut properties, cell.properties());
        fields.push(format!("\"p\":{}", properties));
    }
    out.push('{');
    out.push_str(&fields.join(","));
    out.push('}');
}

/// On text columns an override identical to the value carries no
/// information and is not sent.
fn repeats_text_value(column: &Column, value: Option<&Value>, formatted: &str) -> bool {
    column.value_type() == ValueType::Text
        && matches!(value, Some(Value::Text(text)) if text == formatted)
}

fn push_properties(out: &mut String, properties: &Properties) {
    out.push('{');
    for (i, (key, value)) in properties.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&json_quote(key));
        out.push(':');
        out.push_str(&json_quote(value));
    }
    out.push('}');
}
