//! Delimited text: CSV, TSV and TSV for spreadsheet import.
//!
//! The first line holds the column labels, then one line per row. Fields are
//! each cell's default display string; formatted overrides are never used
//! here so the file carries raw values. Every line ends with `\n`.

use crate::data::Table;
use crate::output::escape::delimited_field;

/// Render a table as comma-separated values
pub fn render_csv(table: &Table) -> String {
    render_delimited(table, ',')
}

/// Render a table as tab-separated values
pub fn render_tsv(table: &Table) -> String {
    render_delimited(table, '\t')
}

/// Render a table as tab-separated values encoded UTF-16LE (no BOM), the
/// encoding spreadsheet applications expect for tab-delimited imports.
pub fn render_tsv_excel(table: &Table) -> Vec<u8> {
    let text = render_tsv(table);
    let mut bytes = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

fn render_delimited(table: &Table, delimiter: char) -> String {
    let separator = delimiter.to_string();
    let mut output = String::new();

    let header: Vec<String> = table
        .columns()
        .iter()
        .map(|c| delimited_field(c.label(), delimiter))
        .collect();
    output.push_str(&header.join(&separator));
    output.push('\n');

    for row in table.rows() {
        let fields: Vec<String> = row
            .cells()
            .iter()
            .map(|cell| delimited_field(&cell.display_string(), delimiter))
            .collect();
        output.push_str(&fields.join(&separator));
        output.push('\n');
    }

    output
}
