//! Minimal HTML table for human-browsable previews.

use crate::data::Table;
use crate::output::escape::html_escape;

/// Render a table as a bare `<table>` element.
///
/// Cells show their formatted override when present, otherwise the value's
/// default display string.
pub fn render_html(table: &Table) -> String {
    let mut output = String::from("<table>\n<tr>");
    for column in table.columns() {
        output.push_str("<th>");
        output.push_str(&html_escape(column.label()));
        output.push_str("</th>");
    }
    output.push_str("</tr>\n");

    for row in table.rows() {
        output.push_str("<tr>");
        for cell in row.cells() {
            let text = cell
                .formatted_value()
                .map(str::to_string)
                .unwrap_or_else(|| cell.display_string());
            output.push_str("<td>");
            output.push_str(&html_escape(&text));
            output.push_str("</td>");
        }
        output.push_str("</tr>\n");
    }

    output.push_str("</table>\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Cell, Column, ValueType};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_html_table() {
        let mut table = Table::new();
        table
            .add_columns([
                Column::new("a", ValueType::Text, "Name <first>"),
                Column::new("b", ValueType::Number, "Score"),
            ])
            .unwrap();
        table
            .add_row(vec![Cell::new("Tom & \"Jerry\""), Cell::with_formatted(3, "three")])
            .unwrap();
        table.add_row(vec![Cell::null(), Cell::new(4.5)]).unwrap();

        let expected = concat!(
            "<table>\n",
            "<tr><th>Name &lt;first&gt;</th><th>Score</th></tr>\n",
            "<tr><td>Tom &amp; &quot;Jerry&quot;</td><td>three</td></tr>\n",
            "<tr><td></td><td>4.5</td></tr>\n",
            "</table>\n",
        );
        assert_eq!(render_html(&table), expected);
    }

    #[test]
    fn test_html_has_no_script_or_style() {
        let mut table = Table::new();
        table
            .add_column(Column::new("x", ValueType::Text, "X"))
            .unwrap();
        table
            .add_row(vec![Cell::new("<script>alert('x')</script>")])
            .unwrap();
        let html = render_html(&table);
        assert!(!html.contains("<script"));
        assert!(!html.contains("style"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }
}
