//! Columns, cells, rows and the validated table they form.
//!
//! A [`Table`] is assembled once through [`Table::add_column`] and
//! [`Table::add_row`], which enforce the structural invariants:
//!
//! - column ids are unique
//! - every row has exactly one cell per column
//! - every present, non-null cell value has its column's declared type
//!
//! After that the renderers only read it.

use std::collections::BTreeMap;

use crate::data::status::Warning;
use crate::data::value::{Value, ValueType};
use crate::error::RenderError;
use crate::Result;

/// Custom string properties attached to a table, column or cell.
///
/// Kept sorted so that rendering is deterministic.
pub type Properties = BTreeMap<String, String>;

/// One value at a row/column intersection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    value: Option<Value>,
    formatted: Option<String>,
    properties: Properties,
}

impl Cell {
    /// Create a cell holding a value
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Create a cell holding a value and the text a client should show for it
    pub fn with_formatted(value: impl Into<Value>, formatted: impl Into<String>) -> Self {
        Self::new(value).formatted(formatted)
    }

    /// Create a cell holding an explicit null
    pub fn null() -> Self {
        Self::new(Value::Null)
    }

    /// Create a cell with no value at all.
    ///
    /// Unlike [`Cell::null`], an empty cell has no `v` key on the JSON wire.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder: set the formatted override
    pub fn formatted(mut self, formatted: impl Into<String>) -> Self {
        self.formatted = Some(formatted.into());
        self
    }

    /// Builder: add a custom property
    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The cell's value, `None` when the cell is empty
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// The formatted override, if any
    pub fn formatted_value(&self) -> Option<&str> {
        self.formatted.as_deref()
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Default display text of the value (empty for empty and null cells)
    pub fn display_string(&self) -> String {
        self.value
            .as_ref()
            .map(Value::display_string)
            .unwrap_or_default()
    }
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    id: String,
    value_type: ValueType,
    label: String,
    pattern: Option<String>,
    properties: Properties,
}

impl Column {
    pub fn new(id: impl Into<String>, value_type: ValueType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value_type,
            label: label.into(),
            pattern: None,
            properties: Properties::new(),
        }
    }

    /// Builder: set the display pattern (e.g. a number format)
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Builder: add a custom property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

/// An ordered list of cells, one per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    cells: Vec<Cell>,
}

impl TableRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: append a cell
    pub fn cell(mut self, cell: Cell) -> Self {
        self.cells.push(cell);
        self
    }

    pub fn add_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl From<Vec<Cell>> for TableRow {
    fn from(cells: Vec<Cell>) -> Self {
        Self { cells }
    }
}

/// A fully built tabular result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<TableRow>,
    properties: Properties,
    warnings: Vec<Warning>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. Ids must be unique, and columns cannot be added
    /// once rows exist.
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        if self.columns.iter().any(|c| c.id == column.id) {
            return Err(RenderError::DuplicateColumnId { id: column.id });
        }
        if !self.rows.is_empty() {
            return Err(RenderError::ColumnAfterRows { id: column.id });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Append several columns in order
    pub fn add_columns(&mut self, columns: impl IntoIterator<Item = Column>) -> Result<()> {
        for column in columns {
            self.add_column(column)?;
        }
        Ok(())
    }

    /// Append a row after checking its arity and cell types against the columns
    pub fn add_row(&mut self, row: impl Into<TableRow>) -> Result<()> {
        let row = row.into();
        self.check_row(self.rows.len(), &row)?;
        self.rows.push(row);
        Ok(())
    }

    /// Append several rows in order. Stops at the first invalid row; rows
    /// before it stay in the table.
    pub fn add_rows(&mut self, rows: impl IntoIterator<Item = TableRow>) -> Result<()> {
        for row in rows {
            self.add_row(row)?;
        }
        Ok(())
    }

    /// Set a table-level custom property
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Attach a warning produced while building the table (e.g. truncation)
    pub fn add_warning(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Look up a column by id
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    fn check_row(&self, index: usize, row: &TableRow) -> Result<()> {
        if row.cells.len() != self.columns.len() {
            return Err(RenderError::RowArity {
                row: index,
                expected: self.columns.len(),
                actual: row.cells.len(),
            });
        }
        for (column, cell) in self.columns.iter().zip(&row.cells) {
            let actual = cell.value.as_ref().and_then(Value::value_type);
            if let Some(actual) = actual {
                if actual != column.value_type {
                    return Err(RenderError::CellTypeMismatch {
                        row: index,
                        column: column.id.clone(),
                        expected: column.value_type,
                        actual,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::status::ReasonType;

    fn two_columns() -> Table {
        let mut table = Table::new();
        table
            .add_columns([
                Column::new("name", ValueType::Text, "Name"),
                Column::new("score", ValueType::Number, "Score"),
            ])
            .unwrap();
        table
    }

    #[test]
    fn test_add_rows_in_order() {
        let mut table = two_columns();
        table
            .add_row(vec![Cell::new("a"), Cell::new(1)])
            .unwrap();
        table
            .add_row(TableRow::new().cell(Cell::new("b")).cell(Cell::new(2)))
            .unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.rows()[1].cells()[0].value(), Some(&Value::from("b")));
    }

    #[test]
    fn test_duplicate_column_id_rejected() {
        let mut table = two_columns();
        let err = table
            .add_column(Column::new("name", ValueType::Text, "Other"))
            .unwrap_err();
        assert!(matches!(err, RenderError::DuplicateColumnId { ref id } if id == "name"));
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_row_arity_checked() {
        let mut table = two_columns();
        let err = table.add_row(vec![Cell::new("only")]).unwrap_err();
        assert!(matches!(
            err,
            RenderError::RowArity {
                row: 0,
                expected: 2,
                actual: 1
            }
        ));
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_cell_type_checked() {
        let mut table = two_columns();
        table.add_row(vec![Cell::new("a"), Cell::new(1)]).unwrap();
        let err = table
            .add_row(vec![Cell::new("b"), Cell::new("not a number")])
            .unwrap_err();
        match err {
            RenderError::CellTypeMismatch {
                row,
                column,
                expected,
                actual,
            } => {
                assert_eq!(row, 1);
                assert_eq!(column, "score");
                assert_eq!(expected, ValueType::Number);
                assert_eq!(actual, ValueType::Text);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_null_and_empty_cells_fit_any_column() {
        let mut table = two_columns();
        table.add_row(vec![Cell::null(), Cell::empty()]).unwrap();
        assert_eq!(table.rows()[0].cells()[0].value(), Some(&Value::Null));
        assert_eq!(table.rows()[0].cells()[1].value(), None);
    }

    #[test]
    fn test_columns_locked_after_rows() {
        let mut table = two_columns();
        table.add_row(vec![Cell::new("a"), Cell::new(1)]).unwrap();
        let err = table
            .add_column(Column::new("extra", ValueType::Boolean, "Extra"))
            .unwrap_err();
        assert!(matches!(err, RenderError::ColumnAfterRows { ref id } if id == "extra"));
    }

    #[test]
    fn test_cell_builders() {
        let cell = Cell::with_formatted(222, "222").property("style", "bold");
        assert_eq!(cell.value(), Some(&Value::Number(222.0)));
        assert_eq!(cell.formatted_value(), Some("222"));
        assert_eq!(cell.properties().get("style").map(String::as_str), Some("bold"));
        assert_eq!(cell.display_string(), "222.0");
        assert_eq!(Cell::empty().display_string(), "");
    }

    #[test]
    fn test_column_lookup_and_metadata() {
        let mut table = Table::new();
        table
            .add_column(
                Column::new("amount", ValueType::Number, "Amount")
                    .with_pattern("#,##0.00")
                    .with_property("unit", "EUR"),
            )
            .unwrap();
        let column = table.column("amount").unwrap();
        assert_eq!(column.pattern(), Some("#,##0.00"));
        assert_eq!(column.properties().len(), 1);
        assert!(table.column("missing").is_none());
    }

    #[test]
    fn test_table_properties_and_warnings() {
        let mut table = two_columns();
        table.set_property("source", "sales");
        table.add_warning(Warning::new(ReasonType::DataTruncated, "limited to 2 rows"));
        assert_eq!(table.properties().get("source").map(String::as_str), Some("sales"));
        assert_eq!(table.warnings().len(), 1);
    }
}
