//! Reading table documents.
//!
//! A table document has the same shape the JSON renderer writes for a
//! `table`: `{"cols":[...],"rows":[{"c":[...]}],"p":{...}}`. Cell values
//! are in wire form, so dates are `"Date(y,m,d)"` strings with a zero-based
//! month and times of day are `[h,mi,s]` arrays. A cell without `v` is an
//! empty cell; `"v":null` is an explicit null.
//!
//! Documents may also carry a `warnings` list of `{"reason","message"}`
//! objects, which are attached to the table.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer};
use vizrenderlib::{Cell, Column, Properties, Table, TableRow, Value, ValueType, Warning};

#[derive(Debug, Deserialize)]
struct TableDocument {
    #[serde(default)]
    cols: Vec<ColumnSpec>,
    #[serde(default)]
    rows: Vec<RowSpec>,
    #[serde(default)]
    p: Properties,
    #[serde(default)]
    warnings: Vec<Warning>,
}

#[derive(Debug, Deserialize)]
struct ColumnSpec {
    id: String,
    #[serde(default)]
    label: String,
    #[serde(rename = "type")]
    value_type: ValueType,
    pattern: Option<String>,
    #[serde(default)]
    p: Properties,
}

#[derive(Debug, Deserialize)]
struct RowSpec {
    #[serde(default)]
    c: Vec<Option<CellSpec>>,
}

#[derive(Debug, Deserialize)]
struct CellSpec {
    #[serde(default, deserialize_with = "present")]
    v: Option<serde_json::Value>,
    f: Option<String>,
    #[serde(default)]
    p: Properties,
}

/// Keeps `"v":null` apart from a missing `v`.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

/// Parse a table document into a [`Table`].
pub fn parse_table(text: &str) -> Result<Table> {
    let document: TableDocument =
        serde_json::from_str(text).context("Invalid table document")?;

    let mut table = Table::new();
    let types: Vec<ValueType> = document.cols.iter().map(|c| c.value_type).collect();

    for spec in document.cols {
        let mut column = Column::new(spec.id, spec.value_type, spec.label);
        if let Some(pattern) = spec.pattern {
            column = column.with_pattern(pattern);
        }
        for (key, value) in spec.p {
            column = column.with_property(key, value);
        }
        table.add_column(column)?;
    }

    for (row_index, row) in document.rows.into_iter().enumerate() {
        let mut table_row = TableRow::new();
        for (col_index, cell) in row.c.into_iter().enumerate() {
            let value_type = types.get(col_index).copied().ok_or_else(|| {
                anyhow!(
                    "Row {} has more cells than the {} declared columns",
                    row_index,
                    types.len()
                )
            })?;
            let cell = build_cell(cell, value_type)
                .with_context(|| format!("Row {}, column {}", row_index, col_index))?;
            table_row.add_cell(cell);
        }
        table.add_row(table_row)?;
    }

    for (key, value) in document.p {
        table.set_property(key, value);
    }
    for warning in document.warnings {
        table.add_warning(warning);
    }

    log::debug!(
        "parsed table with {} columns and {} rows",
        table.column_count(),
        table.row_count()
    );
    Ok(table)
}

fn build_cell(spec: Option<CellSpec>, value_type: ValueType) -> Result<Cell> {
    let Some(spec) = spec else {
        return Ok(Cell::empty());
    };

    let mut cell = match spec.v {
        None => Cell::empty(),
        Some(raw) => Cell::new(parse_value(&raw, value_type)?),
    };
    if let Some(formatted) = spec.f {
        cell = cell.formatted(formatted);
    }
    for (key, value) in spec.p {
        cell = cell.property(key, value);
    }
    Ok(cell)
}

/// Convert a wire value to a typed [`Value`] of the column's type.
fn parse_value(raw: &serde_json::Value, value_type: ValueType) -> Result<Value> {
    use serde_json::Value as Json;

    let value = match (value_type, raw) {
        (_, Json::Null) => Value::Null,
        (ValueType::Text, Json::String(s)) => Value::Text(s.clone()),
        (ValueType::Number, Json::Number(n)) => Value::Number(
            n.as_f64()
                .ok_or_else(|| anyhow!("Number out of range: {}", n))?,
        ),
        (ValueType::Boolean, Json::Bool(b)) => Value::Boolean(*b),
        (ValueType::Date, Json::String(s)) => {
            let parts = date_parts(s)?;
            if parts.len() != 3 {
                bail!("Expected Date(y,m,d), got {}", s);
            }
            Value::Date(to_date(&parts, s)?)
        }
        (ValueType::DateTime, Json::String(s)) => {
            let parts = date_parts(s)?;
            if parts.len() != 6 && parts.len() != 7 {
                bail!("Expected Date(y,m,d,h,mi,s[,ms]), got {}", s);
            }
            let date = to_date(&parts[..3], s)?;
            let time = to_time(&parts[3..], s)?;
            Value::DateTime(NaiveDateTime::new(date, time))
        }
        (ValueType::TimeOfDay, Json::Array(items)) => {
            let parts = items
                .iter()
                .map(|item| {
                    item.as_i64()
                        .ok_or_else(|| anyhow!("Time of day parts must be integers"))
                })
                .collect::<Result<Vec<i64>>>()?;
            if parts.len() != 3 && parts.len() != 4 {
                bail!("Expected [h,mi,s[,ms]], got {} parts", parts.len());
            }
            Value::TimeOfDay(to_time(&parts, &raw.to_string())?)
        }
        (expected, other) => bail!("Value {} does not fit a {} column", other, expected),
    };
    Ok(value)
}

/// Split the integers out of a `Date(...)` string.
fn date_parts(text: &str) -> Result<Vec<i64>> {
    let inner = text
        .trim()
        .strip_prefix("Date(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| anyhow!("Expected Date(...) notation, got {}", text))?;
    inner
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .with_context(|| format!("Invalid number in {}", text))
        })
        .collect()
}

fn to_date(parts: &[i64], source: &str) -> Result<NaiveDate> {
    let year = i32::try_from(parts[0]).ok();
    let month = parts[1]
        .checked_add(1)
        .and_then(|m| u32::try_from(m).ok());
    let day = u32::try_from(parts[2]).ok();
    year.zip(month)
        .zip(day)
        .and_then(|((y, m), d)| NaiveDate::from_ymd_opt(y, m, d))
        .ok_or_else(|| anyhow!("Invalid date: {}", source))
}

fn to_time(parts: &[i64], source: &str) -> Result<NaiveTime> {
    let field = |index: usize| parts.get(index).and_then(|p| u32::try_from(*p).ok());
    let ms = if parts.len() > 3 { field(3) } else { Some(0) };
    field(0)
        .zip(field(1))
        .zip(field(2))
        .zip(ms)
        .and_then(|(((h, mi), s), ms)| NaiveTime::from_hms_milli_opt(h, mi, s, ms))
        .ok_or_else(|| anyhow!("Invalid time: {}", source))
}
