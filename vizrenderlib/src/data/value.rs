//! Typed cell values and their wire representations.
//!
//! Every value has two textual forms:
//!
//! - a **JSON literal**, written into the `v` field of a JSON/JSONP cell
//! - a **display string**, used by the delimited and HTML renderers when
//!   no formatted override is available
//!
//! Numbers follow the JVM's `Double.toString` text (`222.0`, `1.0E7`) so
//! that responses and signatures match existing clients byte for byte.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::output::escape::json_quote;

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Free text (wire name `string`)
    #[serde(rename = "string")]
    Text,
    /// Floating point number
    Number,
    /// `true` / `false`
    Boolean,
    /// Calendar date
    Date,
    /// Calendar date with time of day
    DateTime,
    /// Time of day without a date
    TimeOfDay,
}

impl ValueType {
    /// Wire name used in the `type` field of a JSON column
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Text => "string",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Date => "date",
            ValueType::DateTime => "datetime",
            ValueType::TimeOfDay => "timeofday",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" | "text" => Ok(ValueType::Text),
            "number" => Ok(ValueType::Number),
            "boolean" => Ok(ValueType::Boolean),
            "date" => Ok(ValueType::Date),
            "datetime" => Ok(ValueType::DateTime),
            "timeofday" => Ok(ValueType::TimeOfDay),
            _ => Err(format!("Unknown value type: {}", s)),
        }
    }
}

/// A single typed value.
///
/// The variant is fixed at construction. `Null` is accepted in a column of
/// any type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    TimeOfDay(NaiveTime),
    Null,
}

impl Value {
    /// The value's type, or `None` for `Null`
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Value::Text(_) => Some(ValueType::Text),
            Value::Number(_) => Some(ValueType::Number),
            Value::Boolean(_) => Some(ValueType::Boolean),
            Value::Date(_) => Some(ValueType::Date),
            Value::DateTime(_) => Some(ValueType::DateTime),
            Value::TimeOfDay(_) => Some(ValueType::TimeOfDay),
            Value::Null => None,
        }
    }

    /// JSON literal for the `v` field of a cell.
    ///
    /// Dates use the `"Date(y,m,d)"` string notation with a zero-based
    /// month, date-times append `,h,mi,s` and the milliseconds when non-zero,
    /// and times of day are `[h,mi,s]` arrays (again with optional
    /// milliseconds). Non-finite numbers have no JSON form and render `null`.
    pub fn to_json(&self) -> String {
        match self {
            Value::Text(s) => json_quote(s),
            Value::Number(n) if n.is_finite() => java_double_string(*n),
            Value::Number(_) => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Date(d) => json_quote(&format!(
                "Date({},{},{})",
                d.year(),
                d.month0(),
                d.day()
            )),
            Value::DateTime(dt) => {
                let mut text = format!(
                    "Date({},{},{},{},{},{}",
                    dt.year(),
                    dt.month0(),
                    dt.day(),
                    dt.hour(),
                    dt.minute(),
                    dt.second()
                );
                let ms = millis(dt.nanosecond());
                if ms != 0 {
                    text.push_str(&format!(",{}", ms));
                }
                text.push(')');
                json_quote(&text)
            }
            Value::TimeOfDay(t) => {
                let ms = millis(t.nanosecond());
                if ms != 0 {
                    format!("[{},{},{},{}]", t.hour(), t.minute(), t.second(), ms)
                } else {
                    format!("[{},{},{}]", t.hour(), t.minute(), t.second())
                }
            }
            Value::Null => "null".to_string(),
        }
    }

    /// Default human-readable text, used when a cell has no formatted override.
    pub fn display_string(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => java_double_string(*n),
            Value::Boolean(b) => b.to_string(),
            Value::Date(d) => format_date(d),
            Value::DateTime(dt) => format!("{} {}", format_date(&dt.date()), format_time(&dt.time())),
            Value::TimeOfDay(t) => format_time(t),
            Value::Null => String::new(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::TimeOfDay(t)
    }
}

/// Milliseconds of a sub-second nanosecond count. Leap-second nanos
/// (>= 1e9) clamp to 999.
fn millis(nanos: u32) -> u32 {
    (nanos / 1_000_000).min(999)
}

fn format_date(d: &NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day())
}

fn format_time(t: &NaiveTime) -> String {
    let ms = millis(t.nanosecond());
    if ms != 0 {
        format!(
            "{:02}:{:02}:{:02}.{:03}",
            t.hour(),
            t.minute(),
            t.second(),
            ms
        )
    } else {
        format!("{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second())
    }
}

/// Text of a double as the JVM prints it.
///
/// Magnitudes in `[1e-3, 1e7)` use plain decimal notation and always carry
/// a fractional part; everything else uses `<mantissa>E<exponent>`.
pub(crate) fn java_double_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return if n.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    if (1e-3..1e7).contains(&n.abs()) {
        let text = n.to_string();
        if text.contains('.') {
            text
        } else {
            format!("{}.0", text)
        }
    } else {
        let text = format!("{:e}", n);
        match text.split_once('e') {
            Some((mantissa, exponent)) if mantissa.contains('.') => {
                format!("{}E{}", mantissa, exponent)
            }
            Some((mantissa, exponent)) => format!("{}.0E{}", mantissa, exponent),
            None => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_java_double_string_plain_range() {
        assert_eq!(java_double_string(222.0), "222.0");
        assert_eq!(java_double_string(-3.5), "-3.5");
        assert_eq!(java_double_string(0.001), "0.001");
        assert_eq!(java_double_string(1234567.5), "1234567.5");
        assert_eq!(java_double_string(0.0), "0.0");
        assert_eq!(java_double_string(-0.0), "-0.0");
    }

    #[test]
    fn test_java_double_string_scientific_range() {
        assert_eq!(java_double_string(1e7), "1.0E7");
        assert_eq!(java_double_string(1.5e10), "1.5E10");
        assert_eq!(java_double_string(0.0001), "1.0E-4");
        assert_eq!(java_double_string(-2.5e-5), "-2.5E-5");
    }

    #[test]
    fn test_java_double_string_non_finite() {
        assert_eq!(java_double_string(f64::NAN), "NaN");
        assert_eq!(java_double_string(f64::INFINITY), "Infinity");
        assert_eq!(java_double_string(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_value_type_of_values() {
        assert_eq!(Value::from("a").value_type(), Some(ValueType::Text));
        assert_eq!(Value::from(1).value_type(), Some(ValueType::Number));
        assert_eq!(Value::from(true).value_type(), Some(ValueType::Boolean));
        assert_eq!(
            Value::from(date(2009, 2, 1)).value_type(),
            Some(ValueType::Date)
        );
        assert_eq!(Value::Null.value_type(), None);
    }

    #[test]
    fn test_json_scalars() {
        assert_eq!(Value::from("aaa").to_json(), "\"aaa\"");
        assert_eq!(Value::from(111).to_json(), "111.0");
        assert_eq!(Value::from(false).to_json(), "false");
        assert_eq!(Value::Null.to_json(), "null");
        assert_eq!(Value::Number(f64::NAN).to_json(), "null");
    }

    #[test]
    fn test_json_date_uses_zero_based_month() {
        assert_eq!(Value::from(date(2009, 2, 1)).to_json(), "\"Date(2009,1,1)\"");
    }

    #[test]
    fn test_json_datetime_millis_only_when_present() {
        let dt = date(2009, 12, 31).and_hms_opt(23, 5, 9).unwrap();
        assert_eq!(Value::from(dt).to_json(), "\"Date(2009,11,31,23,5,9)\"");

        let dt = date(2009, 12, 31).and_hms_milli_opt(23, 5, 9, 42).unwrap();
        assert_eq!(Value::from(dt).to_json(), "\"Date(2009,11,31,23,5,9,42)\"");
    }

    #[test]
    fn test_json_time_of_day_is_array() {
        let t = NaiveTime::from_hms_opt(7, 30, 0).unwrap();
        assert_eq!(Value::from(t).to_json(), "[7,30,0]");

        let t = NaiveTime::from_hms_milli_opt(7, 30, 0, 250).unwrap();
        assert_eq!(Value::from(t).to_json(), "[7,30,0,250]");
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(Value::from("x, y").display_string(), "x, y");
        assert_eq!(Value::from(222).display_string(), "222.0");
        assert_eq!(Value::from(true).display_string(), "true");
        assert_eq!(Value::Null.display_string(), "");
        assert_eq!(Value::from(date(2009, 2, 1)).display_string(), "2009-02-01");

        let dt = date(2009, 2, 1).and_hms_milli_opt(8, 4, 3, 7).unwrap();
        assert_eq!(Value::from(dt).display_string(), "2009-02-01 08:04:03.007");

        let t = NaiveTime::from_hms_opt(18, 0, 59).unwrap();
        assert_eq!(Value::from(t).display_string(), "18:00:59");
    }

    #[test]
    fn test_value_type_from_str() {
        assert_eq!(ValueType::from_str("string").unwrap(), ValueType::Text);
        assert_eq!(ValueType::from_str("datetime").unwrap(), ValueType::DateTime);
        assert_eq!(ValueType::from_str("timeofday").unwrap(), ValueType::TimeOfDay);
        assert!(ValueType::from_str("blob").is_err());
    }

    #[test]
    fn test_value_type_serde_names() {
        assert_eq!(
            serde_json::to_string(&ValueType::Text).unwrap(),
            "\"string\""
        );
        assert_eq!(
            serde_json::to_string(&ValueType::TimeOfDay).unwrap(),
            "\"timeofday\""
        );
        let parsed: ValueType = serde_json::from_str("\"datetime\"").unwrap();
        assert_eq!(parsed, ValueType::DateTime);
    }
}
