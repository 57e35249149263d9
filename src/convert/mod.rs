use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

use crate::Record;


/// Year component that marks a date with no known year (e.g. a birthday).
pub const UNKNOWN_YEAR: &str = "0000";

/// Named value coercion applied by a `Convert` field spec.
///
/// Every conversion either yields a value of the target type or `None`,
/// which means the field is left out of the output. Conversions never fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Conversion {
    ToString,
    ToInteger,
    ToNumber,
    PartialDate,
}

impl Conversion {
    /// Applies this conversion to `value`.
    pub fn apply(&self, value: &Value) -> Option<Value> {
        match self {
            Conversion::ToString => to_string(value),
            Conversion::ToInteger => to_integer(value),
            Conversion::ToNumber => to_number(value),
            Conversion::PartialDate => parse_partial_date(value),
        }
    }

    /// Name used when a conversion is referenced by string.
    pub fn name(&self) -> &'static str {
        match self {
            Conversion::ToString => "toString",
            Conversion::ToInteger => "toInteger",
            Conversion::ToNumber => "toNumber",
            Conversion::PartialDate => "parseDate",
        }
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown conversion name.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownConversion(pub String);

impl fmt::Display for UnknownConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown conversion '{}'", self.0)
    }
}

impl std::error::Error for UnknownConversion {}

impl FromStr for Conversion {
    type Err = UnknownConversion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "toString" => Ok(Conversion::ToString),
            "toInteger" => Ok(Conversion::ToInteger),
            "toNumber" => Ok(Conversion::ToNumber),
            "parseDate" => Ok(Conversion::PartialDate),
            other => Err(UnknownConversion(other.to_string())),
        }
    }
}

/// Coerces a scalar to its string form.
///
/// - number → decimal string, integral values without a fractional part
/// - boolean → `"true"` / `"false"`
/// - string → itself
/// - null, object, array → `None`
pub fn to_string(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => Some(Value::String(s.clone())),
        Value::Bool(b) => Some(Value::String(b.to_string())),
        Value::Number(n) => Some(Value::String(number_to_string(n))),
        Value::Null | Value::Object(_) | Value::Array(_) => None,
    }
}

fn number_to_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        // f64's Display drops the trailing ".0" that serde_json would print
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Coerces a number or numeric string to an integer, truncating toward zero.
///
/// Strings may carry surrounding whitespace. Non-finite results and values
/// outside the `i64` range yield `None`, as do non-numeric inputs.
pub fn to_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(value.clone()),
        Value::Number(n) => n.as_f64().and_then(truncate),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Some(Value::from(i));
            }
            s.parse::<f64>().ok().and_then(truncate)
        }
        _ => None,
    }
}

fn truncate(f: f64) -> Option<Value> {
    if !f.is_finite() {
        return None;
    }
    let t = f.trunc();
    if t < i64::MIN as f64 || t >= i64::MAX as f64 {
        return None;
    }
    Some(Value::from(t as i64))
}

/// Coerces a numeric string to a number; numbers pass through unchanged.
pub fn to_number(value: &Value) -> Option<Value> {
    match value {
        Value::Number(_) => Some(value.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Some(Value::from(i));
            }
            let f = s.parse::<f64>().ok()?;
            Number::from_f64(f).map(Value::Number)
        }
        _ => None,
    }
}

/// Parses a `YYYY-MM-DD` string into `{year, month, day}` integers.
///
/// A year of `0000` means "year unknown" and the `year` key is omitted.
/// Anything that is not exactly three dash-separated digit groups yields
/// `None`.
pub fn parse_partial_date(value: &Value) -> Option<Value> {
    let s = value.as_str()?;
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != 3 {
        return None;
    }
    if parts
        .iter()
        .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    let year: u32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let day: u32 = parts[2].parse().ok()?;

    let mut date = Record::new();
    if parts[0] != UNKNOWN_YEAR {
        date.insert("year".to_string(), Value::from(year));
    }
    date.insert("month".to_string(), Value::from(month));
    date.insert("day".to_string(), Value::from(day));
    Some(Value::Object(date))
}
