use crate::schema::RawRecord;
use serde_json::Value;

fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Resolves a logical field to a cell value inside one loosely-typed record.
///
/// Two deterministic passes over the record's keys:
/// 1. case-insensitive exact match, aliases tried in priority order;
/// 2. case-insensitive substring match, same order.
///
/// An exact match always wins over a substring match, regardless of where
/// the aliases sit in the list. This tolerates bilingual and loosely
/// formatted headers ("Procurement Qty (Day 1)" vs "采购 数量 (day 1)")
/// without a fixed schema.
pub fn resolve_field<'a, S: AsRef<str>>(record: &'a RawRecord, aliases: &[S]) -> Option<&'a Value> {
    for alias in aliases {
        let needle = fold(alias.as_ref());
        if let Some((_, value)) = record.iter().find(|(key, _)| fold(key) == needle) {
            return Some(value);
        }
    }
    for alias in aliases {
        let needle = fold(alias.as_ref());
        if let Some((_, value)) = record.iter().find(|(key, _)| fold(key).contains(&needle)) {
            return Some(value);
        }
    }
    None
}

/// Resolves a field and trims it as a string. Absent and non-string scalars
/// are stringified the way a spreadsheet decoder would render them.
pub fn resolve_text<S: AsRef<str>>(record: &RawRecord, aliases: &[S]) -> String {
    match resolve_field(record, aliases) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Converts a raw cell value to an optional finite number.
///
/// Null and empty/whitespace strings become `None`; numeric strings are
/// parsed; anything non-finite (NaN, ±Infinity) becomes `None`. Never
/// errors.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Null => return None,
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        // TRUE/FALSE cells decode as booleans; coerce like the numeric 1/0
        // a spreadsheet formula would see.
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Array(_) | Value::Object(_) => return None,
    };

    n.is_finite().then_some(n)
}
