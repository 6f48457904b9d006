use serde_json::{Number, Value};

/// Largest integer a spreadsheet cell (an IEEE double) holds exactly.
pub const MAX_EXACT_INTEGER: i64 = 1 << 53;

/// A cell as sent to the spreadsheet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(Number),
    Text(String),
}

impl CellValue {
    /// Numbers are only recognised when their canonical rendering equals the
    /// raw text, so `007` and `1.50` stay text and survive a read-back.
    /// Integers beyond `MAX_EXACT_INTEGER` stay text as well.
    pub fn infer(raw: &str) -> Self {
        if let Ok(int) = raw.parse::<i64>() {
            if int.to_string() == raw && int.unsigned_abs() <= MAX_EXACT_INTEGER as u64 {
                return CellValue::Number(int.into());
            }
            return CellValue::Text(raw.to_string());
        }

        // Non-integral floats always render with a '.'; this also keeps `-0`
        // and long digit runs out of the float path.
        if !raw.contains('.') {
            return CellValue::Text(raw.to_string());
        }

        if let Ok(float) = raw.parse::<f64>() {
            if let Some(number) = Number::from_f64(float) {
                if float.to_string() == raw {
                    return CellValue::Number(number);
                }
            }
        }

        CellValue::Text(raw.to_string())
    }

    /// Equality as seen through the API: numbers compare numerically, and an
    /// empty text cell matches a JSON null.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (CellValue::Number(expected), Value::Number(actual)) => numbers_match(expected, actual),
            (CellValue::Text(expected), Value::String(actual)) => expected == actual,
            (CellValue::Text(expected), Value::Null) => expected.is_empty(),
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Text(text) if text.is_empty())
    }
}

/// Integers compare exactly; an integral float read back only matches when it
/// is within the exact range.
fn numbers_match(expected: &Number, actual: &Number) -> bool {
    match (expected.as_i64(), actual.as_i64()) {
        (Some(expected), Some(actual)) => expected == actual,
        (Some(expected), None) => actual.as_f64().is_some_and(|actual| {
            actual.fract() == 0.0
                && actual.abs() <= MAX_EXACT_INTEGER as f64
                && actual as i64 == expected
        }),
        _ => expected.as_f64() == actual.as_f64(),
    }
}

impl From<CellValue> for Value {
    fn from(cell: CellValue) -> Self {
        match cell {
            CellValue::Number(number) => Value::Number(number),
            CellValue::Text(text) => Value::String(text),
        }
    }
}
