use serde_json::Value;

use crate::domain::cell_value::CellValue;

/// First row (1-based, header is row 1) where the remote range differs.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub row: usize,
    pub expected: Vec<CellValue>,
    pub actual: Vec<Value>,
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "row {}: expected {:?}, found {:?}",
            self.row, self.expected, self.actual
        )
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

/// Drops trailing blanks from a row; the API never returns them.
fn trimmed<T>(row: &[T], blank: impl Fn(&T) -> bool) -> &[T] {
    let len = row.iter().rposition(|cell| !blank(cell)).map_or(0, |i| i + 1);
    &row[..len]
}

fn trimmed_rows<T>(rows: &[Vec<T>], blank: impl Fn(&T) -> bool + Copy) -> Vec<&[T]> {
    let mut rows = rows
        .iter()
        .map(|row| trimmed(row, blank))
        .collect::<Vec<_>>();
    while rows.last().is_some_and(|row| row.is_empty()) {
        rows.pop();
    }
    rows
}

fn cell_matches(expected: &CellValue, actual: &Value, coerced_numbers: bool) -> bool {
    if expected.matches(actual) {
        return true;
    }

    // USER_ENTERED turns numeric-looking text into numbers and `true`/`false`
    // into booleans.
    match (expected, actual) {
        (CellValue::Text(text), Value::Number(number)) if coerced_numbers => text
            .trim()
            .parse::<f64>()
            .ok()
            .zip(number.as_f64())
            .is_some_and(|(expected, actual)| expected == actual),
        (CellValue::Text(text), Value::Bool(flag)) if coerced_numbers => {
            text.trim().eq_ignore_ascii_case(if *flag { "true" } else { "false" })
        }
        _ => false,
    }
}

/// Compares what was written with what the service returns for the same
/// range. `coerced_numbers` tolerates text that the service parsed as a
/// number or a boolean. Dates, times and formulas are not reversed, so text the
/// service parses as one of those still reports a mismatch.
pub fn compare(
    expected: &[Vec<CellValue>],
    actual: &[Vec<Value>],
    coerced_numbers: bool,
) -> Result<(), Mismatch> {
    let expected_rows = trimmed_rows(expected, CellValue::is_empty);
    let actual_rows = trimmed_rows(actual, is_blank);

    let row_count = expected_rows.len().max(actual_rows.len());
    for index in 0..row_count {
        let expected_row = expected_rows.get(index).copied().unwrap_or_default();
        let actual_row = actual_rows.get(index).copied().unwrap_or_default();

        let equal = expected_row.len() == actual_row.len()
            && expected_row
                .iter()
                .zip(actual_row)
                .all(|(expected, actual)| cell_matches(expected, actual, coerced_numbers));

        if !equal {
            return Err(Mismatch {
                row: index + 1,
                expected: expected_row.to_vec(),
                actual: actual_row.to_vec(),
            });
        }
    }

    Ok(())
}
