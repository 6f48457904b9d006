use google_sheets4::api::ValueRange;
use serde_json::Value;

use crate::domain::Table;

pub trait ValueRangeFactory {
    fn from_rows(rows: Vec<Vec<Value>>) -> Self;
}

impl ValueRangeFactory for ValueRange {
    fn from_rows(rows: Vec<Vec<Value>>) -> Self {
        ValueRange {
            major_dimension: Some("ROWS".to_string()),
            range: None,
            values: Some(rows),
        }
    }
}

/// Header first, one JSON value per cell.
pub fn table_rows(table: &Table, infer_numbers: bool) -> Vec<Vec<Value>> {
    table
        .to_cell_values(infer_numbers)
        .into_iter()
        .map(|row| row.into_iter().map(Value::from).collect())
        .collect()
}
