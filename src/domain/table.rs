use thiserror::Error;

use super::cell_value::CellValue;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Table has no columns")]
    NoColumns,
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// 1-based, counting the header as row 1.
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// Header row plus data rows, every row as wide as the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    header: Vec<String>,
    records: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: Vec<String>, records: Vec<Vec<String>>) -> Result<Self, TableError> {
        if header.is_empty() {
            return Err(TableError::NoColumns);
        }

        if let Some((index, record)) = records
            .iter()
            .enumerate()
            .find(|(_, record)| record.len() != header.len())
        {
            return Err(TableError::RaggedRow {
                row: index + 2,
                found: record.len(),
                expected: header.len(),
            });
        }

        Ok(Self { header, records })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn records(&self) -> &[Vec<String>] {
        &self.records
    }

    /// Number of rows including the header.
    pub fn row_count(&self) -> usize {
        self.records.len() + 1
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Data shape as `(records, columns)`, header excluded.
    pub fn shape(&self) -> (usize, usize) {
        (self.records.len(), self.column_count())
    }

    /// All rows, header first.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        std::iter::once(self.header.as_slice()).chain(self.records.iter().map(Vec::as_slice))
    }

    /// Header cells stay text; data cells go through [`CellValue::infer`] when
    /// `infer_numbers` is set.
    pub fn to_cell_values(&self, infer_numbers: bool) -> Vec<Vec<CellValue>> {
        let header = self
            .header
            .iter()
            .map(|name| CellValue::Text(name.clone()))
            .collect::<Vec<_>>();

        let records = self.records.iter().map(|record| {
            record
                .iter()
                .map(|raw| {
                    if infer_numbers {
                        CellValue::infer(raw)
                    } else {
                        CellValue::Text(raw.clone())
                    }
                })
                .collect::<Vec<_>>()
        });

        std::iter::once(header).chain(records).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn products() -> Table {
        Table::new(
            strings(&["id", "name", "price"]),
            vec![
                strings(&["1", "Galaxy A15", "899.9"]),
                strings(&["2", "Moto G84", "007"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_counts_include_header() {
        let table = products();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.shape(), (2, 3));
        assert_eq!(table.rows().count(), 3);
        assert!(table.rows().all(|row| row.len() == 3));
    }

    #[test]
    fn test_header_only_table() {
        let table = Table::new(strings(&["id"]), vec![]).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.shape(), (0, 1));
    }

    #[test]
    fn test_rejects_no_columns() {
        assert_eq!(Table::new(vec![], vec![]), Err(TableError::NoColumns));
    }

    #[test]
    fn test_rejects_ragged_row() {
        let result = Table::new(
            strings(&["a", "b"]),
            vec![strings(&["1", "2"]), strings(&["3"])],
        );
        assert_eq!(
            result,
            Err(TableError::RaggedRow {
                row: 3,
                found: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn test_cell_values_keep_header_as_text() {
        let table = Table::new(strings(&["2024"]), vec![strings(&["2024"])]).unwrap();
        let values = table.to_cell_values(true);
        assert_eq!(values[0][0], CellValue::Text("2024".to_string()));
        assert_eq!(values[1][0], CellValue::infer("2024"));
    }

    #[test]
    fn test_cell_values_without_inference() {
        let values = products().to_cell_values(false);
        assert_eq!(values.len(), 3);
        assert!(values
            .iter()
            .flatten()
            .all(|cell| matches!(cell, CellValue::Text(_))));
    }
}
