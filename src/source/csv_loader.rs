use std::{fs::File, io, path::Path};

use error_stack::{report, Report, ResultExt};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{Table, TableError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Source file not found")]
    FileNotFound,
    #[error("Failed to read source file")]
    Io,
    #[error("Source file is not well-formed tabular data")]
    ParseError,
}

#[derive(Debug, Clone, Copy)]
pub struct CsvLoader {
    delimiter: u8,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvLoader {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    #[instrument(skip(self), fields(delimiter = %char::from(self.delimiter)))]
    pub fn load(&self, path: &Path) -> error_stack::Result<Table, LoadError> {
        let file = File::open(path).map_err(|error| {
            let context = match error.kind() {
                io::ErrorKind::NotFound => LoadError::FileNotFound,
                _ => LoadError::Io,
            };
            Report::new(error)
                .change_context(context)
                .attach_printable(format!("path: {}", path.display()))
        })?;

        self.load_from_reader(file)
            .attach_printable_lazy(|| format!("path: {}", path.display()))
    }

    pub fn load_from_reader<R: io::Read>(
        &self,
        reader: R,
    ) -> error_stack::Result<Table, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let header = reader
            .headers()
            .map_err(map_csv_error)?
            .iter()
            .map(String::from)
            .collect::<Vec<_>>();

        if header.is_empty() {
            return Err(report!(LoadError::ParseError))
                .attach_printable("file has no header row");
        }

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record.map_err(map_csv_error)?;
            records.push(record.iter().map(String::from).collect::<Vec<_>>());
        }

        debug!(records = records.len(), columns = header.len(), "parsed csv");

        Table::new(header, records).map_err(|error: TableError| {
            Report::new(error).change_context(LoadError::ParseError)
        })
    }
}

fn map_csv_error(error: csv::Error) -> Report<LoadError> {
    let context = match error.kind() {
        csv::ErrorKind::Io(_) => LoadError::Io,
        _ => LoadError::ParseError,
    };
    let position = error
        .position()
        .map(|position| format!("line {}", position.line()));

    let report = Report::new(error).change_context(context);
    match position {
        Some(position) => report.attach_printable(position),
        None => report,
    }
}
