use serde_json::Value;
use thiserror::Error;

use crate::sheets::domain::a1_notation::A1Notation;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetGatewayError {
    #[error("Failed to create spreadsheet")]
    FailedToCreateSpreadsheet,
    #[error("Spreadsheet response is missing {0}")]
    IncompleteResponse(&'static str),
    #[error("Failed to write range")]
    FailedToWriteRange,
    #[error("Failed to fetch range")]
    FailedToFetchRange,
}

/// Smallest grid the service gives a new worksheet.
pub const DEFAULT_GRID_ROWS: u32 = 1000;
pub const DEFAULT_GRID_COLUMNS: u32 = 26;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub title: String,
    pub row_count: u32,
    pub column_count: u32,
}

impl ProvisionRequest {
    /// Grid at least as large as the service default and as the data.
    pub fn fitting(title: impl Into<String>, rows: u32, columns: u32) -> Self {
        Self {
            title: title.into(),
            row_count: rows.max(DEFAULT_GRID_ROWS),
            column_count: columns.max(DEFAULT_GRID_COLUMNS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetHandle {
    pub sheet_id: i32,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetHandle {
    pub spreadsheet_id: String,
    pub worksheet: WorksheetHandle,
}

impl SpreadsheetHandle {
    pub fn edit_url(&self) -> String {
        format!(
            "https://docs.google.com/spreadsheets/d/{}/edit",
            self.spreadsheet_id
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub updated_range: Option<String>,
    pub updated_rows: Option<u32>,
    pub updated_columns: Option<u32>,
    pub updated_cells: Option<u32>,
}

/// Remote spreadsheet operations used by a migration.
#[async_trait::async_trait]
pub trait SpreadsheetGateway: Send + Sync {
    /// Always creates a new spreadsheet; calling twice yields two resources.
    async fn create_spreadsheet(
        &self,
        request: &ProvisionRequest,
    ) -> error_stack::Result<SpreadsheetHandle, SpreadsheetGatewayError>;

    /// Single request, overwriting whatever is in `range`.
    async fn write_range(
        &self,
        spreadsheet_id: &str,
        range: &A1Notation,
        rows: Vec<Vec<Value>>,
    ) -> error_stack::Result<WriteSummary, SpreadsheetGatewayError>;

    async fn read_range(
        &self,
        spreadsheet_id: &str,
        range: &A1Notation,
    ) -> error_stack::Result<Vec<Vec<Value>>, SpreadsheetGatewayError>;
}
