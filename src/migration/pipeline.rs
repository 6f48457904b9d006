use std::fmt::Display;

use error_stack::{report, ResultExt};
use tracing::{info, instrument, warn};

use crate::{
    config::{
        sheets_config::{SpreadsheetConfig, ValueInputOption},
        AppConfig,
    },
    domain::Table,
    ports::spreadsheet_gateway::{ProvisionRequest, SpreadsheetGateway, SpreadsheetHandle},
    sheets::{
        auth,
        domain::{
            a1_notation::{A1Notation, ToA1Notation},
            cell_range::CellRange,
        },
        spreadsheet_manager::SpreadsheetManager,
        value_range_factory::table_rows,
    },
    source::csv_loader::CsvLoader,
};

use super::{error::IntoMigrationReport, verify, MigrationError};

/// Linear progression of a run; there are no branches back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Loaded,
    Authenticated,
    Provisioned,
    Written,
    Verified,
    Done,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Loaded => "loaded",
            Stage::Authenticated => "authenticated",
            Stage::Provisioned => "provisioned",
            Stage::Written => "written",
            Stage::Verified => "verified",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct MigrationOptions {
    pub title: String,
    pub infer_numbers: bool,
    pub verify: bool,
    /// The service may reinterpret text as numbers or booleans when it parses
    /// input. Text it turns into dates is not tolerated by verification.
    pub coerced_numbers: bool,
}

impl From<&SpreadsheetConfig> for MigrationOptions {
    fn from(config: &SpreadsheetConfig) -> Self {
        Self {
            title: config.title.to_string(),
            infer_numbers: config.infer_numbers,
            verify: config.verify,
            coerced_numbers: config.value_input_option == ValueInputOption::UserEntered,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub spreadsheet: SpreadsheetHandle,
    pub range: A1Notation,
    pub rows_written: usize,
    pub columns_written: usize,
    pub cells_updated: Option<u32>,
    pub verified: bool,
}

impl MigrationReport {
    pub fn edit_url(&self) -> String {
        self.spreadsheet.edit_url()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The table was loaded and nothing remote was touched.
    DryRun { rows: usize, columns: usize },
    Completed(MigrationReport),
}

/// Loads the source table, authenticates, and migrates it into a new
/// spreadsheet. Every call creates a new spreadsheet.
#[instrument(skip_all)]
pub async fn run(config: &AppConfig) -> error_stack::Result<MigrationOutcome, MigrationError> {
    config
        .validate()
        .map_err(IntoMigrationReport::into_migration_report)?;

    let table = load(config)?;

    if config.dry_run {
        info!("Dry run: no spreadsheet will be created.");
        return Ok(MigrationOutcome::DryRun {
            rows: table.row_count(),
            columns: table.column_count(),
        });
    }

    info!(
        "Using credentials file: {}",
        config.sheets.credentials_path.display()
    );
    let credential = auth::authenticate(&config.sheets.credentials_path, &config.sheets.scopes)
        .await
        .map_err(IntoMigrationReport::into_migration_report)?;
    info!(
        client_email = %credential.client_email,
        stage = %Stage::Authenticated,
        "Authenticated with Google."
    );

    let manager = SpreadsheetManager::new(config.sheets.clone(), credential);
    let report = migrate(&table, &manager, &MigrationOptions::from(&config.sheets)).await?;

    Ok(MigrationOutcome::Completed(report))
}

#[instrument(skip_all)]
fn load(config: &AppConfig) -> error_stack::Result<Table, MigrationError> {
    let path = &config.source.csv_path;
    info!("Loading CSV from: {}", path.display());

    let table = CsvLoader::new(config.source.delimiter.byte())
        .load(path)
        .map_err(IntoMigrationReport::into_migration_report)?;

    let (records, columns) = table.shape();
    info!(
        stage = %Stage::Loaded,
        "CSV loaded. Shape: ({}, {})",
        records,
        columns
    );
    Ok(table)
}

/// Provisions a spreadsheet sized for `table`, writes header and records in
/// one request, and optionally reads the range back.
#[instrument(skip_all, fields(title = %options.title))]
pub async fn migrate<G>(
    table: &Table,
    gateway: &G,
    options: &MigrationOptions,
) -> error_stack::Result<MigrationReport, MigrationError>
where
    G: SpreadsheetGateway + ?Sized,
{
    let row_count = u32::try_from(table.row_count())
        .change_context(MigrationError::RemoteServiceError)
        .attach_printable("table has too many rows for a worksheet")?;
    let column_count = u32::try_from(table.column_count())
        .change_context(MigrationError::RemoteServiceError)
        .attach_printable("table has too many columns for a worksheet")?;

    info!("Creating spreadsheet with title: {}", options.title);
    warn!("A new spreadsheet is created on every run; earlier copies are left untouched.");
    let spreadsheet = gateway
        .create_spreadsheet(&ProvisionRequest::fitting(
            options.title.clone(),
            row_count,
            column_count,
        ))
        .await
        .map_err(IntoMigrationReport::into_migration_report)?;
    info!(
        stage = %Stage::Provisioned,
        sheet_id = spreadsheet.worksheet.sheet_id,
        worksheet = %spreadsheet.worksheet.title,
        "Spreadsheet created with ID: {}",
        spreadsheet.spreadsheet_id
    );

    let range = CellRange::from_top_left(row_count, column_count)
        .ok_or(report!(MigrationError::ParseError))
        .attach_printable("table has no cells")?
        .with_sheet_title(spreadsheet.worksheet.title.clone())
        .to_a1_notation(None);

    info!("Updating worksheet with data...");
    let summary = gateway
        .write_range(
            &spreadsheet.spreadsheet_id,
            &range,
            table_rows(table, options.infer_numbers),
        )
        .await
        .map_err(IntoMigrationReport::into_migration_report)?;
    info!(
        stage = %Stage::Written,
        updated_range = ?summary.updated_range,
        updated_rows = ?summary.updated_rows,
        updated_columns = ?summary.updated_columns,
        updated_cells = ?summary.updated_cells,
        "Worksheet updated."
    );

    let mut stage = Stage::Written;
    if options.verify {
        let actual = gateway
            .read_range(&spreadsheet.spreadsheet_id, &range)
            .await
            .map_err(IntoMigrationReport::into_migration_report)?;

        verify::compare(
            &table.to_cell_values(options.infer_numbers),
            &actual,
            options.coerced_numbers,
        )
        .map_err(|mismatch| {
            report!(MigrationError::VerificationFailed)
                .attach_printable(format!("range {range}"))
                .attach_printable(mismatch.to_string())
        })?;

        stage = Stage::Verified;
        info!(stage = %stage, "Read-back matches the source table.");
    }

    info!(stage = %Stage::Done, "Migration finished.");
    Ok(MigrationReport {
        rows_written: table.row_count(),
        columns_written: table.column_count(),
        cells_updated: summary.updated_cells,
        verified: stage == Stage::Verified,
        spreadsheet,
        range,
    })
}
