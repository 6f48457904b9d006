use error_stack::{report, ResultExt};
use google_sheets4::{
    api::{GridProperties, Sheet, SheetProperties, Spreadsheet, SpreadsheetProperties, ValueRange},
    Sheets,
};
use serde_json::Value;
use std::fmt::Debug;
use tracing::{debug, instrument};

use crate::{
    config::sheets_config::SpreadsheetConfig,
    ports::spreadsheet_gateway::{
        ProvisionRequest, SpreadsheetGateway, SpreadsheetGatewayError, SpreadsheetHandle,
        WorksheetHandle, WriteSummary,
    },
    sheets::domain::a1_notation::A1Notation,
};

use super::{auth::Credential, http_client::HttpsConnector, value_range_factory::ValueRangeFactory};

pub struct SpreadsheetManager {
    pub config: SpreadsheetConfig,
    scopes: Vec<String>,
    hub: Sheets<HttpsConnector>,
}

impl Debug for SpreadsheetManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SpreadsheetManager {{ config: {:?} }}", self.config)
    }
}

impl SpreadsheetManager {
    pub fn new(config: SpreadsheetConfig, credential: Credential) -> Self {
        let Credential {
            client,
            authenticator,
            scopes,
            ..
        } = credential;

        SpreadsheetManager {
            config,
            scopes,
            hub: Sheets::new(client, authenticator),
        }
    }
}

fn to_i32(value: u32) -> error_stack::Result<i32, SpreadsheetGatewayError> {
    i32::try_from(value)
        .change_context(SpreadsheetGatewayError::FailedToCreateSpreadsheet)
        .attach_printable_lazy(|| format!("grid dimension {value} is too large"))
}

fn to_u32(value: Option<i32>) -> Option<u32> {
    value.and_then(|value| u32::try_from(value).ok())
}

fn first_worksheet(
    spreadsheet: &Spreadsheet,
) -> error_stack::Result<WorksheetHandle, SpreadsheetGatewayError> {
    let properties = spreadsheet
        .sheets
        .as_deref()
        .and_then(<[Sheet]>::first)
        .and_then(|sheet| sheet.properties.as_ref())
        .ok_or(report!(SpreadsheetGatewayError::IncompleteResponse(
            "first worksheet"
        )))?;

    Ok(WorksheetHandle {
        sheet_id: properties.sheet_id.unwrap_or(0),
        title: properties
            .title
            .clone()
            .ok_or(report!(SpreadsheetGatewayError::IncompleteResponse(
                "worksheet title"
            )))?,
    })
}

#[async_trait::async_trait]
impl SpreadsheetGateway for SpreadsheetManager {
    #[instrument]
    async fn create_spreadsheet(
        &self,
        request: &ProvisionRequest,
    ) -> error_stack::Result<SpreadsheetHandle, SpreadsheetGatewayError> {
        let spreadsheet = Spreadsheet {
            properties: Some(SpreadsheetProperties {
                title: Some(request.title.clone()),
                ..Default::default()
            }),
            sheets: Some(vec![Sheet {
                properties: Some(SheetProperties {
                    grid_properties: Some(GridProperties {
                        row_count: Some(to_i32(request.row_count)?),
                        column_count: Some(to_i32(request.column_count)?),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }]),
            ..Default::default()
        };

        let (_, created) = self
            .hub
            .spreadsheets()
            .create(spreadsheet)
            .add_scopes(&self.scopes)
            .doit()
            .await
            .change_context(SpreadsheetGatewayError::FailedToCreateSpreadsheet)
            .attach_printable_lazy(|| format!("title: {}", request.title))?;

        let spreadsheet_id = created
            .spreadsheet_id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or(report!(SpreadsheetGatewayError::IncompleteResponse(
                "spreadsheet id"
            )))?;
        let worksheet = first_worksheet(&created)?;

        debug!(%spreadsheet_id, url = ?created.spreadsheet_url, "spreadsheet created");

        Ok(SpreadsheetHandle {
            spreadsheet_id,
            worksheet,
        })
    }

    #[instrument(skip(rows), fields(rows = rows.len()))]
    async fn write_range(
        &self,
        spreadsheet_id: &str,
        range: &A1Notation,
        rows: Vec<Vec<Value>>,
    ) -> error_stack::Result<WriteSummary, SpreadsheetGatewayError> {
        let (_, response) = self
            .hub
            .spreadsheets()
            .values_update(ValueRange::from_rows(rows), spreadsheet_id, range.as_ref())
            .value_input_option(self.config.value_input_option.as_str())
            .add_scopes(&self.scopes)
            .doit()
            .await
            .change_context(SpreadsheetGatewayError::FailedToWriteRange)
            .attach_printable_lazy(|| format!("Failed to write to range {} ", range))?;

        Ok(WriteSummary {
            updated_range: response.updated_range,
            updated_rows: to_u32(response.updated_rows),
            updated_columns: to_u32(response.updated_columns),
            updated_cells: to_u32(response.updated_cells),
        })
    }

    #[instrument]
    async fn read_range(
        &self,
        spreadsheet_id: &str,
        range: &A1Notation,
    ) -> error_stack::Result<Vec<Vec<Value>>, SpreadsheetGatewayError> {
        let (_, value_range) = self
            .hub
            .spreadsheets()
            .values_get(spreadsheet_id, range.as_ref())
            .value_render_option("UNFORMATTED_VALUE")
            .major_dimension("ROWS")
            .add_scopes(&self.scopes)
            .doit()
            .await
            .change_context(SpreadsheetGatewayError::FailedToFetchRange)
            .attach_printable_lazy(|| format!("Failed to fetch values for range {}", range))?;

        // The API omits `values` entirely for an empty range.
        Ok(value_range.values.unwrap_or_default())
    }
}
