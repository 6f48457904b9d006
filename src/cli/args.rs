use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{app_config::DEFAULT_CONFIG_NAME, ConfigFile, ConfigOverrides};

/// Upload a CSV export into a newly created Google Sheets spreadsheet.
#[derive(Parser, Debug, Clone)]
#[command(name = "sheets-migration", version, about)]
pub struct Cli {
    /// Configuration file; `Config.*` in the working directory is used when present.
    #[arg(short, long, env = "CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// CSV file to upload.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Field delimiter of the CSV file.
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<String>,

    /// Service account key (JSON).
    #[arg(long, value_name = "PATH")]
    pub credentials: Option<PathBuf>,

    /// Title of the spreadsheet to create.
    #[arg(long)]
    pub title: Option<String>,

    /// OAuth scope; repeat to pass several. Replaces the configured list.
    #[arg(long = "scope", value_name = "SCOPE")]
    pub scopes: Vec<String>,

    /// How the service interprets written values.
    #[arg(long, value_parser = ["RAW", "USER_ENTERED"])]
    pub value_input_option: Option<String>,

    /// Send every cell as text.
    #[arg(long)]
    pub no_infer_numbers: bool,

    /// Read the range back after writing and compare it with the CSV.
    #[arg(long)]
    pub verify: bool,

    /// Only load the CSV; do not contact the spreadsheet service.
    #[arg(long)]
    pub dry_run: bool,

    /// Also write logs to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// More output (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn config_file(&self) -> ConfigFile {
        match &self.config {
            Some(path) => ConfigFile {
                path: path.clone(),
                required: true,
            },
            None => ConfigFile {
                path: PathBuf::from(DEFAULT_CONFIG_NAME),
                required: false,
            },
        }
    }

    /// Flags left unset defer to the file and environment.
    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            csv_path: self.csv.clone(),
            delimiter: self.delimiter.clone(),
            credentials_path: self.credentials.clone(),
            title: self.title.clone(),
            scopes: (!self.scopes.is_empty()).then(|| self.scopes.clone()),
            value_input_option: self.value_input_option.clone(),
            infer_numbers: self.no_infer_numbers.then_some(false),
            verify: self.verify.then_some(true),
            dry_run: self.dry_run.then_some(true),
        }
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
