use std::path::PathBuf;

use ::config::{Config, Environment, File};
use error_stack::{report, Report, ResultExt};
use serde::Deserialize;
use serde_path_to_error::{Deserializer as PathDeserializer, Segment, Track};
use thiserror::Error;
use tracing::{debug, instrument};

use super::{
    sheets_config::{SpreadsheetConfig, DRIVE_SCOPE, SPREADSHEETS_SCOPE},
    source_config::SourceConfig,
};

pub const DEFAULT_CONFIG_NAME: &str = "Config";
pub const ENV_PREFIX: &str = "SHEETS_MIGRATION";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read configuration")]
    Load,
    #[error("Failed to deserialize configuration at field '{path}'")]
    Deserialize { path: String },
    #[error("Invalid configuration value for '{field}': {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub sheets: SpreadsheetConfig,
    #[serde(default)]
    pub dry_run: bool,
}

/// Where the configuration file comes from. An explicitly named file must
/// exist; the implicit default may be absent.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub required: bool,
}

/// Highest-priority values, usually taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub csv_path: Option<PathBuf>,
    pub delimiter: Option<String>,
    pub credentials_path: Option<PathBuf>,
    pub title: Option<String>,
    pub scopes: Option<Vec<String>>,
    pub value_input_option: Option<String>,
    pub infer_numbers: Option<bool>,
    pub verify: Option<bool>,
    pub dry_run: Option<bool>,
}

impl AppConfig {
    /// Defaults, then the file, then `SHEETS_MIGRATION__SECTION__KEY`
    /// environment variables, then `overrides`.
    #[instrument(skip(overrides))]
    pub fn load(
        file: &ConfigFile,
        overrides: &ConfigOverrides,
    ) -> error_stack::Result<Self, ConfigError> {
        Self::load_with_environment(file, overrides, Self::environment())
    }

    /// `SHEETS_MIGRATION__SHEETS__SCOPES` is read as a comma-separated list.
    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("sheets.scopes")
            .try_parsing(true)
    }

    fn load_with_environment(
        file: &ConfigFile,
        overrides: &ConfigOverrides,
        environment: Environment,
    ) -> error_stack::Result<Self, ConfigError> {
        let path_display = file.path.display().to_string();
        let config = Self::builder(file, overrides, environment)
            .and_then(|builder| builder.build())
            .change_context(ConfigError::Load)
            .attach_printable_lazy(|| format!("config file: {path_display}"))?;

        let app_config = Self::deserialize_tracked(config)
            .attach_printable_lazy(|| format!("config file: {path_display}"))?;
        app_config.validate()?;

        debug!(?app_config, "configuration loaded");
        Ok(app_config)
    }

    fn builder(
        file: &ConfigFile,
        overrides: &ConfigOverrides,
        environment: Environment,
    ) -> Result<::config::ConfigBuilder<::config::builder::DefaultState>, ::config::ConfigError>
    {
        let path_string = |path: &PathBuf| path.to_string_lossy().into_owned();

        Config::builder()
            .set_default("source.csv_path", "products_rows.csv")?
            .set_default("source.delimiter", ",")?
            .set_default("sheets.credentials_path", "credentials.json")?
            .set_default("sheets.title", "CentralCelulares Products")?
            .set_default("sheets.scopes", vec![SPREADSHEETS_SCOPE, DRIVE_SCOPE])?
            .set_default("sheets.value_input_option", "RAW")?
            .set_default("sheets.infer_numbers", true)?
            .set_default("sheets.verify", false)?
            .set_default("dry_run", false)?
            .add_source(File::from(file.path.clone()).required(file.required))
            .add_source(environment)
            .set_override_option("source.csv_path", overrides.csv_path.as_ref().map(path_string))?
            .set_override_option("source.delimiter", overrides.delimiter.clone())?
            .set_override_option(
                "sheets.credentials_path",
                overrides.credentials_path.as_ref().map(path_string),
            )?
            .set_override_option("sheets.title", overrides.title.clone())?
            .set_override_option("sheets.scopes", overrides.scopes.clone())?
            .set_override_option(
                "sheets.value_input_option",
                overrides.value_input_option.clone(),
            )?
            .set_override_option("sheets.infer_numbers", overrides.infer_numbers)?
            .set_override_option("sheets.verify", overrides.verify)?
            .set_override_option("dry_run", overrides.dry_run)
    }

    // Deserializing the `Config` itself keeps its scalar coercion, so a
    // numeric `SHEETS_MIGRATION__SHEETS__TITLE` still reads as a string.
    fn deserialize_tracked(config: Config) -> error_stack::Result<Self, ConfigError> {
        let mut track = Track::new();
        let path_de = PathDeserializer::new(config, &mut track);
        AppConfig::deserialize(path_de).map_err(|error| {
            let path = track
                .path()
                .iter()
                .map(|seg| match seg {
                    Segment::Seq { index } => format!("[{}]", index),
                    Segment::Map { key } => format!(".{}", key),
                    Segment::Enum { variant } => format!("::{}", variant),
                    Segment::Unknown => String::from("<?>"),
                })
                .collect::<String>();
            Report::new(ConfigError::Deserialize {
                path: path.trim_start_matches('.').to_string(),
            })
            .attach_printable(error.to_string())
        })
    }

    pub fn validate(&self) -> error_stack::Result<(), ConfigError> {
        let invalid = |field, reason| Err(report!(ConfigError::Invalid { field, reason }));

        if self.source.csv_path.as_os_str().is_empty() {
            return invalid("source.csv_path", "must not be empty");
        }
        if self.sheets.credentials_path.as_os_str().is_empty() {
            return invalid("sheets.credentials_path", "must not be empty");
        }
        if self.sheets.title.trim().is_empty() {
            return invalid("sheets.title", "must not be empty");
        }
        if self.sheets.scopes.is_empty() {
            return invalid("sheets.scopes", "at least one scope is required");
        }
        if self.sheets.scopes.iter().any(|scope| scope.trim().is_empty()) {
            return invalid("sheets.scopes", "scopes must not be blank");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::sheets_config::ValueInputOption;
    use std::io::Write;

    fn isolated_environment() -> Environment {
        Environment::with_prefix("SHEETS_MIGRATION_TEST_UNSET")
            .prefix_separator("__")
            .separator("__")
    }

    fn load(
        file: &ConfigFile,
        overrides: &ConfigOverrides,
    ) -> error_stack::Result<AppConfig, ConfigError> {
        AppConfig::load_with_environment(file, overrides, isolated_environment())
    }

    fn environment_from(vars: &[(&str, &str)]) -> Environment {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<::config::Map<_, _>>();
        AppConfig::environment().source(Some(vars))
    }

    fn missing_file() -> (tempfile::TempDir, ConfigFile) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Config.toml");
        (dir, ConfigFile { path, required: false })
    }

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_defaults_without_file() {
        let (_dir, file) = missing_file();

        let config = load(&file, &ConfigOverrides::default()).unwrap();

        assert_eq!(config.source.csv_path, PathBuf::from("products_rows.csv"));
        assert_eq!(config.source.delimiter.byte(), b',');
        assert_eq!(config.sheets.credentials_path, PathBuf::from("credentials.json"));
        assert_eq!(&*config.sheets.title, "CentralCelulares Products");
        assert_eq!(config.sheets.scopes, vec![SPREADSHEETS_SCOPE, DRIVE_SCOPE]);
        assert_eq!(config.sheets.value_input_option, ValueInputOption::Raw);
        assert!(config.sheets.infer_numbers);
        assert!(!config.sheets.verify);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_required_file_must_exist() {
        let (_dir, mut file) = missing_file();
        file.required = true;

        let report = load(&file, &ConfigOverrides::default()).unwrap_err();

        assert_eq!(report.current_context(), &ConfigError::Load);
    }

    #[test]
    fn test_file_values_and_overrides() {
        let file = toml_file(
            r#"
            [source]
            csv_path = "export/products.csv"
            delimiter = ";"

            [sheets]
            credentials_path = "keys/service.json"
            title = "From file"
            scopes = ["https://www.googleapis.com/auth/spreadsheets"]
            value_input_option = "USER_ENTERED"
            verify = true
            "#,
        );
        let config_file = ConfigFile {
            path: file.path().to_path_buf(),
            required: true,
        };
        let overrides = ConfigOverrides {
            title: Some("From CLI".to_string()),
            infer_numbers: Some(false),
            ..Default::default()
        };

        let config = load(&config_file, &overrides).unwrap();

        assert_eq!(config.source.csv_path, PathBuf::from("export/products.csv"));
        assert_eq!(config.source.delimiter.byte(), b';');
        assert_eq!(config.sheets.credentials_path, PathBuf::from("keys/service.json"));
        assert_eq!(&*config.sheets.title, "From CLI");
        assert_eq!(config.sheets.scopes, vec![SPREADSHEETS_SCOPE]);
        assert_eq!(config.sheets.value_input_option, ValueInputOption::UserEntered);
        assert!(!config.sheets.infer_numbers);
        assert!(config.sheets.verify);
    }

    #[test]
    fn test_unknown_value_input_option_reports_field_path() {
        let (_dir, file) = missing_file();
        let overrides = ConfigOverrides {
            value_input_option: Some("FORMATTED".to_string()),
            ..Default::default()
        };

        let report = load(&file, &overrides).unwrap_err();

        assert!(matches!(
            report.current_context(),
            ConfigError::Deserialize { path } if path.starts_with("sheets.value_input_option")
        ));
    }

    #[test]
    fn test_rejects_empty_scopes() {
        let (_dir, file) = missing_file();
        let overrides = ConfigOverrides {
            scopes: Some(vec![]),
            ..Default::default()
        };

        let report = load(&file, &overrides).unwrap_err();

        assert!(matches!(
            report.current_context(),
            ConfigError::Invalid { field: "sheets.scopes", .. }
        ));
    }

    #[test]
    fn test_rejects_blank_title() {
        let (_dir, file) = missing_file();
        let overrides = ConfigOverrides {
            title: Some("   ".to_string()),
            ..Default::default()
        };

        let report = load(&file, &overrides).unwrap_err();

        assert!(matches!(
            report.current_context(),
            ConfigError::Invalid { field: "sheets.title", .. }
        ));
    }

    #[test]
    fn test_rejects_multi_character_delimiter() {
        let (_dir, file) = missing_file();
        let overrides = ConfigOverrides {
            delimiter: Some("||".to_string()),
            ..Default::default()
        };

        let report = load(&file, &overrides).unwrap_err();

        assert_eq!(
            report.current_context(),
            &ConfigError::Deserialize {
                path: "source.delimiter".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_empty_csv_path() {
        let (_dir, file) = missing_file();
        let overrides = ConfigOverrides {
            csv_path: Some(PathBuf::new()),
            ..Default::default()
        };

        let report = load(&file, &overrides).unwrap_err();

        assert!(matches!(
            report.current_context(),
            ConfigError::Invalid { field: "source.csv_path", .. }
        ));
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = toml_file(
            r#"
            [sheets]
            title = "From file"
            verify = false
            "#,
        );
        let config_file = ConfigFile {
            path: file.path().to_path_buf(),
            required: true,
        };
        let environment = environment_from(&[
            ("SHEETS_MIGRATION__SHEETS__TITLE", "From env"),
            ("SHEETS_MIGRATION__SHEETS__VERIFY", "true"),
            ("SHEETS_MIGRATION__SOURCE__DELIMITER", ";"),
        ]);

        let config =
            AppConfig::load_with_environment(&config_file, &ConfigOverrides::default(), environment)
                .unwrap();

        assert_eq!(&*config.sheets.title, "From env");
        assert!(config.sheets.verify);
        assert_eq!(config.source.delimiter.byte(), b';');
    }

    #[test]
    fn test_numeric_environment_values_stay_strings() {
        let (_dir, file) = missing_file();
        let environment = environment_from(&[
            ("SHEETS_MIGRATION__SHEETS__TITLE", "2024"),
            ("SHEETS_MIGRATION__SOURCE__CSV_PATH", "20240131"),
            ("SHEETS_MIGRATION__SHEETS__CREDENTIALS_PATH", "42"),
        ]);

        let config =
            AppConfig::load_with_environment(&file, &ConfigOverrides::default(), environment)
                .unwrap();

        assert_eq!(&*config.sheets.title, "2024");
        assert_eq!(config.source.csv_path, PathBuf::from("20240131"));
        assert_eq!(config.sheets.credentials_path, PathBuf::from("42"));
    }

    #[test]
    fn test_environment_scopes_are_comma_separated() {
        let (_dir, file) = missing_file();
        let scopes = format!("{SPREADSHEETS_SCOPE},{DRIVE_SCOPE}");
        let environment = environment_from(&[("SHEETS_MIGRATION__SHEETS__SCOPES", &scopes)]);

        let config =
            AppConfig::load_with_environment(&file, &ConfigOverrides::default(), environment)
                .unwrap();

        assert_eq!(config.sheets.scopes, vec![SPREADSHEETS_SCOPE, DRIVE_SCOPE]);
    }

    #[test]
    fn test_cli_overrides_environment() {
        let (_dir, file) = missing_file();
        let environment = environment_from(&[("SHEETS_MIGRATION__SHEETS__TITLE", "From env")]);
        let overrides = ConfigOverrides {
            title: Some("From CLI".to_string()),
            ..Default::default()
        };

        let config = AppConfig::load_with_environment(&file, &overrides, environment).unwrap();

        assert_eq!(&*config.sheets.title, "From CLI");
    }
}
