pub mod app_config;
pub mod sheets_config;
pub mod source_config;

pub use app_config::{AppConfig, ConfigError, ConfigFile, ConfigOverrides};
