use error_stack::Report;
use thiserror::Error;

use crate::{
    config::ConfigError, ports::spreadsheet_gateway::SpreadsheetGatewayError,
    sheets::auth::AuthError, source::csv_loader::LoadError,
};

/// The kind a failed migration is reported as; the attached report keeps the
/// component error underneath.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationError {
    #[error("Invalid configuration")]
    InvalidConfig,
    #[error("Source file not found")]
    FileNotFound,
    #[error("Source file could not be read")]
    SourceUnreadable,
    #[error("Source file is not well-formed tabular data")]
    ParseError,
    #[error("Authentication with the spreadsheet service failed")]
    AuthenticationError,
    #[error("Spreadsheet service request failed")]
    RemoteServiceError,
    #[error("Written values do not match the source table")]
    VerificationFailed,
}

pub trait IntoMigrationReport {
    fn into_migration_report(self) -> Report<MigrationError>;
}

impl IntoMigrationReport for Report<LoadError> {
    fn into_migration_report(self) -> Report<MigrationError> {
        let kind = match self.current_context() {
            LoadError::FileNotFound => MigrationError::FileNotFound,
            LoadError::Io => MigrationError::SourceUnreadable,
            LoadError::ParseError => MigrationError::ParseError,
        };
        self.change_context(kind)
    }
}

impl IntoMigrationReport for Report<AuthError> {
    fn into_migration_report(self) -> Report<MigrationError> {
        self.change_context(MigrationError::AuthenticationError)
    }
}

impl IntoMigrationReport for Report<SpreadsheetGatewayError> {
    fn into_migration_report(self) -> Report<MigrationError> {
        self.change_context(MigrationError::RemoteServiceError)
    }
}

impl IntoMigrationReport for Report<ConfigError> {
    fn into_migration_report(self) -> Report<MigrationError> {
        self.change_context(MigrationError::InvalidConfig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use error_stack::report;

    #[test]
    fn test_load_errors_keep_their_kind() {
        let cases = [
            (LoadError::FileNotFound, MigrationError::FileNotFound),
            (LoadError::Io, MigrationError::SourceUnreadable),
            (LoadError::ParseError, MigrationError::ParseError),
        ];
        for (load_error, expected) in cases {
            let report = report!(load_error).into_migration_report();
            assert_eq!(report.current_context(), &expected);
            assert!(report.contains::<LoadError>());
        }
    }

    #[test]
    fn test_auth_and_remote_kinds() {
        assert_eq!(
            report!(AuthError::ReadKey)
                .into_migration_report()
                .current_context(),
            &MigrationError::AuthenticationError
        );
        assert_eq!(
            report!(SpreadsheetGatewayError::FailedToWriteRange)
                .into_migration_report()
                .current_context(),
            &MigrationError::RemoteServiceError
        );
    }
}
