use std::process::ExitCode;

use clap::Parser;
use sheets_migration::{
    cli::Cli,
    config::AppConfig,
    migration::error::IntoMigrationReport,
    prettyprint::prettyprint::PrettyFormatter,
    MigrationOutcome,
};
use tracing::{error, info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

#[tokio::main(flavor = "current_thread")]
#[instrument]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_tracing(&cli) {
        eprintln!("Failed to set up logging: {e}");
        return ExitCode::FAILURE;
    }
    setup_panic_hook();

    info!("Script starting...");

    let config = match AppConfig::load(&cli.config_file(), &cli.config_overrides()) {
        Ok(config) => config,
        Err(report) => {
            error!("Migration failed: {:?}", report.into_migration_report());
            return ExitCode::FAILURE;
        }
    };

    match sheets_migration::run(&config).await {
        Ok(MigrationOutcome::DryRun { rows, columns }) => {
            info!("Dry run finished: {} rows x {} columns ready to upload.", rows, columns);
            ExitCode::SUCCESS
        }
        Ok(MigrationOutcome::Completed(report)) => {
            info!(
                rows = report.rows_written,
                columns = report.columns_written,
                verified = report.verified,
                "Migration completed."
            );
            println!("Spreadsheet edit URL: {}", report.edit_url());
            ExitCode::SUCCESS
        }
        Err(report) => {
            error!("Migration failed: {:?}", report);
            ExitCode::FAILURE
        }
    }
}

fn setup_tracing(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::filter::Targets::new()
        .with_target("sheets_migration", cli.log_level());

    let stdout_layer = tracing_subscriber::fmt::layer()
        .event_format(PrettyFormatter::new(true))
        .with_writer(std::io::stdout);

    let log_file_layer = match &cli.log_file {
        Some(path) => Some(
            tracing_subscriber::fmt::layer()
                .event_format(PrettyFormatter::new(false))
                .with_writer(std::fs::File::create(path)?)
                .with_ansi(false),
        ),
        None => None,
    };

    Registry::default()
        .with(log_file_layer.with_filter(filter.clone()))
        .with(stdout_layer.with_filter(filter))
        .try_init()?;

    Ok(())
}

fn setup_panic_hook() {
    tracing::trace!("Setting panic hook");
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("panic: {info}");
    }));
}
