pub mod error;
pub mod pipeline;
pub mod verify;

pub use error::MigrationError;
pub use pipeline::{migrate, run, MigrationOptions, MigrationOutcome, MigrationReport, Stage};
