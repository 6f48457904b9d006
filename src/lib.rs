pub mod cli;
pub mod config;
pub mod domain;
pub mod migration;
pub mod ports;
pub mod prettyprint;
pub mod sheets;
pub mod source;

pub use migration::{migrate, run, MigrationError, MigrationOutcome, MigrationReport};
