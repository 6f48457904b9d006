pub mod cell_value;
pub mod table;

pub use table::{Table, TableError};
