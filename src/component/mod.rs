//! Data-bound components.

pub mod data_table;
pub mod table;

pub use data_table::{ColumnType, DataTable, Row};
pub use table::Table;
