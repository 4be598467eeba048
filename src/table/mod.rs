pub mod cleaned;
pub mod raw;

pub use cleaned::{CleanedTable, ColumnType};
pub use raw::RawTable;
