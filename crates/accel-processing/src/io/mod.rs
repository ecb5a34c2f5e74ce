//! Tabular input and output.

mod reader;
mod writer;

pub use reader::{ColumnOverview, MISSING_MARKERS, TableOverview, describe_table, load_csv};
pub use writer::write_csv;
