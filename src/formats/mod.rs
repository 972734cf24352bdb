// Text formats for bulk channel transfer
pub mod csv;

pub use csv::{import_csv, CsvError, CsvWriter};
