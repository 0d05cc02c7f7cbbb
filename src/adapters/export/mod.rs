//! Export Adapter

mod csv_file;

pub use csv_file::{CsvExporter, CSV_HEADER, DEFAULT_EXPORT_DIR};
