pub mod csv_writer;
pub mod dataset;

pub use csv_writer::CsvWriterSink;
pub use dataset::DatasetSink;
