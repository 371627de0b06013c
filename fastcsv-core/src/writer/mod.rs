//! 写入端

pub mod csv_writer;
pub mod quoting;

pub use csv_writer::CsvWriter;
