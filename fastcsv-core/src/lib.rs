//! FastCSV Core - CSV reader and writer (pure logic, no terminal output)
//!
//! Contains the character stream, row tokenizer, row iterators and writer.
//! Operates on any `std::io::Read` / `std::io::Write`; never opens files itself.
//!
//! Configuration and loggers are passed explicitly, not via global state.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::CsvError;
pub use reader::{CsvReader, CsvRow, Header, NamedCsvReader, NamedCsvRow};
pub use writer::CsvWriter;

// Re-export config types from fastcsv-config
pub use fastcsv_config::{
    CommentStrategy, ConfigError, Dialect, LineDelimiter, QuoteStrategy, ReadConfig, WriteConfig,
};
