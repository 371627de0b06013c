//! FastCSV - A fast, RFC 4180 compliant CSV reader and writer
//!
//! # Architecture
//!
//! ```text
//! fastcsv-config  - Dialect and reader/writer configuration (pure data)
//! fastcsv-log     - Explicit, injected logging
//! fastcsv-core    - Character stream, tokenizer, row iterators, writer
//! fastcsv-cli     - `fastcsv` command line tool
//! ```
//!
//! # Quick Start
//!
//! ```
//! use fastcsv::{read_str, write_to_string, WriteConfig};
//!
//! let rows = read_str("name,note\nAlice,\"hello, world\"\n").unwrap();
//! assert_eq!(rows[1].field(1).unwrap(), "hello, world");
//!
//! let text = write_to_string(&[vec!["a", "b,c"]], WriteConfig::default()).unwrap();
//! assert_eq!(text, "a,\"b,c\"\r\n");
//! ```

// 重导出常用类型
pub use fastcsv_config::{
    CommentStrategy, ConfigError, Dialect, LineDelimiter, QuoteStrategy, ReadConfig, WriteConfig,
    DEFAULT_MAX_FIELD_SIZE,
};
pub use fastcsv_core::reader::{CharStream, RowTokenizer, StreamError};
pub use fastcsv_core::{CsvError, CsvReader, CsvRow, CsvWriter, Header, NamedCsvReader, NamedCsvRow};
pub use fastcsv_log::{Level, LogConfig, LogRingBuffer, Logger};

/// 用默认配置读取字符串中的全部行
pub fn read_str(text: &str) -> Result<Vec<CsvRow>, CsvError> {
    read_str_with(text, ReadConfig::default())
}

/// 用指定配置读取字符串中的全部行
pub fn read_str_with(text: &str, config: ReadConfig) -> Result<Vec<CsvRow>, CsvError> {
    CsvReader::with_config(text.as_bytes(), config)?.collect()
}

/// 读取字符串中的全部命名行（第一行为表头）
pub fn read_named_str(text: &str, config: ReadConfig) -> Result<Vec<NamedCsvRow>, CsvError> {
    NamedCsvReader::with_config(text.as_bytes(), config)?.collect()
}

/// 把若干行写成字符串
pub fn write_to_string<R, F>(rows: R, config: WriteConfig) -> Result<String, CsvError>
where
    R: IntoIterator,
    R::Item: IntoIterator<Item = F>,
    F: AsRef<str>,
{
    let mut writer = CsvWriter::with_config(Vec::new(), config)?;
    for row in rows {
        writer.write_row(row)?;
    }
    let bytes = writer.into_inner()?;
    // 写入端只写出 &str，结果一定是合法 UTF-8
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
