//! 读写错误类型
//!
//! 所有错误对当前会话都是不可恢复的：reader 返回错误后即结束迭代。

use fastcsv_config::ConfigError;
use thiserror::Error;

/// CSV 错误
#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// 非法/截断的 UTF-8，或字段超出 `max_field_size`
    #[error("Malformed input at line {line}: {message}")]
    MalformedInput { line: u64, message: String },

    #[error("Row {line} has {actual} fields, but first row had {expected} fields")]
    FieldCountMismatch {
        line: u64,
        expected: usize,
        actual: usize,
    },

    #[error("No element with name '{name}' found. Valid names are: [{}]", .valid.join(", "))]
    UnknownField { name: String, valid: Vec<String> },

    #[error("Index {index} out of range for row with {count} fields")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Row {line} has no field '{name}' (column {index})")]
    MissingField {
        line: u64,
        name: String,
        index: usize,
    },
}

impl CsvError {
    /// 出错的物理行号（如果有）
    pub fn line(&self) -> Option<u64> {
        match self {
            CsvError::MalformedInput { line, .. }
            | CsvError::FieldCountMismatch { line, .. }
            | CsvError::MissingField { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// 错误类别的短名称
    pub fn kind_name(&self) -> &'static str {
        match self {
            CsvError::Io(_) => "io",
            CsvError::Config(_) => "config",
            CsvError::MalformedInput { .. } => "malformed-input",
            CsvError::FieldCountMismatch { .. } => "field-count-mismatch",
            CsvError::UnknownField { .. } => "unknown-field",
            CsvError::IndexOutOfRange { .. } => "index-out-of-range",
            CsvError::MissingField { .. } => "missing-field",
        }
    }
}
