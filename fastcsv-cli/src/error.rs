//! CLI 错误类型

use fastcsv_core::CsvError;
use thiserror::Error;

/// CLI 错误
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// 出错的物理行号（如果有）
    pub fn line(&self) -> Option<u64> {
        match self {
            CliError::Csv(e) => e.line(),
            _ => None,
        }
    }

    /// 错误类别的短名称
    pub fn kind_name(&self) -> &'static str {
        match self {
            CliError::Csv(e) => e.kind_name(),
            CliError::Json(_) => "json",
            CliError::Io(_) => "io",
        }
    }
}
