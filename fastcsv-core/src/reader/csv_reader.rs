//! 按索引访问的行迭代器

use std::io::Read;
use std::sync::Arc;

use fastcsv_config::ReadConfig;
use fastcsv_log::{debug, warn, Logger};

use super::row::CsvRow;
use super::tokenizer::RowTokenizer;
use crate::error::CsvError;

/// CSV 读取器
///
/// 逐行产出 [`CsvRow`]。任一错误之后读取器进入终止状态，后续调用只返回 `None`。
pub struct CsvReader<R> {
    tokenizer: RowTokenizer<R>,
    /// 第一条数据行（非注释、非空行）的字段数
    expected_fields: Option<usize>,
    rows_read: u64,
    failed: bool,
    logger: Arc<Logger>,
}

impl<R: Read> CsvReader<R> {
    /// 使用默认配置
    pub fn new(reader: R) -> Self {
        let logger = Logger::noop();
        Self::build(reader, ReadConfig::default(), logger)
    }

    pub fn with_config(reader: R, config: ReadConfig) -> Result<Self, CsvError> {
        Self::with_logger(reader, config, Logger::noop())
    }

    pub fn with_logger(
        reader: R,
        config: ReadConfig,
        logger: Arc<Logger>,
    ) -> Result<Self, CsvError> {
        if let Err(e) = config.validate() {
            warn!(logger, "Rejected reader configuration: {}", e);
            return Err(e.into());
        }
        Ok(Self::build(reader, config, logger))
    }

    fn build(reader: R, config: ReadConfig, logger: Arc<Logger>) -> Self {
        debug!(
            logger,
            "Creating CSV reader (strict field count: {})", config.error_on_different_field_count
        );
        Self {
            tokenizer: RowTokenizer::with_logger(reader, config, logger.clone()),
            expected_fields: None,
            rows_read: 0,
            failed: false,
            logger,
        }
    }

    pub fn config(&self) -> &ReadConfig {
        self.tokenizer.config()
    }

    /// 已产出的行数（含注释行和空行）
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// 读取下一行；`Ok(None)` 表示输入结束
    pub fn next_row(&mut self) -> Result<Option<CsvRow>, CsvError> {
        if self.failed {
            return Ok(None);
        }
        match self.read_checked() {
            Ok(row) => {
                if row.is_some() {
                    self.rows_read += 1;
                } else {
                    debug!(self.logger, "CSV reader finished after {} rows", self.rows_read);
                }
                Ok(row)
            }
            Err(e) => {
                warn!(self.logger, "CSV reader stopped: {}", e);
                self.failed = true;
                Err(e)
            }
        }
    }

    fn read_checked(&mut self) -> Result<Option<CsvRow>, CsvError> {
        let Some(row) = self.tokenizer.next_row()? else {
            return Ok(None);
        };
        if row.is_comment() || row.is_empty() {
            return Ok(Some(row));
        }

        match self.expected_fields {
            None => self.expected_fields = Some(row.field_count()),
            Some(expected) => {
                if self.config().error_on_different_field_count && row.field_count() != expected {
                    return Err(CsvError::FieldCountMismatch {
                        line: row.original_line_number(),
                        expected,
                        actual: row.field_count(),
                    });
                }
            }
        }
        Ok(Some(row))
    }
}

impl<R: Read> Iterator for CsvReader<R> {
    type Item = Result<CsvRow, CsvError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}
