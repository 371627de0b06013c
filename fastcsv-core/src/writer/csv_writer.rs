//! CSV 写入器

use std::io::Write;
use std::sync::Arc;

use fastcsv_config::WriteConfig;
use fastcsv_log::{debug, trace, warn, Logger};

use super::quoting::{needs_quotes, write_quoted};
use crate::error::CsvError;

/// CSV 写入器
///
/// 每次调用独立：一行在内存中拼好后直接写入底层 sink，不做跨行校验。
/// 需要缓冲时由调用方包一层 `BufWriter`。
pub struct CsvWriter<W: Write> {
    sink: W,
    config: WriteConfig,
    /// 复用的行缓冲
    buffer: String,
    rows_written: u64,
    logger: Arc<Logger>,
}

impl<W: Write> CsvWriter<W> {
    /// 使用默认配置
    pub fn new(sink: W) -> Self {
        Self::build(sink, WriteConfig::default(), Logger::noop())
    }

    pub fn with_config(sink: W, config: WriteConfig) -> Result<Self, CsvError> {
        Self::with_logger(sink, config, Logger::noop())
    }

    pub fn with_logger(sink: W, config: WriteConfig, logger: Arc<Logger>) -> Result<Self, CsvError> {
        if let Err(e) = config.validate() {
            warn!(logger, "Rejected writer configuration: {}", e);
            return Err(e.into());
        }
        Ok(Self::build(sink, config, logger))
    }

    fn build(sink: W, config: WriteConfig, logger: Arc<Logger>) -> Self {
        debug!(
            logger,
            "Creating CSV writer: separator={:?}, quote strategy={:?}, line delimiter={:?}",
            config.dialect.field_separator,
            config.quote_strategy,
            config.line_delimiter
        );
        Self {
            sink,
            config,
            buffer: String::new(),
            rows_written: 0,
            logger,
        }
    }

    pub fn config(&self) -> &WriteConfig {
        &self.config
    }

    /// 已写出的数据行数（不含注释）
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// 写出一行
    ///
    /// 零个字段只写出行分隔符；单个空字段写成一对引号，读回时不会变成空行。
    pub fn write_row<I>(&mut self, fields: I) -> Result<&mut Self, CsvError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let dialect = &self.config.dialect;
        let strategy = self.config.quote_strategy;
        self.buffer.clear();

        let mut count = 0usize;
        for field in fields {
            let field = field.as_ref();
            if count > 0 {
                self.buffer.push(dialect.field_separator);
            }
            if needs_quotes(field, dialect, strategy, count == 0) {
                write_quoted(&mut self.buffer, field, dialect.quote_character);
            } else {
                self.buffer.push_str(field);
            }
            count += 1;
        }

        if count == 1 && self.buffer.is_empty() {
            write_quoted(&mut self.buffer, "", dialect.quote_character);
        }
        self.buffer.push_str(self.config.line_delimiter.as_str());

        self.sink.write_all(self.buffer.as_bytes())?;
        self.rows_written += 1;
        trace!(
            self.logger,
            "Wrote row {} with {} fields ({} bytes)",
            self.rows_written,
            count,
            self.buffer.len()
        );
        Ok(self)
    }

    /// 写出注释；文本中的每个换行都开始新的注释行
    pub fn write_comment(&mut self, text: &str) -> Result<&mut Self, CsvError> {
        let marker = self.config.dialect.comment_character;
        let delimiter = self.config.line_delimiter.as_str();
        self.buffer.clear();

        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        for line in normalized.split('\n') {
            self.buffer.push(marker);
            self.buffer.push_str(line);
            self.buffer.push_str(delimiter);
        }

        self.sink.write_all(self.buffer.as_bytes())?;
        trace!(self.logger, "Wrote comment ({} bytes)", self.buffer.len());
        Ok(self)
    }

    pub fn flush(&mut self) -> Result<(), CsvError> {
        self.sink.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// 刷新并取回底层 sink
    pub fn into_inner(mut self) -> Result<W, CsvError> {
        self.flush()?;
        debug!(self.logger, "CSV writer finished after {} rows", self.rows_written);
        Ok(self.sink)
    }
}
