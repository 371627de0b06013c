//! 行分词器
//!
//! 单遍字符状态机：每次调用 [`RowTokenizer::next_row`] 从字符流中切出一条逻辑记录。
//! 只使用一个字符的预读，栈深度与字段/行长度无关。
//!
//! 状态（每个字段开始时重置为 `FieldStart`）：
//!
//! ```text
//! FieldStart --quote--> Quoted --quote(非双写)--> AfterQuote
//!     |                   ^  |
//!     +--其它--> Unquoted  +--双写 quote 输出一个 quote
//! ```
//!
//! `\r\n`、单独的 `\r`、单独的 `\n` 都视为一个行终止符。

use std::io::Read;
use std::mem;
use std::sync::Arc;

use fastcsv_config::{CommentStrategy, ReadConfig};
use fastcsv_log::{debug, trace, warn, Logger};

use super::row::CsvRow;
use super::stream::{CharStream, StreamError, DEFAULT_CAPACITY};
use crate::error::CsvError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    /// 结束引号之后，等待分隔符或行尾
    AfterQuote,
}

/// 行分词器
pub struct RowTokenizer<R> {
    stream: CharStream<R>,
    config: ReadConfig,
    /// 下一个字符所在的物理行（1-based）
    line: u64,
    logger: Arc<Logger>,
}

impl<R: Read> RowTokenizer<R> {
    /// 配置须事先校验（见 [`ReadConfig::validate`]）
    pub fn new(reader: R, config: ReadConfig) -> Self {
        Self::with_logger(reader, config, Logger::noop())
    }

    pub fn with_logger(reader: R, config: ReadConfig, logger: Arc<Logger>) -> Self {
        let stream = CharStream::with_logger(reader, DEFAULT_CAPACITY, logger.clone());
        Self::from_stream(stream, config, logger)
    }

    pub fn from_stream(stream: CharStream<R>, config: ReadConfig, logger: Arc<Logger>) -> Self {
        trace!(
            logger,
            "Creating row tokenizer: separator={:?}, quote={:?}, comments={:?}",
            config.dialect.field_separator,
            config.dialect.quote_character,
            config.comment_strategy
        );
        Self {
            stream,
            config,
            line: 1,
            logger,
        }
    }

    pub fn config(&self) -> &ReadConfig {
        &self.config
    }

    /// 下一条记录将从这一物理行开始
    pub fn line(&self) -> u64 {
        self.line
    }

    /// 读取下一条记录
    ///
    /// `Ok(None)` 表示输入结束。
    pub fn next_row(&mut self) -> Result<Option<CsvRow>, CsvError> {
        loop {
            let start_line = self.line;
            let Some(first) = self.peek()? else {
                trace!(self.logger, "Reached end of input at line {}", start_line);
                return Ok(None);
            };

            if self.config.comment_strategy != CommentStrategy::None
                && first == self.config.dialect.comment_character
            {
                self.advance()?;
                let text = self.read_comment()?;
                if self.config.comment_strategy == CommentStrategy::Skip {
                    trace!(self.logger, "Skipped comment at line {}", start_line);
                    continue;
                }
                debug!(self.logger, "Produced comment row at line {}", start_line);
                return Ok(Some(CsvRow::comment(start_line, text)));
            }

            if first == '\r' || first == '\n' {
                self.advance()?;
                self.end_line(first)?;
                if self.config.skip_empty_rows {
                    trace!(self.logger, "Skipped empty line {}", start_line);
                    continue;
                }
                debug!(self.logger, "Produced empty row at line {}", start_line);
                return Ok(Some(CsvRow::empty(start_line)));
            }

            let fields = self.read_fields(start_line)?;
            debug!(
                self.logger,
                "Produced row: line={}, fields={}",
                start_line,
                fields.len()
            );
            return Ok(Some(CsvRow::new(start_line, fields)));
        }
    }

    /// 状态机主循环：读到行终止符或输入结束
    fn read_fields(&mut self, start_line: u64) -> Result<Vec<String>, CsvError> {
        let separator = self.config.dialect.field_separator;
        let quote = self.config.dialect.quote_character;

        let mut fields = Vec::new();
        let mut field = String::new();
        let mut state = State::FieldStart;

        loop {
            let Some(c) = self.advance()? else {
                if state == State::Quoted {
                    warn!(
                        self.logger,
                        "Unterminated quoted field in row starting at line {}; keeping text up to end of input",
                        start_line
                    );
                }
                fields.push(field);
                return Ok(fields);
            };

            match state {
                State::FieldStart | State::Unquoted | State::AfterQuote if c == separator => {
                    fields.push(mem::take(&mut field));
                    state = State::FieldStart;
                }
                State::FieldStart | State::Unquoted | State::AfterQuote
                    if c == '\r' || c == '\n' =>
                {
                    self.end_line(c)?;
                    fields.push(field);
                    return Ok(fields);
                }
                State::FieldStart if c == quote => state = State::Quoted,
                State::FieldStart | State::Unquoted => {
                    // 非引号字段中的 quote 按字面内容处理
                    self.push(&mut field, c)?;
                    state = State::Unquoted;
                }
                State::AfterQuote => {
                    // 宽松：结束引号后的多余字符追加到字段
                    self.push(&mut field, c)?;
                }
                State::Quoted => {
                    if c == quote {
                        if self.match_char(quote)? {
                            self.push(&mut field, quote)?;
                        } else {
                            state = State::AfterQuote;
                        }
                    } else {
                        self.push(&mut field, c)?;
                        if c == '\r' {
                            if self.match_char('\n')? {
                                self.push(&mut field, '\n')?;
                            }
                            self.line += 1;
                        } else if c == '\n' {
                            self.line += 1;
                        }
                    }
                }
            }
        }
    }

    /// 注释标记之后到行尾的文本
    fn read_comment(&mut self) -> Result<String, CsvError> {
        let mut text = String::new();
        while let Some(c) = self.advance()? {
            if c == '\r' || c == '\n' {
                self.end_line(c)?;
                break;
            }
            self.push(&mut text, c)?;
        }
        Ok(text)
    }

    /// 已消费行终止符的第一个字符 `c`
    fn end_line(&mut self, c: char) -> Result<(), CsvError> {
        if c == '\r' {
            self.match_char('\n')?;
        }
        self.line += 1;
        Ok(())
    }

    fn push(&self, field: &mut String, c: char) -> Result<(), CsvError> {
        if field.len() + c.len_utf8() > self.config.max_field_size {
            warn!(
                self.logger,
                "Field exceeds {} bytes at line {}", self.config.max_field_size, self.line
            );
            return Err(CsvError::MalformedInput {
                line: self.line,
                message: format!(
                    "field exceeds the maximum size of {} bytes",
                    self.config.max_field_size
                ),
            });
        }
        field.push(c);
        Ok(())
    }

    fn peek(&mut self) -> Result<Option<char>, CsvError> {
        match self.stream.try_peek() {
            Ok(c) => Ok(c),
            Err(e) => Err(self.stream_error(e)),
        }
    }

    fn advance(&mut self) -> Result<Option<char>, CsvError> {
        match self.stream.try_advance() {
            Ok(c) => Ok(c),
            Err(e) => Err(self.stream_error(e)),
        }
    }

    fn match_char(&mut self, expected: char) -> Result<bool, CsvError> {
        match self.stream.match_char(expected) {
            Ok(matched) => Ok(matched),
            Err(e) => Err(self.stream_error(e)),
        }
    }

    fn stream_error(&self, e: StreamError) -> CsvError {
        match e {
            StreamError::Io(io) => CsvError::Io(io),
            other => CsvError::MalformedInput {
                line: self.line,
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastcsv_log::{Level, LogRingBuffer};

    fn tokenize_with(input: &str, config: ReadConfig) -> Vec<CsvRow> {
        let mut tokenizer = RowTokenizer::new(input.as_bytes(), config);
        let mut rows = Vec::new();
        while let Some(row) = tokenizer.next_row().unwrap() {
            rows.push(row);
        }
        rows
    }

    fn tokenize(input: &str) -> Vec<Vec<String>> {
        tokenize_with(input, ReadConfig::default())
            .into_iter()
            .map(CsvRow::into_fields)
            .collect()
    }

    #[test]
    fn test_simple_rows() {
        assert_eq!(
            tokenize("a,b,c\nd,e,f\n"),
            vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]
        );
    }

    #[test]
    fn test_no_trailing_terminator() {
        assert_eq!(tokenize("a,b"), vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(tokenize(",a,,\n"), vec![vec!["", "a", "", ""]]);
        assert_eq!(tokenize("x,"), vec![vec!["x", ""]]);
    }

    #[test]
    fn test_quoted_field_with_separator_and_newline() {
        assert_eq!(
            tokenize("\"a,b\",\"c\r\nd\"\n"),
            vec![vec!["a,b", "c\r\nd"]]
        );
    }

    #[test]
    fn test_doubled_quote_escape() {
        assert_eq!(tokenize(r#""say ""hi""",x"#), vec![vec![r#"say "hi""#, "x"]]);
        assert_eq!(tokenize(r#""""""#), vec![vec![r#""""#]]);
        assert_eq!(tokenize(r#""",b"#), vec![vec!["", "b"]]);
    }

    #[test]
    fn test_quote_inside_unquoted_field_is_literal() {
        assert_eq!(tokenize("ab\"c,d\n"), vec![vec!["ab\"c", "d"]]);
    }

    #[test]
    fn test_text_after_closing_quote_is_kept() {
        assert_eq!(tokenize("\"ab\"cd,e\n"), vec![vec!["abcd", "e"]]);
    }

    #[test]
    fn test_unterminated_quote_is_lenient() {
        let ring = LogRingBuffer::new(100);
        let logger = Logger::new(Level::Warn).with_sink(ring.clone());
        let mut tokenizer =
            RowTokenizer::with_logger("a,\"open\nstill open".as_bytes(), ReadConfig::default(), logger);

        let row = tokenizer.next_row().unwrap().unwrap();
        assert_eq!(row.fields(), &["a", "open\nstill open"]);
        assert!(tokenizer.next_row().unwrap().is_none());

        let records = ring.dump_records();
        assert!(records
            .iter()
            .any(|r| r.level == Level::Warn && r.message.contains("Unterminated quoted field")));
    }

    #[test]
    fn test_line_terminator_variants() {
        let expected = vec![vec!["a", "b"], vec!["c", "d"], vec!["e", "f"]];
        assert_eq!(tokenize("a,b\nc,d\ne,f"), expected);
        assert_eq!(tokenize("a,b\rc,d\re,f"), expected);
        assert_eq!(tokenize("a,b\r\nc,d\r\ne,f"), expected);
        assert_eq!(tokenize("a,b\r\nc,d\re,f\n"), expected);
    }

    #[test]
    fn test_original_line_numbers() {
        let rows = tokenize_with(
            "h1,h2\r\n\"multi\nline\r\nfield\",x\nlast,y\r",
            ReadConfig::default(),
        );
        let lines: Vec<u64> = rows.iter().map(CsvRow::original_line_number).collect();
        assert_eq!(lines, vec![1, 2, 5]);
    }

    #[test]
    fn test_empty_rows_skipped_by_default_but_counted() {
        let rows = tokenize_with("a\n\n\nb\n", ReadConfig::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].original_line_number(), 4);
    }

    #[test]
    fn test_empty_rows_returned() {
        let config = ReadConfig::default().with_skip_empty_rows(false);
        let rows = tokenize_with("a\r\n\r\nb", config);
        assert_eq!(rows.len(), 3);
        assert!(rows[1].is_empty());
        assert_eq!(rows[1].fields(), &[""]);
        assert_eq!(rows[1].original_line_number(), 2);
    }

    #[test]
    fn test_whitespace_line_is_not_empty() {
        let config = ReadConfig::default().with_skip_empty_rows(false);
        let rows = tokenize_with(" \n", config);
        assert!(!rows[0].is_empty());
        assert_eq!(rows[0].fields(), &[" "]);
    }

    #[test]
    fn test_comment_strategies() {
        let input = "#note,1\na,b\n";

        let rows = tokenize_with(input, ReadConfig::default());
        assert_eq!(rows[0].fields(), &["#note", "1"]);
        assert!(!rows[0].is_comment());

        let config = ReadConfig::default().with_comment_strategy(CommentStrategy::Read);
        let rows = tokenize_with(input, config);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_comment());
        assert_eq!(rows[0].fields(), &["note,1"]);
        assert_eq!(rows[1].original_line_number(), 2);

        let config = ReadConfig::default().with_comment_strategy(CommentStrategy::Skip);
        let rows = tokenize_with(input, config);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fields(), &["a", "b"]);
        assert_eq!(rows[0].original_line_number(), 2);
    }

    #[test]
    fn test_comment_marker_only_at_row_start() {
        let config = ReadConfig::default().with_comment_strategy(CommentStrategy::Skip);
        let rows = tokenize_with("a,#b\n\"x\n#y\"\n", config);
        assert_eq!(rows[0].fields(), &["a", "#b"]);
        assert_eq!(rows[1].fields(), &["x\n#y"]);
    }

    #[test]
    fn test_custom_dialect() {
        let config = ReadConfig::default()
            .with_field_separator(';')
            .with_quote_character('\'');
        let rows = tokenize_with("'a;b';'it''s'\n", config);
        assert_eq!(rows[0].fields(), &["a;b", "it's"]);
    }

    #[test]
    fn test_max_field_size() {
        let config = ReadConfig::default().with_max_field_size(4);
        let mut tokenizer = RowTokenizer::new("ok,1234\nx\n\"12345".as_bytes(), config);
        assert_eq!(tokenizer.next_row().unwrap().unwrap().fields(), &["ok", "1234"]);
        assert_eq!(tokenizer.next_row().unwrap().unwrap().fields(), &["x"]);

        let err = tokenizer.next_row().unwrap_err();
        assert!(matches!(err, CsvError::MalformedInput { line: 3, .. }));
    }

    #[test]
    fn test_invalid_utf8_reports_line() {
        let mut input = b"a\nb".to_vec();
        input.push(0xFF);
        let mut tokenizer = RowTokenizer::new(&input[..], ReadConfig::default());
        tokenizer.next_row().unwrap();
        let err = tokenizer.next_row().unwrap_err();
        assert!(matches!(err, CsvError::MalformedInput { line: 2, .. }));
    }

    #[test]
    fn test_tokenizer_logs_rows() {
        let ring = LogRingBuffer::new(100);
        let logger = Logger::new(Level::Trace).with_sink(ring.clone());

        let mut tokenizer = RowTokenizer::with_logger("a,b\n".as_bytes(), ReadConfig::default(), logger);
        let records = ring.dump_records();
        assert!(records.iter().any(|r| r.message.contains("Creating row tokenizer")));

        ring.clear();
        tokenizer.next_row().unwrap();
        let records = ring.dump_records();
        assert!(records
            .iter()
            .any(|r| r.level == Level::Debug && r.message.contains("Produced row: line=1, fields=2")));
    }
}
