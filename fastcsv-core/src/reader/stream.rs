//! 字符流
//!
//! 从任意 `std::io::Read` 按块拉取字节，增量解码 UTF-8，
//! 对外只提供一个字符的预读（`try_peek`）。

use std::io::{ErrorKind, Read};
use std::sync::Arc;

use fastcsv_log::{trace, warn, Logger};

/// 默认读取块大小
pub const DEFAULT_CAPACITY: usize = 8192;

/// 一个 UTF-8 字符最多 4 字节，缓冲区不能更小
const MIN_CAPACITY: usize = 4;

/// 字符流错误
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("invalid UTF-8 sequence at byte offset {0}")]
    Utf8Error(usize),

    #[error("truncated UTF-8 sequence at byte offset {0}")]
    TruncatedUtf8(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 字符流
///
/// 缓冲区 `buffer[start..end]` 是已读取但未消费的字节。
pub struct CharStream<R> {
    reader: R,
    buffer: Vec<u8>,
    start: usize,
    end: usize,
    /// 底层 reader 已返回 0
    exhausted: bool,
    /// 已消费的字节数
    byte_offset: usize,
    /// 预读缓存：(字符, UTF-8 长度)
    peeked: Option<(char, usize)>,
    logger: Arc<Logger>,
}

impl<R: Read> CharStream<R> {
    pub fn new(reader: R) -> Self {
        Self::with_logger(reader, DEFAULT_CAPACITY, Logger::noop())
    }

    /// 指定块大小并带 logger
    pub fn with_logger(reader: R, capacity: usize, logger: Arc<Logger>) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        trace!(logger, "Creating char stream with capacity {}", capacity);
        Self {
            reader,
            buffer: vec![0; capacity],
            start: 0,
            end: 0,
            exhausted: false,
            byte_offset: 0,
            peeked: None,
            logger,
        }
    }

    /// 已消费的字节数
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// 预读当前字符（不消费）
    ///
    /// `Ok(None)` 表示流已结束。
    pub fn try_peek(&mut self) -> Result<Option<char>, StreamError> {
        if let Some((c, _)) = self.peeked {
            return Ok(Some(c));
        }
        if !self.fill(1)? {
            return Ok(None);
        }

        let lead_byte = self.buffer[self.start];
        if lead_byte.is_ascii() {
            self.peeked = Some((lead_byte as char, 1));
            return Ok(Some(lead_byte as char));
        }

        let seq_len = match utf8_sequence_length(lead_byte) {
            Some(len) => len,
            None => {
                warn!(
                    self.logger,
                    "Invalid UTF-8 lead byte 0x{:02X} at byte offset {}", lead_byte, self.byte_offset
                );
                return Err(StreamError::Utf8Error(self.byte_offset));
            }
        };

        if !self.fill(seq_len)? {
            warn!(
                self.logger,
                "Incomplete UTF-8 sequence at EOF: expected {} bytes, got {}",
                seq_len,
                self.end - self.start
            );
            return Err(StreamError::TruncatedUtf8(self.byte_offset));
        }

        let bytes = &self.buffer[self.start..self.start + seq_len];
        match std::str::from_utf8(bytes).ok().and_then(|s| s.chars().next()) {
            Some(c) => {
                self.peeked = Some((c, seq_len));
                Ok(Some(c))
            }
            None => {
                warn!(
                    self.logger,
                    "UTF-8 decode error for bytes {:02X?} at byte offset {}", bytes, self.byte_offset
                );
                Err(StreamError::Utf8Error(self.byte_offset))
            }
        }
    }

    /// 读取并消费一个字符
    pub fn try_advance(&mut self) -> Result<Option<char>, StreamError> {
        let c = self.try_peek()?;
        if let Some((_, len)) = self.peeked.take() {
            self.start += len;
            self.byte_offset += len;
        }
        Ok(c)
    }

    /// 当前字符匹配时消费它
    pub fn match_char(&mut self, expected: char) -> Result<bool, StreamError> {
        if self.try_peek()? == Some(expected) {
            self.try_advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// 保证缓冲区里至少有 `needed` 个未消费字节
    ///
    /// 返回 false 表示底层 reader 已耗尽且字节不足。
    fn fill(&mut self, needed: usize) -> Result<bool, StreamError> {
        while self.end - self.start < needed {
            if self.exhausted {
                return Ok(false);
            }
            if self.start > 0 {
                self.buffer.copy_within(self.start..self.end, 0);
                self.end -= self.start;
                self.start = 0;
            }

            let read = loop {
                match self.reader.read(&mut self.buffer[self.end..]) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => {
                        warn!(self.logger, "Read failed at byte offset {}: {}", self.byte_offset, e);
                        return Err(e.into());
                    }
                }
            };

            if read == 0 {
                trace!(self.logger, "Source exhausted after {} bytes", self.byte_offset + self.end);
                self.exhausted = true;
            } else {
                self.end += read;
            }
        }
        Ok(true)
    }
}

/// 获取UTF-8序列长度
fn utf8_sequence_length(lead_byte: u8) -> Option<usize> {
    match lead_byte {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        // 续字节、过长编码首字节或超出 Unicode 范围
        _ => None,
    }
}
