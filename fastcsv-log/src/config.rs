//! 日志配置
//!
//! 一次性构建 logger 及其输出目标。

use crate::logger::{StderrSink, StdoutSink};
use crate::{Level, LogRingBuffer, Logger};
use std::sync::Arc;

/// 日志输出目标
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputConfig {
    Stdout,
    Stderr,
    /// 环形缓冲区（容量）
    RingBuffer(usize),
}

/// 日志配置
///
/// ```
/// use fastcsv_log::{LogConfig, Level};
///
/// let (logger, ring) = LogConfig::new(Level::Debug).with_ring_buffer(1000).init();
/// assert_eq!(logger.level(), Level::Debug);
/// assert!(ring.is_some());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    pub level: Level,
    pub outputs: Vec<OutputConfig>,
}

impl LogConfig {
    /// 指定级别，无输出
    pub fn new(level: Level) -> Self {
        LogConfig {
            level,
            outputs: Vec::new(),
        }
    }

    /// 开发配置：Debug 级别，stderr + 10000 条环形缓冲区
    ///
    /// CSV 数据走 stdout，日志一律写 stderr。
    pub fn dev() -> Self {
        LogConfig {
            level: Level::Debug,
            outputs: vec![OutputConfig::Stderr, OutputConfig::RingBuffer(10000)],
        }
    }

    /// 生产配置：Warn 级别，stderr + 1000 条环形缓冲区
    pub fn production() -> Self {
        LogConfig {
            level: Level::Warn,
            outputs: vec![OutputConfig::Stderr, OutputConfig::RingBuffer(1000)],
        }
    }

    /// 测试配置（静默）
    pub fn test() -> Self {
        LogConfig::new(Level::Error)
    }

    pub fn with_stdout(mut self) -> Self {
        if !self.outputs.contains(&OutputConfig::Stdout) {
            self.outputs.push(OutputConfig::Stdout);
        }
        self
    }

    pub fn with_stderr(mut self) -> Self {
        if !self.outputs.contains(&OutputConfig::Stderr) {
            self.outputs.push(OutputConfig::Stderr);
        }
        self
    }

    pub fn with_ring_buffer(mut self, capacity: usize) -> Self {
        self.outputs.push(OutputConfig::RingBuffer(capacity));
        self
    }

    /// 初始化日志器
    ///
    /// 返回 (logger, 最后一个环形缓冲区)
    pub fn init(self) -> (Arc<Logger>, Option<Arc<LogRingBuffer>>) {
        let logger = Logger::new(self.level);
        let mut ring_buffer = None;

        for output in self.outputs {
            match output {
                OutputConfig::Stdout => logger.add_sink(StdoutSink),
                OutputConfig::Stderr => logger.add_sink(StderrSink),
                OutputConfig::RingBuffer(capacity) => {
                    let ring = LogRingBuffer::new(capacity);
                    ring_buffer = Some(Arc::clone(&ring));
                    logger.add_sink(ring);
                }
            }
        }

        (logger, ring_buffer)
    }
}
