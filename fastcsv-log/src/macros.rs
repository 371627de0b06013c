//! 日志宏
//!
//! 所有宏的第一个参数是显式传入的 logger（`Arc<Logger>` 或其引用），
//! 之后是 `format!` 风格的参数。级别未启用时消息不会被格式化，
//! 所以在分词器的逐字段热路径里调用 `trace!` 也不会产生分配。
//!
//! ```
//! use fastcsv_log::{Level, LogRingBuffer, Logger};
//!
//! let ring = LogRingBuffer::new(16);
//! let logger = Logger::new(Level::Debug).with_sink(ring.clone());
//!
//! fastcsv_log::trace!(logger, "field {} of row {}", 2, 7);
//! fastcsv_log::warn!(logger, "unterminated quote at line {}", 7);
//!
//! let records = ring.dump_records();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].message, "unterminated quote at line 7");
//! ```

/// 逐字段、逐字符的分词细节
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log!($logger, $crate::Level::Trace, $($arg)*)
    };
}

/// 每行一次的事件，如读出或写入一行
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)*)
    };
}

/// 读写器生命周期事件，如表头解析完成、flush
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)*)
    };
}

/// 宽松模式下被容忍的格式问题，如未闭合的引号、重复列名
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)*)
    };
}

/// 即将作为 `CsvError` 返回给调用方的错误
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)*)
    };
}

/// 按级别记录；target 取调用处的 `module_path!()`
///
/// CLI 的 `TracingSink` 依据这个 target 把记录分到 reader / writer 通道。
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)*) => {{
        let logger = &$logger;
        if logger.is_enabled($level) {
            logger.log($level, module_path!(), ::std::format!($($arg)*));
        }
    }};
}
