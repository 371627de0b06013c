//! fastcsv-log - 显式传递的结构化日志
//!
//! 读写组件不依赖全局 logger：每个组件都提供 `new(..)`（使用 noop logger）
//! 和 `with_logger(.., Arc<Logger>)` 两种构造方式。
//!
//! - **显式传递**：无全局状态，配置通过代码传入
//! - **惰性格式化**：级别未启用时不会格式化消息
//! - **可观测**：`LogRingBuffer` 保留最近 N 条记录，测试可直接断言日志内容
//!
//! # 快速开始
//!
//! ```
//! use fastcsv_log::{debug, LogConfig, Level};
//!
//! let (logger, ring) = LogConfig::new(Level::Debug).with_ring_buffer(100).init();
//! debug!(logger, "reader created");
//! assert_eq!(ring.unwrap().len(), 1);
//! ```

mod config;
mod logger;
mod macros;
mod record;
mod ring_buffer;

pub use config::{LogConfig, OutputConfig};
pub use logger::{LogSink, Logger, StderrSink, StdoutSink};
pub use record::{Level, ParseLevelError, Record};
pub use ring_buffer::{LogRingBuffer, RingBufferStats};

// 宏通过 #[macro_export] 导出到 crate 根：
// trace!, debug!, info!, warn!, error!, log!
