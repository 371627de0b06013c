//! CLI 日志系统初始化
//!
//! 基于 `tracing-subscriber` 实现按 target 的日志控制。
//! 读写组件使用显式传递的 `fastcsv_log::Logger`，这里通过 [`TracingSink`]
//! 把它们的记录转发为 tracing 事件。日志写到 stderr，stdout 留给数据输出。

use std::io;
use std::str::FromStr;

use fastcsv_log::{Level as LogLevel, LogSink, Record};
use tracing::Level;
use tracing_subscriber::{filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::config::{LogConfig, CLI_TARGET, READER_TARGET, WRITER_TARGET};

/// 日志输出格式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// 彩色格式化（开发使用）
    Pretty,
    /// 紧凑格式
    Compact,
    /// JSON 格式（工具集成）
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!(
                "unknown log format '{other}' (expected pretty, compact or json)"
            )),
        }
    }
}

/// 使用指定格式和日志配置初始化日志系统
pub fn init(log_config: &LogConfig, format: LogFormat) {
    let stderr_layer = create_format_layer(format, io::stderr).with_filter(targets(log_config));
    tracing_subscriber::registry().with(stderr_layer).init();
}

/// Build filter targets
fn targets(log_config: &LogConfig) -> Targets {
    Targets::new()
        .with_default(log_config.global)
        .with_target(READER_TARGET, log_config.level_for(READER_TARGET))
        .with_target(WRITER_TARGET, log_config.level_for(WRITER_TARGET))
        .with_target(CLI_TARGET, log_config.global)
}

/// Create formatter layer based on format
fn create_format_layer<W, F>(format: LogFormat, make_writer: F) -> impl Layer<tracing_subscriber::Registry>
where
    W: io::Write + Send + Sync + 'static,
    F: Fn() -> W + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .without_time()
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
    }
}

/// fastcsv-log 级别对应的 tracing 级别
pub fn to_tracing_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Trace => Level::TRACE,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error => Level::ERROR,
    }
}

/// tracing 级别对应的 fastcsv-log 级别
pub fn from_tracing_level(level: Level) -> LogLevel {
    if level == Level::TRACE {
        LogLevel::Trace
    } else if level == Level::DEBUG {
        LogLevel::Debug
    } else if level == Level::INFO {
        LogLevel::Info
    } else if level == Level::WARN {
        LogLevel::Warn
    } else {
        LogLevel::Error
    }
}

// tracing 的 target 和级别都必须是编译期常量
macro_rules! forward {
    ($target:expr, $record:expr) => {
        match $record.level {
            LogLevel::Trace => {
                tracing::trace!(target: $target, source = $record.target, "{}", $record.message)
            }
            LogLevel::Debug => {
                tracing::debug!(target: $target, source = $record.target, "{}", $record.message)
            }
            LogLevel::Info => {
                tracing::info!(target: $target, source = $record.target, "{}", $record.message)
            }
            LogLevel::Warn => {
                tracing::warn!(target: $target, source = $record.target, "{}", $record.message)
            }
            LogLevel::Error => {
                tracing::error!(target: $target, source = $record.target, "{}", $record.message)
            }
        }
    };
}

/// 把 fastcsv-log 记录转发到 tracing
///
/// 记录按来源模块归到 `fastcsv::reader` / `fastcsv::writer` / `fastcsv::cli`，
/// 原始模块路径保存在 `source` 字段中。
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, record: &Record) {
        if record.target.starts_with("fastcsv_core::reader") {
            forward!("fastcsv::reader", record);
        } else if record.target.starts_with("fastcsv_core::writer") {
            forward!("fastcsv::writer", record);
        } else {
            forward!("fastcsv::cli", record);
        }
    }
}
