//! CLI 配置
//!
//! 包含 CLI 特有的日志配置：全局级别和读/写两端的单独级别

use tracing::Level;

/// 读取端日志的 tracing target
pub const READER_TARGET: &str = "fastcsv::reader";
/// 写入端日志的 tracing target
pub const WRITER_TARGET: &str = "fastcsv::writer";
/// CLI 自身及其它组件的 tracing target
pub const CLI_TARGET: &str = "fastcsv::cli";

/// CLI 日志配置
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub global: Level,
    pub reader: Option<Level>,
    pub writer: Option<Level>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: Level::WARN,
            reader: None,
            writer: None,
        }
    }
}

impl LogConfig {
    /// Get log level for a specific target
    pub fn level_for(&self, target: &str) -> Level {
        match target {
            READER_TARGET => self.reader.unwrap_or(self.global),
            WRITER_TARGET => self.writer.unwrap_or(self.global),
            _ => self.global,
        }
    }

    /// 所有 target 中最详细的级别
    ///
    /// 组件 logger 按这个级别过滤，精确的按 target 过滤交给 tracing。
    pub fn most_verbose(&self) -> Level {
        [self.global, self.level_for(READER_TARGET), self.level_for(WRITER_TARGET)]
            .into_iter()
            .max()
            .unwrap_or(self.global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_falls_back_to_global() {
        let config = LogConfig {
            global: Level::INFO,
            reader: Some(Level::TRACE),
            writer: None,
        };
        assert_eq!(config.level_for(READER_TARGET), Level::TRACE);
        assert_eq!(config.level_for(WRITER_TARGET), Level::INFO);
        assert_eq!(config.level_for(CLI_TARGET), Level::INFO);
    }

    #[test]
    fn test_most_verbose() {
        let config = LogConfig {
            writer: Some(Level::DEBUG),
            ..LogConfig::default()
        };
        assert_eq!(config.most_verbose(), Level::DEBUG);
        assert_eq!(LogConfig::default().most_verbose(), Level::WARN);
    }
}
