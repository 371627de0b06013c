//! FastCSV Config - Pure dialect data structures
//!
//! This crate contains only data structures and their validation, no IO or global state.
//! It serves as the shared configuration vocabulary for the reader and the writer.

use serde::{Deserialize, Serialize};

/// Default upper bound of a single field (16 MiB)
pub const DEFAULT_MAX_FIELD_SIZE: usize = 16 * 1024 * 1024;

/// How comment lines are treated by the reader
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStrategy {
    /// The comment character is ordinary content
    #[default]
    None,
    /// Comment rows are returned, flagged as comments
    Read,
    /// Comment rows are consumed and dropped
    Skip,
}

/// When the writer wraps a field in quotes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStrategy {
    /// Only when the field contains a control character
    #[default]
    Required,
    /// Like `Required`, and also for empty fields
    Empty,
    /// Every field
    Always,
}

/// Line delimiter emitted after each written row
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDelimiter {
    Lf,
    Cr,
    #[default]
    CrLf,
    /// The delimiter of the current platform
    Platform,
}

impl LineDelimiter {
    /// Get the delimiter text
    pub fn as_str(&self) -> &'static str {
        match self {
            LineDelimiter::Lf => "\n",
            LineDelimiter::Cr => "\r",
            LineDelimiter::CrLf => "\r\n",
            LineDelimiter::Platform => {
                if cfg!(windows) {
                    "\r\n"
                } else {
                    "\n"
                }
            }
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A control character is a line break
    #[error("{role} must not be a newline character")]
    NewlineControl { role: &'static str },

    /// Two control characters are the same
    #[error("{first} and {second} must differ (both are {ch:?})")]
    DuplicateControl {
        first: &'static str,
        second: &'static str,
        ch: char,
    },

    /// `max_field_size` is zero
    #[error("max_field_size must be greater than zero")]
    ZeroFieldSize,

    /// A configuration document could not be parsed
    #[error("cannot parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The syntactic conventions of one CSV variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialect {
    /// Field separator
    pub field_separator: char,
    /// Quote character
    pub quote_character: char,
    /// Comment marker (first character of a comment line)
    pub comment_character: char,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            field_separator: ',',
            quote_character: '"',
            comment_character: '#',
        }
    }
}

impl Dialect {
    /// Check that the control characters can be told apart
    pub fn validate(&self) -> Result<(), ConfigError> {
        let controls = [
            ("field_separator", self.field_separator),
            ("quote_character", self.quote_character),
            ("comment_character", self.comment_character),
        ];

        for (role, ch) in controls {
            if ch == '\r' || ch == '\n' {
                return Err(ConfigError::NewlineControl { role });
            }
        }

        for (i, (first, a)) in controls.iter().enumerate() {
            for (second, b) in &controls[i + 1..] {
                if a == b {
                    return Err(ConfigError::DuplicateControl {
                        first: *first,
                        second: *second,
                        ch: *a,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Reader configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadConfig {
    #[serde(flatten)]
    pub dialect: Dialect,
    pub comment_strategy: CommentStrategy,
    /// Drop blank physical lines instead of returning empty rows
    pub skip_empty_rows: bool,
    /// Fail when a row's field count differs from the first row's
    pub error_on_different_field_count: bool,
    /// Maximum size of a single field in bytes
    pub max_field_size: usize,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            comment_strategy: CommentStrategy::None,
            skip_empty_rows: true,
            error_on_different_field_count: false,
            max_field_size: DEFAULT_MAX_FIELD_SIZE,
        }
    }
}

impl ReadConfig {
    pub fn with_field_separator(mut self, separator: char) -> Self {
        self.dialect.field_separator = separator;
        self
    }

    pub fn with_quote_character(mut self, quote: char) -> Self {
        self.dialect.quote_character = quote;
        self
    }

    pub fn with_comment_character(mut self, comment: char) -> Self {
        self.dialect.comment_character = comment;
        self
    }

    pub fn with_comment_strategy(mut self, strategy: CommentStrategy) -> Self {
        self.comment_strategy = strategy;
        self
    }

    pub fn with_skip_empty_rows(mut self, skip: bool) -> Self {
        self.skip_empty_rows = skip;
        self
    }

    pub fn with_error_on_different_field_count(mut self, strict: bool) -> Self {
        self.error_on_different_field_count = strict;
        self
    }

    pub fn with_max_field_size(mut self, size: usize) -> Self {
        self.max_field_size = size;
        self
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dialect.validate()?;
        if self.max_field_size == 0 {
            return Err(ConfigError::ZeroFieldSize);
        }
        Ok(())
    }

    /// Load from a JSON document; absent keys keep their defaults
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: ReadConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
}

/// Writer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteConfig {
    #[serde(flatten)]
    pub dialect: Dialect,
    pub quote_strategy: QuoteStrategy,
    pub line_delimiter: LineDelimiter,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            quote_strategy: QuoteStrategy::Required,
            line_delimiter: LineDelimiter::CrLf,
        }
    }
}

impl WriteConfig {
    pub fn with_field_separator(mut self, separator: char) -> Self {
        self.dialect.field_separator = separator;
        self
    }

    pub fn with_quote_character(mut self, quote: char) -> Self {
        self.dialect.quote_character = quote;
        self
    }

    pub fn with_comment_character(mut self, comment: char) -> Self {
        self.dialect.comment_character = comment;
        self
    }

    pub fn with_quote_strategy(mut self, strategy: QuoteStrategy) -> Self {
        self.quote_strategy = strategy;
        self
    }

    pub fn with_line_delimiter(mut self, delimiter: LineDelimiter) -> Self {
        self.line_delimiter = delimiter;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dialect.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_read_config() {
        let cfg = ReadConfig::default();
        assert_eq!(cfg.dialect.field_separator, ',');
        assert_eq!(cfg.dialect.quote_character, '"');
        assert_eq!(cfg.dialect.comment_character, '#');
        assert_eq!(cfg.comment_strategy, CommentStrategy::None);
        assert!(cfg.skip_empty_rows);
        assert!(!cfg.error_on_different_field_count);
        assert_eq!(cfg.max_field_size, DEFAULT_MAX_FIELD_SIZE);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_default_write_config() {
        let cfg = WriteConfig::default();
        assert_eq!(cfg.quote_strategy, QuoteStrategy::Required);
        assert_eq!(cfg.line_delimiter.as_str(), "\r\n");
    }

    #[test]
    fn test_builder_chain() {
        let cfg = ReadConfig::default()
            .with_field_separator(';')
            .with_comment_strategy(CommentStrategy::Skip)
            .with_skip_empty_rows(false);
        assert_eq!(cfg.dialect.field_separator, ';');
        assert_eq!(cfg.comment_strategy, CommentStrategy::Skip);
        assert!(!cfg.skip_empty_rows);
    }

    #[test]
    fn test_newline_control_rejected() {
        let cfg = ReadConfig::default().with_field_separator('\n');
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NewlineControl {
                role: "field_separator"
            })
        ));
    }

    #[test]
    fn test_duplicate_control_rejected() {
        let cfg = WriteConfig::default().with_quote_character(',');
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateControl { ch: ',', .. }));
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn test_zero_field_size_rejected() {
        let cfg = ReadConfig::default().with_max_field_size(0);
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroFieldSize)));
    }

    #[test]
    fn test_from_json_partial() {
        let cfg = ReadConfig::from_json(
            r#"{ "field_separator": ";", "comment_strategy": "read", "skip_empty_rows": false }"#,
        )
        .unwrap();
        assert_eq!(cfg.dialect.field_separator, ';');
        assert_eq!(cfg.dialect.quote_character, '"');
        assert_eq!(cfg.comment_strategy, CommentStrategy::Read);
        assert!(!cfg.skip_empty_rows);
    }

    #[test]
    fn test_from_json_invalid() {
        let err = ReadConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("cannot parse configuration"));
        // The serde_json error is kept as the source
        assert!(std::error::Error::source(&err).is_some());
        assert!(matches!(
            ReadConfig::from_json(r##"{ "quote_character": "#" }"##),
            Err(ConfigError::DuplicateControl { .. })
        ));
    }

    #[test]
    fn test_line_delimiter_as_str() {
        assert_eq!(LineDelimiter::Lf.as_str(), "\n");
        assert_eq!(LineDelimiter::Cr.as_str(), "\r");
        assert_eq!(LineDelimiter::CrLf.as_str(), "\r\n");
    }
}
