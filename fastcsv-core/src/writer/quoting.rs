//! 字段引号规则

use fastcsv_config::{Dialect, QuoteStrategy};

/// 字段是否需要包在引号中
///
/// `first_in_row` 为真时，以注释字符开头的字段也要加引号，
/// 否则开启注释的读取器会把整行当作注释。
pub fn needs_quotes(
    field: &str,
    dialect: &Dialect,
    strategy: QuoteStrategy,
    first_in_row: bool,
) -> bool {
    match strategy {
        QuoteStrategy::Always => return true,
        QuoteStrategy::Empty if field.is_empty() => return true,
        _ => {}
    }

    if first_in_row && field.starts_with(dialect.comment_character) {
        return true;
    }

    field.chars().any(|c| {
        c == dialect.field_separator || c == dialect.quote_character || c == '\r' || c == '\n'
    })
}

/// 写出带引号的字段，内部的引号双写
pub fn write_quoted(out: &mut String, field: &str, quote: char) {
    out.push(quote);
    for c in field.chars() {
        if c == quote {
            out.push(quote);
        }
        out.push(c);
    }
    out.push(quote);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(field: &str) -> bool {
        needs_quotes(field, &Dialect::default(), QuoteStrategy::Required, false)
    }

    #[test]
    fn test_required_strategy() {
        assert!(!required("plain"));
        assert!(!required(""));
        assert!(required("a,b"));
        assert!(required("say \"hi\""));
        assert!(required("line\nbreak"));
        assert!(required("cr\r"));
    }

    #[test]
    fn test_empty_and_always_strategies() {
        let dialect = Dialect::default();
        assert!(needs_quotes("", &dialect, QuoteStrategy::Empty, false));
        assert!(!needs_quotes("x", &dialect, QuoteStrategy::Empty, false));
        assert!(needs_quotes("x", &dialect, QuoteStrategy::Always, false));
    }

    #[test]
    fn test_comment_character_at_row_start() {
        let dialect = Dialect::default();
        assert!(needs_quotes("#tag", &dialect, QuoteStrategy::Required, true));
        assert!(!needs_quotes("#tag", &dialect, QuoteStrategy::Required, false));
    }

    #[test]
    fn test_write_quoted_doubles_quotes() {
        let mut out = String::new();
        write_quoted(&mut out, r#"a"b""#, '"');
        assert_eq!(out, r#""a""b""""#);

        out.clear();
        write_quoted(&mut out, "it's", '\'');
        assert_eq!(out, "'it''s'");
    }
}
