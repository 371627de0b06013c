//! CLI 格式化输出
//!
//! 提供命令行友好的错误显示和源码上下文打印。
//! 上下文只在出错时从文件中重新读取，且只保留错误行附近的几行。

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use crate::error::CliError;

/// 错误行前后显示的上下文行数
const CONTEXT_LINES: u64 = 3;

/// 打印错误；输入是文件且错误带行号时显示源文件上下文
///
/// stdin 无法重新读取，只打印错误本身。
pub fn print_error_with_source(e: &CliError, source: Option<&Path>) {
    eprintln!("❌ [{}] {}", e.kind_name(), e);

    let (Some(error_line), Some(path)) = (e.line(), source) else {
        return;
    };
    let Ok(file) = File::open(path) else {
        return;
    };
    if let Ok(lines) = read_context(BufReader::new(file), error_line) {
        eprint!("{}", format_source_context(&lines, error_line));
    }
}

/// 读取错误行前后 `CONTEXT_LINES` 行
///
/// 按 `\r\n`、`\r`、`\n` 切分物理行，与读取器的行号一致；
/// 读到窗口末尾即停止。
pub fn read_context<R: BufRead>(reader: R, error_line: u64) -> io::Result<Vec<(u64, String)>> {
    let start = error_line.saturating_sub(CONTEXT_LINES).max(1);
    let end = error_line + CONTEXT_LINES;

    let mut lines = Vec::new();
    let mut current = Vec::new();
    let mut line = 1u64;
    let mut bytes = reader.bytes().peekable();

    while let Some(byte) = bytes.next() {
        match byte? {
            b @ (b'\r' | b'\n') => {
                if b == b'\r' && matches!(bytes.peek(), Some(Ok(b'\n'))) {
                    bytes.next();
                }
                if line >= start {
                    lines.push((line, String::from_utf8_lossy(&current).into_owned()));
                }
                current.clear();
                line += 1;
                if line > end {
                    return Ok(lines);
                }
            }
            b if line >= start => current.push(b),
            _ => {}
        }
    }

    if !current.is_empty() && line >= start {
        lines.push((line, String::from_utf8_lossy(&current).into_owned()));
    }
    Ok(lines)
}

/// 格式化上下文，错误行下方用 `^` 标出
///
/// 错误行不在 `lines` 中时返回空字符串。
pub fn format_source_context(lines: &[(u64, String)], error_line: u64) -> String {
    if !lines.iter().any(|(n, _)| *n == error_line) {
        return String::new();
    }

    // 行号的最大宽度用于对齐
    let width = lines.last().map_or(1, |(n, _)| n.to_string().len());
    let separator = "-".repeat(width + 1);

    let mut out = String::new();
    let _ = writeln!(out, "{separator}|--");
    for (line_num, content) in lines {
        let _ = writeln!(out, "{line_num:>width$} | {content}");
        if *line_num == error_line {
            let marker = "^".repeat(content.chars().count().max(1));
            let _ = writeln!(out, "{:width$} | {marker}", "");
        }
    }
    let _ = writeln!(out, "{separator}|--");
    out
}
