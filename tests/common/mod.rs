//! 测试辅助工具
//!
//! 提供跨 crate 集成测试共用的样本数据和 reader

#![allow(dead_code)]

use std::io::Read;

/// 长文本、引号和三种换行的样本字段
pub const TEXTS: [&str; 6] = [
    "Lorem ipsum dolor sit amet",
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor \
     incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud \
     exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat. Duis aute \
     irure dolor in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla \
     pariatur. Excepteur sint occaecat cupidatat non proident, sunt in culpa qui officia \
     deserunt mollit anim id est laborum.",
    "Lorem ipsum \"dolor\" sit amet",
    "Lorem ipsum dolor\rsit amet",
    "Lorem ipsum dolor\r\n sit amet",
    "Lorem ipsum dolor\n sit amet",
];

/// 每次最多返回 `chunk` 个字节的 reader
pub struct ChunkedReader<'a> {
    data: &'a [u8],
    chunk: usize,
    pub reads: usize,
}

impl<'a> ChunkedReader<'a> {
    pub fn new(data: &'a [u8], chunk: usize) -> Self {
        Self {
            data,
            chunk,
            reads: 0,
        }
    }
}

impl Read for ChunkedReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reads += 1;
        let n = self.data.len().min(self.chunk).min(buf.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}
